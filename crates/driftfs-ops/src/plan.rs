//! Lazy task plans.
//!
//! A [`TaskPlan`] is a finite, pull-based iterator over the tasks
//! realizing one transfer. Each `next()` call performs the stat and
//! listing work for at most one entry, so a caller can begin
//! executing before later steps are planned, or drain the iterator
//! first to pre-compute the total size. Both paths share this one
//! generator.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use driftfs_core::{
    BoxedTask, EntryStat, FnTask, TransferConfig, Vfs, VfsError, VfsEvent, VfsPath,
};

use crate::copy::CopyFile;

/// Memoized stat lookups, scoped to one planning pass.
///
/// Directory listings and stats read during planning are not locked;
/// the tree may change underneath a plan, and the planners handle the
/// resulting not-found races by skipping.
pub struct StatCache {
    vfs: Arc<dyn Vfs>,
    entries: HashMap<VfsPath, EntryStat>,
}

impl StatCache {
    /// Create a cache over a backend.
    pub fn new(vfs: Arc<dyn Vfs>) -> Self {
        Self {
            vfs,
            entries: HashMap::new(),
        }
    }

    /// Stat a path, reusing a previous result from this pass.
    pub fn stat(&mut self, path: &VfsPath) -> Result<EntryStat, VfsError> {
        if let Some(stat) = self.entries.get(path) {
            return Ok(*stat);
        }
        let stat = self.vfs.stat(path)?;
        self.entries.insert(path.clone(), stat);
        Ok(stat)
    }
}

/// One pending planning step on the work stack.
pub(crate) enum Step {
    /// Copy an entry; directories expand into a create task plus
    /// child steps.
    Copy {
        src: VfsPath,
        dst: VfsPath,
        depth: usize,
    },
    /// Delete an entry; directories expand into child steps followed
    /// by their own removal.
    Delete { path: VfsPath, depth: usize },
    /// Remove a directory whose children have already been planned.
    RemoveDir { path: VfsPath },
    /// Atomic same-device rename.
    Rename { src: VfsPath, dst: VfsPath },
    /// Delete the source of a cross-device move after its copy plan.
    Postprocess { src: VfsPath },
    /// Relocate an entry through the host trash mechanism.
    Trash { path: VfsPath },
}

/// An ordered, lazily-produced sequence of tasks.
///
/// Executing the tasks in order, and only in order, reproduces the
/// intended move/copy/delete semantics: a directory's create task
/// precedes its children, and children's delete tasks precede their
/// parent's. The iterator is finite and not restartable; a planning
/// failure clears the remaining steps.
pub struct TaskPlan {
    vfs: Arc<dyn Vfs>,
    config: TransferConfig,
    stats: StatCache,
    stack: Vec<Step>,
}

impl TaskPlan {
    pub(crate) fn new(vfs: Arc<dyn Vfs>, config: TransferConfig, steps: Vec<Step>) -> Self {
        let stats = StatCache::new(Arc::clone(&vfs));
        Self::with_cache(vfs, config, steps, stats)
    }

    /// Reuse stat results already gathered for this planning pass.
    pub(crate) fn with_cache(
        vfs: Arc<dyn Vfs>,
        config: TransferConfig,
        steps: Vec<Step>,
        stats: StatCache,
    ) -> Self {
        Self {
            vfs,
            config,
            stats,
            stack: steps,
        }
    }

    /// Process one step. `Ok(None)` means the step was skipped (a
    /// descendant vanished mid-traversal) or only expanded into
    /// further steps.
    fn advance(&mut self, step: Step) -> Result<Option<BoxedTask>, VfsError> {
        match step {
            Step::Copy { src, dst, depth } => self.advance_copy(src, dst, depth),
            Step::Delete { path, depth } => self.advance_delete(path, depth),
            Step::RemoveDir { path } => Ok(Some(self.remove_task(path, true))),
            Step::Rename { src, dst } => Ok(Some(self.rename_task(src, dst))),
            Step::Postprocess { src } => Ok(Some(self.postprocess_task(src))),
            Step::Trash { path } => Ok(Some(self.trash_task(path))),
        }
    }

    fn advance_copy(
        &mut self,
        src: VfsPath,
        dst: VfsPath,
        depth: usize,
    ) -> Result<Option<BoxedTask>, VfsError> {
        let stat = match self.stats.stat(&src) {
            Ok(stat) => stat,
            Err(e) if depth > 0 && e.is_not_found() => {
                warn!(src = %src, "entry vanished during copy planning, skipping");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if stat.is_dir() {
            let names = match self.vfs.read_dir(&src) {
                Ok(names) => names,
                Err(e) if depth > 0 && e.is_not_found() => {
                    warn!(src = %src, "directory vanished during copy planning, skipping");
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };
            for name in names.iter().rev() {
                self.stack.push(Step::Copy {
                    src: src.join(name),
                    dst: dst.join(name),
                    depth: depth + 1,
                });
            }
            let vfs = Arc::clone(&self.vfs);
            let dir = dst.clone();
            let task = FnTask::new(format!("Creating {}", dst.name()), 0, move || {
                vfs.create_dir(&dir)
            });
            Ok(Some(Box::new(task)))
        } else {
            let size = if self.config.measure_size { stat.len } else { 0 };
            let task = CopyFile::new(Arc::clone(&self.vfs), src, dst, size, &self.config);
            Ok(Some(Box::new(task)))
        }
    }

    fn advance_delete(
        &mut self,
        path: VfsPath,
        depth: usize,
    ) -> Result<Option<BoxedTask>, VfsError> {
        let stat = match self.stats.stat(&path) {
            Ok(stat) => stat,
            Err(e) if depth > 0 && e.is_not_found() => {
                warn!(path = %path, "entry vanished during delete planning, skipping");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if stat.is_dir() {
            let names = match self.vfs.read_dir(&path) {
                Ok(names) => names,
                Err(e) if depth > 0 && e.is_not_found() => {
                    warn!(path = %path, "directory vanished during delete planning, skipping");
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };
            // The directory's own removal goes under its children on
            // the stack, so children are deleted first.
            self.stack.push(Step::RemoveDir { path: path.clone() });
            for name in names.iter().rev() {
                self.stack.push(Step::Delete {
                    path: path.join(name),
                    depth: depth + 1,
                });
            }
            Ok(None)
        } else {
            Ok(Some(self.remove_task(path, false)))
        }
    }

    fn remove_task(&self, path: VfsPath, is_dir: bool) -> BoxedTask {
        let vfs = Arc::clone(&self.vfs);
        Box::new(FnTask::new(
            format!("Deleting {}", path.name()),
            1,
            move || {
                if is_dir {
                    vfs.remove_dir(&path)?;
                } else {
                    vfs.remove_file(&path)?;
                }
                vfs.events().emit(VfsEvent::Removed(path.clone()));
                Ok(())
            },
        ))
    }

    fn rename_task(&self, src: VfsPath, dst: VfsPath) -> BoxedTask {
        let vfs = Arc::clone(&self.vfs);
        Box::new(FnTask::new(format!("Moving {}", src.name()), 1, move || {
            vfs.rename(&src, &dst)?;
            debug!(src = %src, dst = %dst, "renamed atomically");
            vfs.events().emit(VfsEvent::Removed(src.clone()));
            vfs.events().emit(VfsEvent::Added(dst.clone()));
            Ok(())
        }))
    }

    fn postprocess_task(&self, src: VfsPath) -> BoxedTask {
        let vfs = Arc::clone(&self.vfs);
        Box::new(FnTask::new(
            format!("Postprocessing {}", src.name()),
            1,
            move || {
                let plan = crate::plan_delete(Arc::clone(&vfs), &src)?;
                crate::execute(plan)
            },
        ))
    }

    fn trash_task(&self, path: VfsPath) -> BoxedTask {
        let vfs = Arc::clone(&self.vfs);
        Box::new(FnTask::new(
            format!("Deleting {}", path.name()),
            1,
            move || {
                vfs.trash(&path)?;
                vfs.events().emit(VfsEvent::Removed(path.clone()));
                Ok(())
            },
        ))
    }
}

impl fmt::Debug for TaskPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskPlan")
            .field("config", &self.config)
            .field("remaining_steps", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl Iterator for TaskPlan {
    type Item = Result<BoxedTask, VfsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = self.stack.pop()?;
            match self.advance(step) {
                Ok(Some(task)) => return Some(Ok(task)),
                Ok(None) => {}
                Err(e) => {
                    self.stack.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Realize a plan, returning its tasks and their total declared size.
///
/// This is the pre-flight pass a progress UI runs before execution;
/// the returned total is in bytes for measured copy plans and unit
/// counts otherwise.
pub fn measure(plan: TaskPlan) -> Result<(Vec<BoxedTask>, u64), VfsError> {
    let mut tasks = Vec::new();
    let mut total = 0u64;
    for item in plan {
        let task = item?;
        total += task.handle().size();
        tasks.push(task);
    }
    Ok((tasks, total))
}
