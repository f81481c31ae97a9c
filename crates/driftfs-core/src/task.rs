//! Tasks: named, sized, cancellable units of work.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

use crate::VfsError;

#[derive(Debug)]
struct TaskState {
    label: String,
    size: u64,
    progress: AtomicU64,
    cancel: CancellationToken,
}

/// Shared handle onto one task's label, size, progress counter and
/// cancellation flag.
///
/// Planners create the handle; the task body advances the progress
/// counter; any holder of a clone may display progress or request
/// cancellation while the executor runs the task.
#[derive(Debug, Clone)]
pub struct TaskHandle(Arc<TaskState>);

impl TaskHandle {
    /// Create a handle with a human-readable label and a declared
    /// total size (bytes or unit count; 0 if unmeasured).
    pub fn new(label: impl Into<String>, size: u64) -> Self {
        Self(Arc::new(TaskState {
            label: label.into(),
            size,
            progress: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }))
    }

    /// The human-readable label, e.g. `Copying report.pdf`.
    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Declared total size; 0 means unmeasured.
    pub fn size(&self) -> u64 {
        self.0.size
    }

    /// Progress so far, in the same unit as `size`.
    pub fn progress(&self) -> u64 {
        self.0.progress.load(Ordering::Relaxed)
    }

    /// Set the absolute progress value.
    pub fn set_progress(&self, done: u64) {
        self.0.progress.store(done, Ordering::Relaxed);
    }

    /// Request cooperative cancellation. The running task observes it
    /// at its next poll point (one chunk boundary for copies).
    pub fn cancel(&self) {
        self.0.cancel.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_canceled(&self) -> bool {
        self.0.cancel.is_cancelled()
    }

    /// Fail with [`VfsError::Canceled`] if cancellation was requested.
    pub fn check_canceled(&self) -> Result<(), VfsError> {
        if self.is_canceled() {
            Err(VfsError::Canceled)
        } else {
            Ok(())
        }
    }
}

/// One unit of work produced by a planner and run exactly once by the
/// executor.
pub trait Task: Send {
    /// The shared handle for progress display and cancellation.
    fn handle(&self) -> TaskHandle;

    /// Run the task body to completion.
    fn run(&mut self) -> Result<(), VfsError>;
}

/// A boxed task, as yielded by plans.
pub type BoxedTask = Box<dyn Task>;

/// A task whose body is a one-shot closure. Covers rename, mkdir,
/// removal, trash and postprocessing steps; streaming copies have
/// their own type in the ops crate.
pub struct FnTask {
    handle: TaskHandle,
    body: Option<Box<dyn FnOnce() -> Result<(), VfsError> + Send>>,
}

impl FnTask {
    /// Create a task from a label, size and body.
    pub fn new(
        label: impl Into<String>,
        size: u64,
        body: impl FnOnce() -> Result<(), VfsError> + Send + 'static,
    ) -> Self {
        Self {
            handle: TaskHandle::new(label, size),
            body: Some(Box::new(body)),
        }
    }
}

impl Task for FnTask {
    fn handle(&self) -> TaskHandle {
        self.handle.clone()
    }

    fn run(&mut self) -> Result<(), VfsError> {
        self.handle.check_canceled()?;
        let body = self.body.take().ok_or_else(|| VfsError::InvalidArgument {
            message: format!("task already ran: {}", self.handle.label()),
        })?;
        body()?;
        self.handle.set_progress(self.handle.size());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_tracks_progress() {
        let handle = TaskHandle::new("Copying a.txt", 100);
        assert_eq!(handle.progress(), 0);
        handle.set_progress(40);
        assert_eq!(handle.progress(), 40);
        assert_eq!(handle.size(), 100);
        assert_eq!(handle.label(), "Copying a.txt");
    }

    #[test]
    fn cancel_observed_through_clones() {
        let handle = TaskHandle::new("Moving b", 1);
        let clone = handle.clone();
        assert!(handle.check_canceled().is_ok());
        clone.cancel();
        assert!(handle.is_canceled());
        assert!(matches!(handle.check_canceled(), Err(VfsError::Canceled)));
    }

    #[test]
    fn fn_task_runs_once() {
        let mut task = FnTask::new("Deleting c", 1, || Ok(()));
        assert!(task.run().is_ok());
        assert_eq!(task.handle().progress(), 1);
        assert!(task.run().is_err());
    }

    #[test]
    fn fn_task_skips_body_when_canceled() {
        let mut task = FnTask::new("Deleting d", 1, || {
            panic!("body must not run");
        });
        task.handle().cancel();
        assert!(matches!(task.run(), Err(VfsError::Canceled)));
    }
}
