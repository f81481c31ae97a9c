//! Delete and trash planning.

use std::sync::Arc;

use driftfs_core::{TransferConfig, Vfs, VfsError, VfsPath};

use crate::plan::{Step, TaskPlan};
use crate::precondition::check_absolute;

/// Plan a recursive delete of `path`.
///
/// Depth-first: a directory's children are planned before the task
/// that removes the then-empty directory itself, so a tree with N
/// descendant entries yields N+1 tasks. Children that vanish during
/// traversal are skipped; deletion by a concurrent actor is not a
/// plan failure.
pub fn plan_delete(vfs: Arc<dyn Vfs>, path: &VfsPath) -> Result<TaskPlan, VfsError> {
    check_absolute(vfs.as_ref(), path)?;
    let steps = vec![Step::Delete {
        path: path.clone(),
        depth: 0,
    }];
    Ok(TaskPlan::new(vfs, TransferConfig::default(), steps))
}

/// Plan a move of `path` into the host trash.
///
/// A single unit-sized task: the trash mechanism handles directories
/// atomically as a unit, so no recursion happens here.
pub fn plan_trash(vfs: Arc<dyn Vfs>, path: &VfsPath) -> Result<TaskPlan, VfsError> {
    check_absolute(vfs.as_ref(), path)?;
    let steps = vec![Step::Trash { path: path.clone() }];
    Ok(TaskPlan::new(vfs, TransferConfig::default(), steps))
}
