//! Sequential task execution.

use std::sync::Arc;

use tracing::debug;

use driftfs_core::{BoxedTask, TransferConfig, Vfs, VfsError, VfsPath};

use crate::{plan_copy, plan_delete, plan_move, plan_trash};

/// Run a plan's tasks in order, each to completion before the next.
///
/// Stops and propagates on the first task that fails or observes
/// cancellation; no retry, no rollback of prior tasks. Callers
/// inspect the notifications that fired to learn how far a partially
/// completed plan got.
pub fn execute<I>(plan: I) -> Result<(), VfsError>
where
    I: IntoIterator<Item = Result<BoxedTask, VfsError>>,
{
    for item in plan {
        let mut task = item?;
        let handle = task.handle();
        debug!(task = handle.label(), size = handle.size(), "running task");
        task.run()?;
    }
    Ok(())
}

/// Plan and execute a move.
pub fn move_entry(vfs: Arc<dyn Vfs>, src: &VfsPath, dst: &VfsPath) -> Result<(), VfsError> {
    let plan = plan_move(Arc::clone(&vfs), src, dst, &TransferConfig::default())?;
    execute(plan)
}

/// Plan and execute a copy.
pub fn copy_entry(vfs: Arc<dyn Vfs>, src: &VfsPath, dst: &VfsPath) -> Result<(), VfsError> {
    let plan = plan_copy(Arc::clone(&vfs), src, dst, &TransferConfig::default())?;
    execute(plan)
}

/// Plan and execute a recursive delete.
pub fn delete(vfs: Arc<dyn Vfs>, path: &VfsPath) -> Result<(), VfsError> {
    let plan = plan_delete(Arc::clone(&vfs), path)?;
    execute(plan)
}

/// Plan and execute a move to the host trash.
pub fn move_to_trash(vfs: Arc<dyn Vfs>, path: &VfsPath) -> Result<(), VfsError> {
    let plan = plan_trash(Arc::clone(&vfs), path)?;
    execute(plan)
}
