//! Move planning.

use std::sync::Arc;

use tracing::debug;

use driftfs_core::{TransferConfig, Vfs, VfsError, VfsPath};

use crate::plan::{StatCache, Step, TaskPlan};
use crate::precondition::check_transfer;

/// Plan a move of `src` to `dst`.
///
/// When source and destination parent sit on the same physical
/// device the plan is a single unit-sized task performing an atomic
/// rename; rename is O(1) regardless of content size. Across devices
/// there is no atomic primitive, so the plan degrades to the full
/// copy plan followed by one postprocessing task that recursively
/// deletes the source. Copy tasks in that plan are always sized to
/// their byte cost, whatever `config.measure_size` says; a caller
/// aggregating the plan must see the real cost of a copy-based move.
pub fn plan_move(
    vfs: Arc<dyn Vfs>,
    src: &VfsPath,
    dst: &VfsPath,
    config: &TransferConfig,
) -> Result<TaskPlan, VfsError> {
    check_transfer(vfs.as_ref(), src, dst)?;

    let mut stats = StatCache::new(Arc::clone(&vfs));
    let src_stat = stats.stat(src)?;
    let dst_parent = dst.parent().ok_or_else(|| VfsError::InvalidArgument {
        message: format!("destination has no parent directory: {dst}"),
    })?;
    let parent_stat = stats.stat(&dst_parent)?;

    let (steps, config) = if src_stat.device == parent_stat.device {
        debug!(src = %src, dst = %dst, "same device, planning atomic rename");
        let steps = vec![Step::Rename {
            src: src.clone(),
            dst: dst.clone(),
        }];
        (steps, config.clone())
    } else {
        debug!(src = %src, dst = %dst, "cross-device move, planning copy and delete");
        // The stack pops the copy subtree before the postprocess step.
        let steps = vec![
            Step::Postprocess { src: src.clone() },
            Step::Copy {
                src: src.clone(),
                dst: dst.clone(),
                depth: 0,
            },
        ];
        let config = TransferConfig {
            measure_size: true,
            ..config.clone()
        };
        (steps, config)
    };
    Ok(TaskPlan::with_cache(vfs, config, steps, stats))
}
