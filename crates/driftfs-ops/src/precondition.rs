//! Transfer preconditions.

use driftfs_core::{Vfs, VfsError, VfsPath};

/// Validate a transfer request before any lazy planning starts.
///
/// Cross-backend moves and copies are not handled by this planner; a
/// higher layer must decompose them into copy+delete across backends.
/// Runs synchronously at the start of every public move/copy entry
/// point so malformed requests fail before partial planning.
pub fn check_transfer(vfs: &dyn Vfs, src: &VfsPath, dst: &VfsPath) -> Result<(), VfsError> {
    if src.scheme() != vfs.scheme() || dst.scheme() != vfs.scheme() {
        return Err(VfsError::UnsupportedOperation {
            message: format!("cross-scheme transfer: {src} -> {dst}"),
        });
    }
    if !vfs.to_native(dst).is_absolute() {
        return Err(VfsError::InvalidArgument {
            message: format!("destination path must be absolute: {dst}"),
        });
    }
    Ok(())
}

/// Require an absolute path for a single-path operation, failing with
/// [`VfsError::NotFound`] the way the metadata queries do.
pub(crate) fn check_absolute(vfs: &dyn Vfs, path: &VfsPath) -> Result<(), VfsError> {
    if !vfs.to_native(path).is_absolute() {
        return Err(VfsError::not_found(path));
    }
    Ok(())
}
