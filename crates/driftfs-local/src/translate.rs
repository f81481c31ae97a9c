//! Virtual/native path translation.

use std::path::{Path, PathBuf};

use driftfs_core::VfsPath;

/// Convert a virtual path's slash-delimited form into the form the
/// OS understands. On Windows this also turns a bare drive `C:` into
/// `C:\`, which functions like canonicalization require.
pub(crate) fn to_native(path: &VfsPath) -> PathBuf {
    #[cfg(windows)]
    {
        let mut native = path.path().replace('/', "\\");
        if native.len() == 2 && native.ends_with(':') {
            native.push('\\');
        }
        PathBuf::from(native)
    }
    #[cfg(not(windows))]
    {
        PathBuf::from(path.path())
    }
}

/// Convert a native path back into its virtual, forward-slash form.
pub(crate) fn to_virtual(scheme: &str, native: &Path) -> VfsPath {
    VfsPath::new(scheme, native.to_string_lossy().into_owned())
}
