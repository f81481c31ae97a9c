//! Error taxonomy for planning and execution.

use thiserror::Error;

/// Errors surfaced by backends, planners and tasks.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Path does not exist, or is not absolute where an operation
    /// requires it.
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// Creation requested for an existing entry where exclusivity was
    /// required.
    #[error("entry already exists: {path}")]
    AlreadyExists { path: String },

    /// Cross-scheme transfer requested; a higher layer must decompose
    /// it into per-backend operations.
    #[error("unsupported operation: {message}")]
    UnsupportedOperation { message: String },

    /// Malformed request, e.g. a non-absolute destination.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An underlying read/write/rename/remove call failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Cooperative cancellation observed mid-task.
    #[error("operation canceled")]
    Canceled,
}

impl VfsError {
    /// Classify an I/O error, lifting not-found and already-exists
    /// conditions into their dedicated variants.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a not-found error for a path-like value.
    pub fn not_found(path: impl ToString) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }

    /// True for the not-found variant. Planning treats a vanished
    /// descendant as a skippable race, not a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
