//! Entry metadata.

use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Kind of filesystem entry.
///
/// Symlinks are never resolved: a symlink to a directory stats as
/// `Symlink`, so planners copy the link itself instead of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

/// Metadata for one entry, resolved per path during a planning pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntryStat {
    /// Size in bytes.
    pub len: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Physical device identifier; 0 on platforms without one.
    pub device: u64,
    /// Inode number; 0 on platforms without one.
    pub inode: u64,
    /// Entry kind, from lstat semantics.
    pub kind: EntryKind,
}

impl EntryStat {
    /// Whether the entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Whether the entry is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// The modification time as a local datetime.
    pub fn modified_datetime(&self) -> DateTime<Local> {
        DateTime::from(self.modified)
    }
}
