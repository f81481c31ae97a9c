//! The backend capability trait and the UI-affine dispatcher.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, Local};
use compact_str::CompactString;

use crate::{EntryStat, EventHub, VfsError, VfsPath};

/// The capability set a storage backend exposes to planners.
///
/// Planners and tasks depend only on this trait, never on a concrete
/// backend. All path-taking operations require the path's native form
/// to be absolute and fail with [`VfsError::NotFound`] otherwise.
pub trait Vfs: Send + Sync {
    /// The scheme this backend serves, without the `://` separator.
    fn scheme(&self) -> &str;

    /// The notification hub mutations are announced through.
    fn events(&self) -> &EventHub;

    /// Translate a virtual path into the native form required by OS
    /// calls. Pure string translation; absoluteness is checked by the
    /// operations themselves.
    fn to_native(&self, path: &VfsPath) -> PathBuf;

    /// Whether an entry exists at `path`.
    fn exists(&self, path: &VfsPath) -> bool;

    /// Resolve entry metadata. Uses lstat semantics: a symlink stats
    /// as itself.
    fn stat(&self, path: &VfsPath) -> Result<EntryStat, VfsError>;

    /// List child names of a directory, in listing order.
    fn read_dir(&self, path: &VfsPath) -> Result<Vec<CompactString>, VfsError>;

    /// Open a file for reading.
    fn open_read(&self, path: &VfsPath) -> Result<Box<dyn Read + Send>, VfsError>;

    /// Open a file for writing, creating or truncating it.
    fn open_write(&self, path: &VfsPath) -> Result<Box<dyn Write + Send>, VfsError>;

    /// Read a symlink's target string without resolving it.
    fn read_link(&self, path: &VfsPath) -> Result<String, VfsError>;

    /// Create a symlink at `link` pointing at `target`.
    fn make_symlink(&self, target: &str, link: &VfsPath) -> Result<(), VfsError>;

    /// Copy timestamps and permissions from `src` onto `dst`, never
    /// following symlinks.
    fn copy_attrs(&self, src: &VfsPath, dst: &VfsPath) -> Result<(), VfsError>;

    /// Atomically rename `src` to `dst`, replacing `dst` if present.
    /// Only valid when both share a physical device.
    fn rename(&self, src: &VfsPath, dst: &VfsPath) -> Result<(), VfsError>;

    /// Remove a file or symlink.
    fn remove_file(&self, path: &VfsPath) -> Result<(), VfsError>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &VfsPath) -> Result<(), VfsError>;

    /// Create a directory and announce it. Fails with
    /// [`VfsError::AlreadyExists`] if the entry exists and
    /// [`VfsError::NotFound`] if the parent does not.
    fn create_dir(&self, path: &VfsPath) -> Result<(), VfsError>;

    /// Create an empty file and announce it; if the file already
    /// exists, update its modification time instead (no
    /// announcement).
    fn create_file(&self, path: &VfsPath) -> Result<(), VfsError>;

    /// Move an entry to the host's trash mechanism. Directories go as
    /// a unit; the removal announcement is the caller's concern.
    fn trash(&self, path: &VfsPath) -> Result<(), VfsError>;

    /// Canonicalize a path. May route to a different scheme rather
    /// than resolving locally.
    fn resolve(&self, path: &VfsPath) -> Result<VfsPath, VfsError>;

    /// Whether the entry is a directory.
    fn is_dir(&self, path: &VfsPath) -> Result<bool, VfsError> {
        Ok(self.stat(path)?.is_dir())
    }

    /// Size of the entry in bytes.
    fn size_bytes(&self, path: &VfsPath) -> Result<u64, VfsError> {
        Ok(self.stat(path)?.len)
    }

    /// Last modification time as a local datetime.
    fn modified_datetime(&self, path: &VfsPath) -> Result<DateTime<Local>, VfsError> {
        Ok(self.stat(path)?.modified_datetime())
    }

    /// Whether two paths refer to the same physical entry
    /// (device and inode comparison).
    fn same_entry(&self, a: &VfsPath, b: &VfsPath) -> Result<bool, VfsError> {
        let sa = self.stat(a)?;
        let sb = self.stat(b)?;
        Ok(sa.device == sb.device && sa.inode == sb.inode)
    }
}

/// Executor capability for calls that must run on one designated
/// thread (watch registration has GUI-thread affinity on some
/// platforms). Injected into backends; the core never assumes which
/// thread it runs on.
pub trait Dispatcher: Send + Sync {
    /// Run `job` on the designated thread without blocking the
    /// caller indefinitely.
    fn dispatch(&self, job: Box<dyn FnOnce() + Send>);
}

/// Dispatcher that runs jobs on the calling thread. Suitable for
/// tests and headless embedding.
#[derive(Debug, Default)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send>) {
        job();
    }
}

/// Dispatcher backed by one dedicated thread. Jobs run in submission
/// order; the thread exits when the dispatcher is dropped.
#[derive(Debug)]
pub struct ThreadDispatcher {
    tx: mpsc::Sender<Box<dyn FnOnce() + Send>>,
}

impl ThreadDispatcher {
    /// Spawn the designated thread.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Box<dyn FnOnce() + Send>>();
        thread::Builder::new()
            .name("driftfs-dispatch".into())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                }
            })
            .expect("failed to spawn dispatch thread");
        Self { tx }
    }

    /// Whether the designated thread is still accepting jobs.
    pub fn is_alive(&self) -> bool {
        self.tx.send(Box::new(|| {})).is_ok()
    }
}

impl Default for ThreadDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send>) {
        // A closed channel means the thread is gone; the job is
        // dropped, matching fire-and-forget marshaling semantics.
        let _ = self.tx.send(job);
    }
}
