//! Local `file://` backend for driftfs.
//!
//! Implements the [`Vfs`] capability trait over `std::fs` with lstat
//! semantics, maps OS errors into the driftfs taxonomy, announces
//! creations through the event hub, and forwards OS change
//! notifications from a lazily-created watcher.

mod translate;
mod watch;

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use compact_str::CompactString;
use filetime::FileTime;
use notify::RecommendedWatcher;

use driftfs_core::{
    Dispatcher, EntryKind, EntryStat, EventHub, InlineDispatcher, Vfs, VfsError, VfsEvent, VfsPath,
};

/// The local filesystem backend.
///
/// One watcher handle exists per instance, created lazily on first
/// [`LocalVfs::watch`] and torn down with the instance.
pub struct LocalVfs {
    events: Arc<EventHub>,
    dispatcher: Arc<dyn Dispatcher>,
    watcher: Arc<Mutex<Option<RecommendedWatcher>>>,
}

impl LocalVfs {
    /// The scheme this backend serves.
    pub const SCHEME: &'static str = "file";

    /// Create a backend whose watch registration runs inline on the
    /// calling thread.
    pub fn new() -> Self {
        Self::with_dispatcher(Arc::new(InlineDispatcher))
    }

    /// Create a backend that marshals watch registration through the
    /// given dispatcher (e.g. a GUI main-thread executor).
    pub fn with_dispatcher(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            events: Arc::new(EventHub::new()),
            dispatcher,
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    /// Build a `file://` path from a native path.
    pub fn path_from_native(native: impl Into<PathBuf>) -> VfsPath {
        translate::to_virtual(Self::SCHEME, &native.into())
    }

    /// Native form of `path`, or `NotFound` when it is not absolute;
    /// the convention for queries and existing-entry operations.
    fn native_abs(&self, path: &VfsPath) -> Result<PathBuf, VfsError> {
        let native = translate::to_native(path);
        if !native.is_absolute() {
            return Err(VfsError::not_found(path));
        }
        Ok(native)
    }

    /// Like [`Self::native_abs`] but failing with `InvalidArgument`,
    /// the convention for creation targets.
    fn native_abs_arg(&self, path: &VfsPath) -> Result<PathBuf, VfsError> {
        let native = translate::to_native(path);
        if !native.is_absolute() {
            return Err(VfsError::InvalidArgument {
                message: format!("path must be absolute: {path}"),
            });
        }
        Ok(native)
    }
}

impl Default for LocalVfs {
    fn default() -> Self {
        Self::new()
    }
}

fn stat_from_metadata(path: &VfsPath, meta: &fs::Metadata) -> Result<EntryStat, VfsError> {
    let file_type = meta.file_type();
    let kind = if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };
    let modified = meta
        .modified()
        .map_err(|e| VfsError::io(path.to_string(), e))?;

    #[cfg(unix)]
    let (device, inode) = {
        use std::os::unix::fs::MetadataExt;
        (meta.dev(), meta.ino())
    };
    #[cfg(not(unix))]
    let (device, inode) = (0, 0);

    Ok(EntryStat {
        len: meta.len(),
        modified,
        device,
        inode,
        kind,
    })
}

impl Vfs for LocalVfs {
    fn scheme(&self) -> &str {
        Self::SCHEME
    }

    fn events(&self) -> &EventHub {
        &self.events
    }

    fn to_native(&self, path: &VfsPath) -> PathBuf {
        translate::to_native(path)
    }

    fn exists(&self, path: &VfsPath) -> bool {
        match self.native_abs(path) {
            Ok(native) => native.symlink_metadata().is_ok(),
            Err(_) => false,
        }
    }

    fn stat(&self, path: &VfsPath) -> Result<EntryStat, VfsError> {
        let native = self.native_abs(path)?;
        let meta = fs::symlink_metadata(&native).map_err(|e| VfsError::io(path.to_string(), e))?;
        stat_from_metadata(path, &meta)
    }

    fn read_dir(&self, path: &VfsPath) -> Result<Vec<CompactString>, VfsError> {
        let native = self.native_abs(path)?;
        let entries = fs::read_dir(&native).map_err(|e| VfsError::io(path.to_string(), e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| VfsError::io(path.to_string(), e))?;
            names.push(CompactString::from(entry.file_name().to_string_lossy()));
        }
        Ok(names)
    }

    fn open_read(&self, path: &VfsPath) -> Result<Box<dyn Read + Send>, VfsError> {
        let native = self.native_abs(path)?;
        let file = File::open(&native).map_err(|e| VfsError::io(path.to_string(), e))?;
        Ok(Box::new(file))
    }

    fn open_write(&self, path: &VfsPath) -> Result<Box<dyn Write + Send>, VfsError> {
        let native = self.native_abs_arg(path)?;
        let file = File::create(&native).map_err(|e| VfsError::io(path.to_string(), e))?;
        Ok(Box::new(file))
    }

    fn read_link(&self, path: &VfsPath) -> Result<String, VfsError> {
        let native = self.native_abs(path)?;
        let target = fs::read_link(&native).map_err(|e| VfsError::io(path.to_string(), e))?;
        Ok(target.to_string_lossy().into_owned())
    }

    fn make_symlink(&self, target: &str, link: &VfsPath) -> Result<(), VfsError> {
        let native = self.native_abs_arg(link)?;
        #[cfg(unix)]
        let result = std::os::unix::fs::symlink(target, &native);
        #[cfg(windows)]
        let result = std::os::windows::fs::symlink_file(target, &native);
        result.map_err(|e| VfsError::io(link.to_string(), e))
    }

    fn copy_attrs(&self, src: &VfsPath, dst: &VfsPath) -> Result<(), VfsError> {
        let src_native = self.native_abs(src)?;
        let dst_native = self.native_abs(dst)?;
        let meta =
            fs::symlink_metadata(&src_native).map_err(|e| VfsError::io(src.to_string(), e))?;
        let atime = FileTime::from_last_access_time(&meta);
        let mtime = FileTime::from_last_modification_time(&meta);
        filetime::set_symlink_file_times(&dst_native, atime, mtime)
            .map_err(|e| VfsError::io(dst.to_string(), e))?;
        if !meta.file_type().is_symlink() {
            fs::set_permissions(&dst_native, meta.permissions())
                .map_err(|e| VfsError::io(dst.to_string(), e))?;
        }
        Ok(())
    }

    fn rename(&self, src: &VfsPath, dst: &VfsPath) -> Result<(), VfsError> {
        let src_native = self.native_abs(src)?;
        let dst_native = self.native_abs_arg(dst)?;
        fs::rename(&src_native, &dst_native).map_err(|e| VfsError::io(src.to_string(), e))
    }

    fn remove_file(&self, path: &VfsPath) -> Result<(), VfsError> {
        let native = self.native_abs(path)?;
        fs::remove_file(&native).map_err(|e| VfsError::io(path.to_string(), e))
    }

    fn remove_dir(&self, path: &VfsPath) -> Result<(), VfsError> {
        let native = self.native_abs(path)?;
        fs::remove_dir(&native).map_err(|e| VfsError::io(path.to_string(), e))
    }

    fn create_dir(&self, path: &VfsPath) -> Result<(), VfsError> {
        let native = self.native_abs_arg(path)?;
        fs::create_dir(&native).map_err(|e| VfsError::io(path.to_string(), e))?;
        self.events.emit(VfsEvent::Added(path.clone()));
        Ok(())
    }

    fn create_file(&self, path: &VfsPath) -> Result<(), VfsError> {
        let native = self.native_abs_arg(path)?;
        match OpenOptions::new().write(true).create_new(true).open(&native) {
            Ok(_) => {
                self.events.emit(VfsEvent::Added(path.clone()));
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // Touch: refresh the mtime, no announcement.
                filetime::set_file_mtime(&native, FileTime::now())
                    .map_err(|e| VfsError::io(path.to_string(), e))
            }
            Err(e) => Err(VfsError::io(path.to_string(), e)),
        }
    }

    fn trash(&self, path: &VfsPath) -> Result<(), VfsError> {
        let native = self.native_abs(path)?;
        trash::delete(&native).map_err(|e| VfsError::Io {
            path: path.to_string(),
            source: std::io::Error::other(e),
        })
    }

    fn resolve(&self, path: &VfsPath) -> Result<VfsPath, VfsError> {
        let native = self.native_abs(path)?;
        #[cfg(windows)]
        {
            // `\\server` without a share is a UNC root the OS cannot
            // canonicalize; route it to the network backend instead.
            let raw = path.path();
            if let Some(server) = raw.strip_prefix("//")
                && !server.contains('/')
            {
                return Ok(VfsPath::new("network", server));
            }
        }
        let canonical =
            dunce::canonicalize(&native).map_err(|e| VfsError::io(path.to_string(), e))?;
        Ok(translate::to_virtual(Self::SCHEME, &canonical))
    }
}
