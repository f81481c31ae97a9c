//! Copy planning and the streaming copy task.

use std::io::{Read, Write};
use std::sync::Arc;

use driftfs_core::{Task, TaskHandle, TransferConfig, Vfs, VfsError, VfsEvent, VfsPath};

use crate::plan::{Step, TaskPlan};
use crate::precondition::check_transfer;

/// Plan a recursive copy of `src` to `dst`.
///
/// Directories yield a creation task followed by their children in
/// listing order (depth-first, pre-order); files and symlinks yield
/// one [`CopyFile`] task each, sized to the file's byte length when
/// `config.measure_size` is set and 0 otherwise. Children that vanish
/// between listing and planning are skipped silently.
pub fn plan_copy(
    vfs: Arc<dyn Vfs>,
    src: &VfsPath,
    dst: &VfsPath,
    config: &TransferConfig,
) -> Result<TaskPlan, VfsError> {
    check_transfer(vfs.as_ref(), src, dst)?;
    let steps = vec![Step::Copy {
        src: src.clone(),
        dst: dst.clone(),
        depth: 0,
    }];
    Ok(TaskPlan::new(vfs, config.clone(), steps))
}

/// Streams one file's bytes from source to destination with progress
/// updates and a cancellation check per chunk.
///
/// Symlinks are recreated with the same target string, never
/// dereferenced. Cancellation aborts immediately and leaves a
/// possibly-partial destination file in place; there is no automatic
/// rollback.
pub struct CopyFile {
    vfs: Arc<dyn Vfs>,
    src: VfsPath,
    dst: VfsPath,
    handle: TaskHandle,
    chunk_size: usize,
    preserve_attrs: bool,
}

impl CopyFile {
    pub(crate) fn new(
        vfs: Arc<dyn Vfs>,
        src: VfsPath,
        dst: VfsPath,
        size: u64,
        config: &TransferConfig,
    ) -> Self {
        let handle = TaskHandle::new(format!("Copying {}", src.name()), size);
        Self {
            vfs,
            src,
            dst,
            handle,
            chunk_size: config.chunk_size,
            preserve_attrs: config.preserve_attrs,
        }
    }

    fn stream_bytes(&self) -> Result<(), VfsError> {
        let mut reader = self.vfs.open_read(&self.src)?;
        let mut writer = self.vfs.open_write(&self.dst)?;
        let mut buf = vec![0u8; self.chunk_size];
        let mut written = 0u64;
        loop {
            self.handle.check_canceled()?;
            let n = reader
                .read(&mut buf)
                .map_err(|e| VfsError::io(self.src.to_string(), e))?;
            if n == 0 {
                break;
            }
            writer
                .write_all(&buf[..n])
                .map_err(|e| VfsError::io(self.dst.to_string(), e))?;
            written += n as u64;
            self.handle.set_progress(written);
        }
        writer
            .flush()
            .map_err(|e| VfsError::io(self.dst.to_string(), e))
    }
}

impl Task for CopyFile {
    fn handle(&self) -> TaskHandle {
        self.handle.clone()
    }

    fn run(&mut self) -> Result<(), VfsError> {
        let dst_existed = self.vfs.exists(&self.dst);
        let stat = self.vfs.stat(&self.src)?;
        if stat.is_symlink() {
            let target = self.vfs.read_link(&self.src)?;
            self.vfs.make_symlink(&target, &self.dst)?;
        } else {
            self.stream_bytes()?;
        }
        if self.preserve_attrs {
            self.vfs.copy_attrs(&self.src, &self.dst)?;
        }
        if !dst_existed {
            self.vfs.events().emit(VfsEvent::Added(self.dst.clone()));
        }
        Ok(())
    }
}
