//! Core types and traits for driftfs.
//!
//! This crate provides the fundamental data structures shared by the
//! planning engine and the storage backends: virtual paths, entry
//! metadata, the error taxonomy, tasks with progress and cancellation,
//! change notifications, and the backend capability trait.

mod config;
mod error;
mod event;
mod fs;
mod path;
mod stat;
mod task;

pub use config::{TransferConfig, TransferConfigBuilder};
pub use error::VfsError;
pub use event::{EventHub, VfsEvent};
pub use fs::{Dispatcher, InlineDispatcher, ThreadDispatcher, Vfs};
pub use path::VfsPath;
pub use stat::{EntryKind, EntryStat};
pub use task::{BoxedTask, FnTask, Task, TaskHandle};

/// Number of bytes streamed per copy chunk. Cancellation is polled at
/// this granularity.
pub const COPY_CHUNK_SIZE: usize = 16 * 1024;
