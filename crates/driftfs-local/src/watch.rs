//! Change watching.
//!
//! Watch registration has GUI-thread affinity on some platforms, so
//! both `watch` and `unwatch` marshal onto the injected dispatcher
//! instead of touching the watcher from the calling thread. The
//! watcher itself is created on first use; some embeddings (and most
//! tests) never watch anything.

use std::path::Path;
use std::sync::{Arc, Mutex};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::warn;

use driftfs_core::{EventHub, VfsError, VfsEvent, VfsPath};

use crate::{LocalVfs, translate};

impl LocalVfs {
    /// Register `path` for change notifications. Changes arrive on
    /// the event hub as [`VfsEvent::Changed`].
    ///
    /// The absoluteness check fails synchronously; registration
    /// itself is fire-and-forget on the dispatcher, and failures
    /// there are logged.
    pub fn watch(&self, path: &VfsPath) -> Result<(), VfsError> {
        let native = self.native_abs(path)?;
        let slot = Arc::clone(&self.watcher);
        let events = Arc::clone(&self.events);
        self.dispatcher.dispatch(Box::new(move || {
            if let Err(e) = register(&slot, &events, &native) {
                warn!(path = %native.display(), error = %e, "watch registration failed");
            }
        }));
        Ok(())
    }

    /// Deregister `path` from change notifications.
    pub fn unwatch(&self, path: &VfsPath) -> Result<(), VfsError> {
        let native = self.native_abs(path)?;
        let slot = Arc::clone(&self.watcher);
        self.dispatcher.dispatch(Box::new(move || {
            let mut guard = slot.lock().expect("watcher lock poisoned");
            if let Some(watcher) = guard.as_mut()
                && let Err(e) = watcher.unwatch(&native)
            {
                warn!(path = %native.display(), error = %e, "unwatch failed");
            }
        }));
        Ok(())
    }
}

fn register(
    slot: &Mutex<Option<RecommendedWatcher>>,
    events: &Arc<EventHub>,
    native: &Path,
) -> notify::Result<()> {
    let mut guard = slot.lock().expect("watcher lock poisoned");
    if guard.is_none() {
        let hub = Arc::clone(events);
        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    for path in event.paths {
                        hub.emit(VfsEvent::Changed(translate::to_virtual(
                            LocalVfs::SCHEME,
                            &path,
                        )));
                    }
                }
                Err(e) => warn!(error = %e, "watcher error"),
            }
        })?;
        *guard = Some(watcher);
    }
    if let Some(watcher) = guard.as_mut() {
        watcher.watch(native, RecursiveMode::NonRecursive)?;
    }
    Ok(())
}
