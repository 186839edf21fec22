//! Filesystem watching for user style sources.
//!
//! Each watched source file is turned into a channel of `ChangeEvent`
//! messages, so the regeneration logic never sees the watch library. The
//! watcher binds to the nearest existing ancestor of the target (the file
//! itself may not exist yet) and filters events down to the exact path.
//! Nothing fires for the initial filesystem snapshot.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Existence transition of a watched source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
}

/// A single add/remove transition of a watched source file.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

/// A live watcher binding: the notify watcher plus the reconcile loop
/// consuming its events. Registered into the host's watcher collection;
/// dropping it tears both down. The host owns shutdown.
pub struct WatcherHandle {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    pub fn new(watcher: RecommendedWatcher, task: JoinHandle<()>) -> Self {
        Self {
            _watcher: watcher,
            task,
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start watching a single file for add/remove transitions.
///
/// Returns the watcher (keep it alive for as long as events are wanted)
/// and the receiving end of the event channel.
pub fn watch_path(
    target: &Path,
) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<ChangeEvent>)> {
    let root = existing_ancestor(target).ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no existing ancestor for {}", target.display()),
        ))
    })?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let target_path = target.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            let kind = match event.kind {
                EventKind::Create(_) => ChangeKind::Added,
                EventKind::Remove(_) => ChangeKind::Removed,
                _ => return,
            };

            for path in &event.paths {
                if path == &target_path {
                    debug!(path = %path.display(), ?kind, "Source file transition");
                    // Receiver dropped means the reconcile loop is gone.
                    let _ = event_tx.send(ChangeEvent {
                        kind,
                        path: path.clone(),
                    });
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "Filesystem watch error");
        }
    })?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    debug!(
        target = %target.display(),
        root = %root.display(),
        "Started source watcher"
    );

    Ok((watcher, event_rx))
}

/// Deepest ancestor of `path` that exists on disk, the path itself included.
fn existing_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|candidate| candidate.is_dir())
        .map(Path::to_path_buf)
}
