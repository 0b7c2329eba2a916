//! Content watcher for development.
//!
//! Watches `<content>/posts` and rebuilds the manifest whenever post files
//! change. A rebuild always starts from a fresh scan of the whole tree and is
//! swapped in through [`ManifestStore`]; readers never see a partial update.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌──────────────────────────────┐
//! │ notify   │───▶│ Debouncer │───▶│ rebuild_from_disk()          │
//! │ events   │    │ (300ms)   │    │  scan → build → store swap   │
//! └──────────┘    └───────────┘    │  error → previous gen stays  │
//!                                  └──────────────────────────────┘
//! ```

use crate::manifest::POSTS_DIR;
use crate::scan::{self, BodyRef};
use crate::store::ManifestStore;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use thiserror::Error;

const DEBOUNCE_MS: u64 = 300;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Posts directory not found: {0}")]
    MissingPostsDir(PathBuf),
}

/// Outcome of one debounced rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Rebuilt { generation: u64, posts: usize },
    /// The rebuild failed; the previous manifest is still being served.
    Failed { error: String },
}

/// Editor swap, backup, and hidden files.
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Debounce State
// =============================================================================

/// Collects changed paths until events stop arriving for [`DEBOUNCE_MS`].
#[derive(Debug, Default)]
struct Debouncer {
    pending: BTreeSet<PathBuf>,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn add(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        let mut added = false;
        for path in paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
                added = true;
            }
        }
        if added {
            self.last_event = Some(Instant::now());
        }
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Rebuild
// =============================================================================

/// Rescan `root` and swap the result into `store`.
pub fn rebuild_from_disk(root: &Path, store: &ManifestStore<BodyRef>) -> WatchEvent {
    let result = scan::scan(root)
        .and_then(|posts| store.rebuild(posts).map_err(scan::ScanError::from));
    match result {
        Ok(manifest) => WatchEvent::Rebuilt {
            generation: store.generation(),
            posts: manifest.len(),
        },
        Err(e) => WatchEvent::Failed {
            error: e.to_string(),
        },
    }
}

/// Block, rebuilding on every debounced batch of post changes.
///
/// `on_event` sees the outcome of each rebuild. Returns when the watcher
/// channel closes.
pub fn watch(
    root: &Path,
    store: &ManifestStore<BodyRef>,
    mut on_event: impl FnMut(&WatchEvent),
) -> Result<(), WatchError> {
    let posts_dir = root.join(POSTS_DIR);
    if !posts_dir.is_dir() {
        return Err(WatchError::MissingPostsDir(posts_dir));
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(&posts_dir, RecursiveMode::Recursive)?;

    let mut debouncer = Debouncer::default();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) => debouncer.add(event.paths),
            Ok(Err(e)) => on_event(&WatchEvent::Failed {
                error: e.to_string(),
            }),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                debouncer.take();
                on_event(&rebuild_from_disk(root, store));
            }
            Err(RecvTimeoutError::Disconnected) => break,
            _ => {}
        }
    }

    Ok(())
}
