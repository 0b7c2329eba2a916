//! Manifest holder with atomic replacement.
//!
//! A manifest is never patched. When content changes (watch mode) a complete
//! new manifest is built and swapped in as one pointer store, so a reader
//! holds either the whole previous generation or the whole new one.
//!
//! ```text
//!   reader ──load()──▶ Arc<Manifest> (gen N)      keeps gen N alive while held
//!   watcher ─rebuild()─▶ build ─ok─▶ store gen N+1
//!                              └err─▶ gen N stays current
//! ```

use crate::manifest::{Manifest, ManifestError, RawPost, build_manifest};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct ManifestStore<B> {
    current: ArcSwap<Manifest<B>>,
    generation: AtomicU64,
}

impl<B> ManifestStore<B> {
    /// Wrap an initial manifest as generation 0.
    pub fn new(manifest: Manifest<B>) -> Self {
        Self {
            current: ArcSwap::from_pointee(manifest),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current manifest. Wait-free.
    pub fn load(&self) -> Arc<Manifest<B>> {
        self.current.load_full()
    }

    /// Number of successful replacements so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Swap in a new manifest and return its generation.
    pub fn replace(&self, manifest: Manifest<B>) -> u64 {
        self.current.store(Arc::new(manifest));
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Build from fresh inputs and swap in the result.
    ///
    /// On error nothing is stored and the previous manifest stays current.
    pub fn rebuild<I>(&self, inputs: I) -> Result<Arc<Manifest<B>>, ManifestError>
    where
        I: IntoIterator<Item = RawPost<B>>,
    {
        let manifest = Arc::new(build_manifest(inputs)?);
        self.current.store(Arc::clone(&manifest));
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(manifest)
    }
}
