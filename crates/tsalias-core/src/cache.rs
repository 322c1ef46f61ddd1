//! Per-run resolution cache.
//!
//! Two append-only maps shared by every worker of a run:
//!
//! - probe results, keyed by the candidate's absolute path (a miss is cached
//!   as `None` so an unresolvable candidate is only probed once)
//! - relative specifiers, keyed by (target path, consuming file directory)
//!
//! A fresh cache is created for every run, so nothing leaks between runs.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

/// Cache statistics reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Hit rate in `[0.0, 1.0]`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolutionCache {
    probes: DashMap<PathBuf, Option<PathBuf>>,
    relative: DashMap<(PathBuf, PathBuf), String>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached probe outcome for `candidate`: `Some(None)` means known missing.
    pub fn probe(&self, candidate: &Path) -> Option<Option<PathBuf>> {
        let found = self.probes.get(candidate).map(|entry| entry.value().clone());
        self.record(found.is_some());
        found
    }

    pub fn store_probe(&self, candidate: PathBuf, found: Option<PathBuf>) {
        self.probes.insert(candidate, found);
    }

    pub fn relative(&self, target: &Path, from_dir: &Path) -> Option<String> {
        let key = (target.to_path_buf(), from_dir.to_path_buf());
        let found = self.relative.get(&key).map(|entry| entry.value().clone());
        self.record(found.is_some());
        found
    }

    pub fn store_relative(&self, target: PathBuf, from_dir: PathBuf, specifier: String) {
        self.relative.insert((target, from_dir), specifier);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
