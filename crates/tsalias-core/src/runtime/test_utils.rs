//! In-memory runtime for tests.
//!
//! `MemoryRuntime` keeps a virtual file tree in a map and records how the
//! pipeline touches it: how many metadata probes were made, how often each
//! file was read, which files were written, and the peak number of reads in
//! flight at the same time. Reads, writes and directory listings can be made
//! to fail per path, reads can be made to panic, and directories can be
//! linked to exercise symlink handling.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Link hops followed before a path is treated as a loop.
const MAX_LINK_HOPS: usize = 40;

/// Virtual filesystem with call accounting.
#[derive(Debug, Default)]
pub struct MemoryRuntime {
    cwd: PathBuf,
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    symlinks: Mutex<BTreeMap<PathBuf, PathBuf>>,
    failing_reads: Mutex<HashSet<PathBuf>>,
    failing_writes: Mutex<HashSet<PathBuf>>,
    failing_dirs: Mutex<HashSet<PathBuf>>,
    panicking_reads: Mutex<HashSet<PathBuf>>,
    reads: Mutex<HashMap<PathBuf, usize>>,
    writes: Mutex<Vec<PathBuf>>,
    probes: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryRuntime {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }

    /// Builder-style variant of [`MemoryRuntime::add_file`].
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, content: &str) {
        self.files
            .lock()
            .insert(path.into(), content.as_bytes().to_vec());
    }

    pub fn add_bytes(&self, path: impl Into<PathBuf>, content: &[u8]) {
        self.files.lock().insert(path.into(), content.to_vec());
    }

    /// Make `link` a symbolic link to the absolute path `target`.
    pub fn add_symlink(&self, link: impl Into<PathBuf>, target: impl Into<PathBuf>) {
        self.symlinks.lock().insert(link.into(), target.into());
    }

    pub fn fail_reads_for(&self, path: impl Into<PathBuf>) {
        self.failing_reads.lock().insert(path.into());
    }

    pub fn fail_writes_for(&self, path: impl Into<PathBuf>) {
        self.failing_writes.lock().insert(path.into());
    }

    /// Make listing the directory at `path` fail.
    pub fn fail_read_dir_for(&self, path: impl Into<PathBuf>) {
        self.failing_dirs.lock().insert(path.into());
    }

    /// Make reading `path` panic.
    pub fn panic_on_read_for(&self, path: impl Into<PathBuf>) {
        self.panicking_reads.lock().insert(path.into());
    }

    /// Current content of a file as text.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Number of `metadata` calls made so far.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
        self.reads.lock().get(path.as_ref()).copied().unwrap_or(0)
    }

    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Rewrite every linked ancestor of `path` (and `path` itself) to its target.
    ///
    /// Returns `None` for a link loop.
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        let symlinks = self.symlinks.lock();
        let mut current = path.to_path_buf();

        for _ in 0..MAX_LINK_HOPS {
            let hop = symlinks.iter().find_map(|(link, target)| {
                current
                    .strip_prefix(link)
                    .ok()
                    .map(|rest| if rest.as_os_str().is_empty() { target.clone() } else { target.join(rest) })
            });
            match hop {
                Some(next) => current = next,
                None => return Some(current),
            }
        }
        None
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    /// A directory exists implicitly when a file or link lives below it.
    fn is_dir(&self, path: &Path) -> bool {
        let below = |entry: &PathBuf| entry != path && entry.starts_with(path);
        self.files.lock().keys().any(below) || self.symlinks.lock().keys().any(below)
    }
}

#[async_trait]
impl Runtime for MemoryRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        *self.reads.lock().entry(path.to_path_buf()).or_default() += 1;

        let panics = self.panicking_reads.lock().contains(path);
        if panics {
            panic!("simulated crash while reading {}", path.display());
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        // Give sibling workers a chance to overlap with this read.
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_reads.lock().contains(path) {
            return Err(RuntimeError::Io(format!(
                "Failed to read {}: permission denied",
                path.display()
            )));
        }

        let real = self
            .resolve(path)
            .ok_or_else(|| RuntimeError::Io(format!("Too many levels of symbolic links: {}", path.display())))?;
        self.files
            .lock()
            .get(&real)
            .cloned()
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        if self.failing_writes.lock().contains(path) {
            return Err(RuntimeError::Io(format!(
                "Failed to write {}: read-only file system",
                path.display()
            )));
        }

        let real = self.resolve(path).unwrap_or_else(|| path.to_path_buf());
        self.files.lock().insert(real, content.to_vec());
        self.writes.lock().push(path.to_path_buf());
        Ok(())
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        self.probes.fetch_add(1, Ordering::SeqCst);

        let is_symlink = self.symlinks.lock().contains_key(path);
        let Some(real) = self.resolve(path) else {
            return Ok(FileMetadata {
                is_symlink,
                ..FileMetadata::default()
            });
        };

        let metadata = FileMetadata {
            is_dir: self.is_dir(&real),
            is_file: self.is_file(&real),
            is_symlink,
        };
        if metadata.is_dir || metadata.is_file || is_symlink {
            Ok(metadata)
        } else {
            Err(RuntimeError::FileNotFound(path.to_path_buf()))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path)
            .is_some_and(|real| self.is_file(&real) || self.is_dir(&real))
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        if self.failing_dirs.lock().contains(path) {
            return Err(RuntimeError::Io(format!(
                "Failed to read directory {}: permission denied",
                path.display()
            )));
        }

        let real = self
            .resolve(path)
            .filter(|real| self.is_dir(real))
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))?;

        let first_component = |entry: &PathBuf| {
            entry
                .strip_prefix(&real)
                .ok()
                .and_then(|rest| rest.components().next())
                .map(|first| first.as_os_str().to_string_lossy().into_owned())
        };
        let mut names: BTreeSet<String> = self.files.lock().keys().filter_map(first_component).collect();
        names.extend(self.symlinks.lock().keys().filter_map(first_component));

        Ok(names.into_iter().collect())
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}
