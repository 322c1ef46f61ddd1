//! Per-file outcomes and the run summary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheStats;
use crate::rewriter::UnresolvedImport;
use crate::runtime::RuntimeError;

/// A fault confined to a single file.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("{} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),

    #[error("Processing {} panicked: {message}", .path.display())]
    Panicked { path: PathBuf, message: String },
}

/// What happened to one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Nothing to rewrite; no write issued
    Unchanged,
    /// Content changed (and was written unless running dry)
    Rewritten { replacements: usize },
    Failed(FileError),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub unresolved: Vec<UnresolvedImport>,
}

impl FileReport {
    pub(crate) fn failed(path: PathBuf, error: FileError) -> Self {
        Self {
            path,
            outcome: FileOutcome::Failed(error),
            unresolved: Vec::new(),
        }
    }
}

/// Summary of one run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per discovered file, sorted by path
    pub files: Vec<FileReport>,
    /// Messages from worker tasks that panicked
    pub panics: Vec<String>,
    pub cache: CacheStats,
    pub elapsed: Duration,
    pub dry_run: bool,
}

impl RunReport {
    pub fn files_scanned(&self) -> usize {
        self.files.len()
    }

    pub fn files_rewritten(&self) -> usize {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, FileOutcome::Rewritten { .. }))
            .count()
    }

    pub fn replacements(&self) -> usize {
        self.files
            .iter()
            .map(|file| match file.outcome {
                FileOutcome::Rewritten { replacements } => replacements,
                _ => 0,
            })
            .sum()
    }

    /// Unresolved imports with the file that contains them.
    pub fn unresolved(&self) -> impl Iterator<Item = (&Path, &UnresolvedImport)> {
        self.files.iter().flat_map(|file| {
            file.unresolved
                .iter()
                .map(move |import| (file.path.as_path(), import))
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileError> {
        self.files.iter().filter_map(|file| match &file.outcome {
            FileOutcome::Failed(error) => Some(error),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some() || !self.panics.is_empty()
    }
}
