//! Bounded-concurrency batch processing of emitted files.
//!
//! A fixed pool of worker tasks drains a shared [`WorkQueue`]: each worker
//! pops a file, reads it, rewrites it and writes it back if it changed, then
//! pops the next one. At most `concurrency` files are in flight at any
//! instant, and the batch only completes once every worker has been joined.
//! A failure on one file is recorded in its report and the worker moves on,
//! and so is a panic: each file runs in its own task, and reports already
//! produced by a worker are kept even if that worker dies.

use std::any::Any;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::context::RewriteContext;
use crate::report::{FileError, FileOutcome, FileReport};

/// Default number of files processed concurrently.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Pending files, owned by the scheduler and shared only with its workers.
#[derive(Debug, Default)]
pub struct WorkQueue {
    pending: Mutex<VecDeque<PathBuf>>,
}

impl WorkQueue {
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            pending: Mutex::new(files.into_iter().collect()),
        }
    }

    /// Take the next pending file.
    pub fn next(&self) -> Option<PathBuf> {
        self.pending.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

/// Output of a batch: per-file reports plus any worker panics.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub files: Vec<FileReport>,
    pub panics: Vec<String>,
}

/// Worker pool driving the rewriter over a file set.
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    concurrency: usize,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl BatchScheduler {
    /// Create a scheduler; a concurrency of zero is treated as one.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process every file, returning once all workers have finished.
    ///
    /// Reports are sorted by path so output does not depend on scheduling.
    pub async fn run(&self, context: Arc<RewriteContext>, files: Vec<PathBuf>) -> BatchOutcome {
        let workers = self.concurrency.min(files.len());
        let queue = Arc::new(WorkQueue::new(files));
        let reports = Arc::new(Mutex::new(Vec::new()));
        let mut join_set = JoinSet::new();

        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            let context = Arc::clone(&context);
            let reports = Arc::clone(&reports);

            join_set.spawn(async move {
                let mut processed = 0usize;
                while let Some(path) = queue.next() {
                    let report = isolate_file(Arc::clone(&context), path).await;
                    reports.lock().push(report);
                    processed += 1;
                }
                debug!(worker, processed, "Worker finished");
            });
        }

        let mut outcome = BatchOutcome::default();
        while let Some(joined) = join_set.join_next().await {
            if let Err(join_err) = joined {
                error!(error = %join_err, "Rewrite worker panicked");
                outcome.panics.push(format!("Rewrite worker panicked: {}", join_err));
            }
        }

        outcome.files = std::mem::take(&mut *reports.lock());
        outcome.files.sort_by(|a, b| a.path.cmp(&b.path));
        outcome
    }
}

/// Process one file in its own task so a panic fails only that file.
async fn isolate_file(context: Arc<RewriteContext>, path: PathBuf) -> FileReport {
    let task_path = path.clone();
    match tokio::spawn(async move { process_file(&context, task_path).await }).await {
        Ok(report) => report,
        Err(join_err) => {
            let message = if join_err.is_panic() {
                panic_message(join_err.into_panic())
            } else {
                join_err.to_string()
            };
            let error = FileError::Panicked {
                path: path.clone(),
                message,
            };
            error!("{}", error);
            FileReport::failed(path, error)
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .unwrap_or_else(|| "unknown panic".to_string()),
    }
}

/// Read, rewrite and (if changed) write back one file.
async fn process_file(context: &RewriteContext, path: PathBuf) -> FileReport {
    let runtime = context.runtime.as_ref();

    let bytes = match runtime.read_file(&path).await {
        Ok(bytes) => bytes,
        Err(source) => {
            let error = FileError::Read { path: path.clone(), source };
            warn!("{}", error);
            return FileReport::failed(path, error);
        }
    };

    let Ok(text) = String::from_utf8(bytes) else {
        let error = FileError::NotUtf8(path.clone());
        warn!("{}", error);
        return FileReport::failed(path, error);
    };

    let rewritten = context.rewriter().rewrite(&text, &path).await;

    let outcome = if !rewritten.is_changed() {
        FileOutcome::Unchanged
    } else if context.config.dry_run {
        debug!(file = %path.display(), replacements = rewritten.replaced, "Would rewrite");
        FileOutcome::Rewritten {
            replacements: rewritten.replaced,
        }
    } else {
        match runtime.write_file(&path, rewritten.code.as_bytes()).await {
            Ok(()) => {
                debug!(file = %path.display(), replacements = rewritten.replaced, "Rewrote");
                FileOutcome::Rewritten {
                    replacements: rewritten.replaced,
                }
            }
            Err(source) => {
                let error = FileError::Write {
                    path: path.clone(),
                    source,
                };
                warn!("{}", error);
                FileOutcome::Failed(error)
            }
        }
    };

    FileReport {
        path,
        outcome,
        unresolved: rewritten.unresolved,
    }
}
