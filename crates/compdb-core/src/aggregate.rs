use crate::record::{RecordParser, parse_record_file};
use crate::{Error, Result};
use compdb_types::{CompilationDatabase, CompileEntry};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Sender, channel};
use std::thread;
use tracing::{debug, warn};

/// Shared flag used to stop an aggregation from outside (e.g. Ctrl-C)
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress notifications emitted by [`Aggregator::aggregate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateProgress {
    Started { total: usize },
    FileParsed { processed: usize, total: usize },
}

impl AggregateProgress {
    /// Completed fraction in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        match *self {
            AggregateProgress::Started { .. } => 0.0,
            AggregateProgress::FileParsed { processed, total } => {
                if total == 0 {
                    1.0
                } else {
                    processed as f64 / total as f64
                }
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(*self, AggregateProgress::FileParsed { processed, total } if processed == total)
    }
}

/// Number of worker threads to use when none is configured
pub fn default_jobs() -> usize {
    thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

/// Files handed to a worker per claim: `floor(sqrt(total))`, at least one
pub fn batch_size(total: usize) -> usize {
    total.isqrt().max(1)
}

/// Parses record files on a scoped pool of worker threads.
///
/// Workers claim batches from a shared cursor and stream one result per file
/// back to the calling thread, which alone merges entries and reports
/// progress. The first failure stops the pool; every worker is joined
/// before `aggregate` returns, on success and failure alike.
pub struct Aggregator {
    parser: Arc<dyn RecordParser>,
    jobs: usize,
    cancel: CancellationToken,
}

impl Aggregator {
    pub fn new(parser: Arc<dyn RecordParser>) -> Self {
        Self {
            parser,
            jobs: default_jobs(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn aggregate<F>(
        &self,
        files: &[PathBuf],
        directory: &str,
        mut on_progress: F,
    ) -> Result<CompilationDatabase>
    where
        F: FnMut(AggregateProgress),
    {
        let total = files.len();
        if total == 0 {
            return Ok(CompilationDatabase::new());
        }
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let batches: Vec<&[PathBuf]> = files.chunks(batch_size(total)).collect();
        let workers = self.jobs.min(batches.len());
        debug!(total, batches = batches.len(), workers, "starting parser pool");

        on_progress(AggregateProgress::Started { total });

        let cursor = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);
        let mut database = CompilationDatabase::new();
        let mut failure: Option<Error> = None;
        let mut processed = 0;

        thread::scope(|scope| {
            let (tx, rx) = channel();
            let mut handles = Vec::with_capacity(workers);

            for id in 0..workers {
                let tx = tx.clone();
                let (batches, cursor, abort) = (&batches, &cursor, &abort);
                let spawned = thread::Builder::new()
                    .name(format!("compdb-parse-{id}"))
                    .spawn_scoped(scope, move || {
                        self.run_worker(batches, cursor, abort, directory, &tx)
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        abort.store(true, Ordering::SeqCst);
                        failure.get_or_insert(Error::Io(err));
                        break;
                    }
                }
            }
            drop(tx);

            // Ends once every worker has dropped its sender
            for result in rx {
                match result {
                    Ok(entries) if failure.is_none() && !abort.load(Ordering::SeqCst) => {
                        database.extend(entries);
                        processed += 1;
                        on_progress(AggregateProgress::FileParsed { processed, total });
                    }
                    Ok(_) => {}
                    Err(err) => {
                        abort.store(true, Ordering::SeqCst);
                        failure.get_or_insert(err);
                    }
                }
            }

            for handle in handles {
                if handle.join().is_err() {
                    abort.store(true, Ordering::SeqCst);
                    failure.get_or_insert(Error::WorkerPanicked);
                }
            }
        });

        if let Some(err) = failure {
            return Err(err);
        }
        if processed < total {
            warn!(processed, total, "aggregation interrupted");
            return Err(Error::Cancelled);
        }

        Ok(database)
    }

    fn run_worker(
        &self,
        batches: &[&[PathBuf]],
        cursor: &AtomicUsize,
        abort: &AtomicBool,
        directory: &str,
        tx: &Sender<Result<Vec<CompileEntry>>>,
    ) {
        let _guard = AbortOnPanic(abort);
        loop {
            let Some(batch) = batches.get(cursor.fetch_add(1, Ordering::Relaxed)) else {
                return;
            };

            for path in batch.iter() {
                if abort.load(Ordering::SeqCst) || self.cancel.is_cancelled() {
                    return;
                }

                let result = parse_record_file(self.parser.as_ref(), path, directory);
                let failed = result.is_err();
                if failed {
                    abort.store(true, Ordering::SeqCst);
                }
                if tx.send(result).is_err() || failed {
                    return;
                }
            }
        }
    }
}

/// Raises the pool's abort flag if a worker unwinds, so siblings stop
/// claiming work instead of draining the queue before the join notices.
struct AbortOnPanic<'a>(&'a AtomicBool);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::SeqCst);
        }
    }
}
