use crate::aggregate::{AggregateProgress, Aggregator, CancellationToken};
use crate::config::Config;
use crate::discovery::{RecordDiscovery, search_roots};
use crate::record::{KbuildRecordParser, RecordParser};
use crate::writer::write_database;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Progress notifications for a whole generate run
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateProgress {
    Discovering { pattern: String },
    NothingFound { roots: Vec<PathBuf> },
    Parsing(AggregateProgress),
    Writing { destination: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The database was written
    Written {
        destination: PathBuf,
        records: usize,
        entries: usize,
    },
    /// No record files matched; nothing was written
    NothingFound,
}

/// Discover → parse in parallel → write, for one build tree
pub struct GenerateService {
    config: Config,
    parser: Arc<dyn RecordParser>,
    cancel: CancellationToken,
}

impl GenerateService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            parser: Arc::new(KbuildRecordParser),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn RecordParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// `out_dir` must already be absolute; it is stamped into every entry.
    /// `destination` is only touched once every record parsed cleanly.
    pub fn run<F>(
        &self,
        out_dir: &Path,
        search_paths: &[PathBuf],
        destination: &Path,
        mut on_progress: F,
    ) -> Result<GenerateOutcome>
    where
        F: FnMut(GenerateProgress),
    {
        // Stamped verbatim into every entry, so no lossy conversion
        let directory = out_dir.to_str().ok_or_else(|| {
            Error::Config(format!(
                "build directory is not valid UTF-8: {}",
                out_dir.display()
            ))
        })?;

        let discovery =
            RecordDiscovery::new(&self.config.pattern)?.with_dedup_paths(self.config.dedup_paths);

        on_progress(GenerateProgress::Discovering {
            pattern: discovery.pattern().to_string(),
        });

        let roots = search_roots(search_paths, out_dir);
        let files = discovery.discover(&roots);
        debug!(count = files.len(), "discovered record files");

        if files.is_empty() {
            on_progress(GenerateProgress::NothingFound { roots });
            return Ok(GenerateOutcome::NothingFound);
        }

        let mut aggregator =
            Aggregator::new(Arc::clone(&self.parser)).with_cancellation(self.cancel.clone());
        if let Some(jobs) = self.config.jobs {
            aggregator = aggregator.with_jobs(jobs);
        }

        let database = aggregator.aggregate(&files, directory, |progress| {
            on_progress(GenerateProgress::Parsing(progress))
        })?;

        on_progress(GenerateProgress::Writing {
            destination: destination.to_path_buf(),
        });
        write_database(&database, destination)?;

        Ok(GenerateOutcome::Written {
            destination: destination.to_path_buf(),
            records: files.len(),
            entries: database.len(),
        })
    }
}
