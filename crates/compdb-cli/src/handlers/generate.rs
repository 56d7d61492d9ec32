use crate::presentation::ConsoleReporter;
use anyhow::Result;
use compdb_core::{CancellationToken, Config, GenerateOutcome, GenerateService};
use std::path::{Path, PathBuf};

pub fn handle(
    config: Config,
    out_dir: &Path,
    search_paths: &[PathBuf],
    destination: &Path,
    cancel: CancellationToken,
) -> Result<GenerateOutcome> {
    let mut reporter = ConsoleReporter::stderr();
    let service = GenerateService::new(config).with_cancellation(cancel);

    let result = service.run(out_dir, search_paths, destination, |progress| {
        reporter.render(&progress)
    });

    match result {
        Ok(outcome) => {
            reporter.finish(&outcome);
            Ok(outcome)
        }
        Err(err) => {
            reporter.interrupt();
            Err(err.into())
        }
    }
}
