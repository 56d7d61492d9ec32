use super::args::Cli;
use super::handlers;
use anyhow::{Context, Result};
use compdb_core::{CancellationToken, resolve_config_path, resolve_out_dir};
use tracing::debug;

/// Exit status after Ctrl-C, matching shells' 128 + SIGINT
pub const EXIT_INTERRUPTED: u8 = 130;

pub fn run(cli: Cli, cancel: CancellationToken) -> Result<()> {
    let out_dir = resolve_out_dir(cli.out_dir.as_deref())
        .context("Failed to resolve build output directory")?;

    let location = resolve_config_path(&out_dir);
    let config = location
        .load()
        .with_context(|| format!("Failed to load {}", location.path().display()))?;
    debug!(out_dir = %out_dir.display(), config = ?config, "resolved settings");

    let destination = config.output.clone();
    handlers::generate::handle(config, &out_dir, &cli.search_paths, &destination, cancel)?;

    Ok(())
}

/// Map a failed run to a process exit status
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<compdb_core::Error>() {
        Some(compdb_core::Error::Cancelled) => EXIT_INTERRUPTED,
        _ => 1,
    }
}
