use clap::Parser;
use compdb::presentation::print_error;
use compdb::{Cli, EXIT_INTERRUPTED, exit_code_for, run};
use compdb_core::CancellationToken;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    let cancel = CancellationToken::new();
    install_interrupt_handler(cancel.clone());

    match run(cli, cancel) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

// Quiet by default; RUST_LOG=compdb_core=debug shows pool sizing and discovery counts
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn install_interrupt_handler(cancel: CancellationToken) {
    // First Ctrl-C lets workers stop after their current file; the second exits at once
    let installed = ctrlc::set_handler(move || {
        if cancel.is_cancelled() {
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
        cancel.cancel();
    });

    if let Err(err) = installed {
        tracing::warn!(error = %err, "could not install Ctrl-C handler");
    }
}
