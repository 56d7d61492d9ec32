mod args;
mod commands;
mod handlers;
pub mod presentation;

pub use args::Cli;
pub use commands::{EXIT_INTERRUPTED, exit_code_for, run};
