// Compilation database generation for Kbuild trees
// Records in, compile_commands.json out; the build itself is never invoked

pub mod aggregate;
pub mod config;
pub mod discovery;
mod error;
pub mod generate;
pub mod record;
pub mod writer;

// Public API
pub use aggregate::{AggregateProgress, Aggregator, CancellationToken};
pub use config::{Config, ConfigLocation, resolve_config_path, resolve_out_dir};
pub use discovery::{DEFAULT_RECORD_PATTERN, RecordDiscovery};
pub use error::{Error, Result};
pub use generate::{GenerateOutcome, GenerateProgress, GenerateService};
pub use record::{KbuildRecordParser, RecordParser};
pub use writer::{DEFAULT_DATABASE_NAME, write_database};
