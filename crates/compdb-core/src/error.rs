use std::fmt;
use std::path::PathBuf;

/// Result type for compdb-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while generating a compilation database
#[derive(Debug)]
pub enum Error {
    /// A command record could not be opened or is not valid text
    RecordRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The database destination could not be created, written or replaced
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO operation failed outside of record reading and database writing
    Io(std::io::Error),

    /// JSON serialization failed
    Json(serde_json::Error),

    /// Configuration file could not be parsed
    Toml(toml::de::Error),

    /// Record file pattern is not a valid glob
    Pattern(glob::PatternError),

    /// Configuration values are inconsistent
    Config(String),

    /// A worker thread panicked while parsing
    WorkerPanicked,

    /// The run was interrupted before every record was parsed
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RecordRead { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            Error::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Toml(err) => write!(f, "Config parse error: {}", err),
            Error::Pattern(err) => write!(f, "Invalid record pattern: {}", err),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
            Error::WorkerPanicked => write!(f, "A parser worker panicked"),
            Error::Cancelled => write!(f, "Interrupted"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::RecordRead { source, .. } | Error::Write { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Toml(err) => Some(err),
            Error::Pattern(err) => Some(err),
            Error::Config(_) | Error::WorkerPanicked | Error::Cancelled => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Self {
        Error::Pattern(err)
    }
}
