use crate::discovery::DEFAULT_RECORD_PATTERN;
use crate::writer::DEFAULT_DATABASE_NAME;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional per-build-tree settings file, looked up in the output directory
pub const CONFIG_FILE_NAME: &str = ".compdb.toml";

pub const OUT_DIR_ENV: &str = "COMPDB_OUT_DIR";
pub const CONFIG_PATH_ENV: &str = "COMPDB_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Database path; relative paths are taken from the working directory
    pub output: PathBuf,

    /// Glob matched against record file names during directory walks
    pub pattern: String,

    /// Worker thread count (defaults to host parallelism)
    pub jobs: Option<usize>,

    /// Scan each record path once even if search roots overlap
    pub dedup_paths: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_DATABASE_NAME),
            pattern: DEFAULT_RECORD_PATTERN.to_string(),
            jobs: None,
            dedup_paths: false,
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(Error::Config("jobs must be at least 1".to_string()));
        }
        if self.pattern.is_empty() {
            return Err(Error::Config("pattern must not be empty".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::Config("output must not be empty".to_string()));
        }
        glob::Pattern::new(&self.pattern)?;
        Ok(())
    }
}

/// Resolve the build output directory based on priority:
/// 1. Explicit path (--out-dir)
/// 2. COMPDB_OUT_DIR environment variable
/// 3. Current working directory
///
/// The result is absolute but symlinks are left alone, so `directory`
/// fields match what the user typed.
pub fn resolve_out_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let out_dir = match explicit {
        Some(path) => path.to_path_buf(),
        None => match std::env::var_os(OUT_DIR_ENV) {
            Some(env_path) if !env_path.is_empty() => PathBuf::from(env_path),
            _ => std::env::current_dir()?,
        },
    };

    Ok(std::path::absolute(out_dir)?)
}

/// Where the settings file was looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Named by COMPDB_CONFIG; it must exist
    Explicit(PathBuf),
    /// `<out_dir>/.compdb.toml`; optional
    OutDir(PathBuf),
}

impl ConfigLocation {
    pub fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(path) | ConfigLocation::OutDir(path) => path,
        }
    }

    pub fn load(&self) -> Result<Config> {
        match self {
            ConfigLocation::Explicit(path) if !path.exists() => Err(Error::Config(format!(
                "{} names {}, which does not exist",
                CONFIG_PATH_ENV,
                path.display()
            ))),
            _ => Config::load_from(self.path()),
        }
    }
}

/// Config file location: COMPDB_CONFIG if set, else `<out_dir>/.compdb.toml`
pub fn resolve_config_path(out_dir: &Path) -> ConfigLocation {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => ConfigLocation::Explicit(PathBuf::from(path)),
        _ => ConfigLocation::OutDir(out_dir.join(CONFIG_FILE_NAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join(CONFIG_FILE_NAME)).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.output, PathBuf::from("compile_commands.json"));
        assert_eq!(config.pattern, "*.o.cmd");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "jobs = 3\ndedup_paths = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.jobs, Some(3));
        assert!(config.dedup_paths);
        assert_eq!(config.pattern, DEFAULT_RECORD_PATTERN);
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "jobs = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "jbos = 4\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "pattern = \"[\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Pattern(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let location = ConfigLocation::Explicit(temp.path().join("absent.toml"));

        match location.load() {
            Err(Error::Config(msg)) => {
                assert!(msg.contains(CONFIG_PATH_ENV));
                assert!(msg.contains("absent.toml"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_out_dir_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let location = ConfigLocation::OutDir(temp.path().join(CONFIG_FILE_NAME));

        assert_eq!(location.load().unwrap(), Config::default());
    }

    #[test]
    fn test_existing_explicit_file_is_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ci.toml");
        std::fs::write(&path, "jobs = 2\n").unwrap();

        let config = ConfigLocation::Explicit(path).load().unwrap();
        assert_eq!(config.jobs, Some(2));
    }

    #[test]
    fn test_explicit_out_dir_made_absolute() {
        let resolved = resolve_out_dir(Some(Path::new("build"))).unwrap();

        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("build"));
    }

    #[test]
    fn test_explicit_absolute_out_dir_kept() {
        let resolved = resolve_out_dir(Some(Path::new("/srv/linux/out"))).unwrap();

        assert_eq!(resolved, PathBuf::from("/srv/linux/out"));
    }
}
