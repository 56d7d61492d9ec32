//! Isolated build tree for integration tests.
//!
//! Layout under a fresh temp dir:
//! - `out/`: build output directory holding the command records
//! - the temp root itself is the working directory, so the database
//!   lands at `<root>/compile_commands.json`

use anyhow::{Context, Result};
use assert_cmd::Command;
use compdb_types::CompilationDatabase;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::{gcc_command, kbuild_record, record_path_for};

/// Declarative build tree builder.
///
/// # Example
/// ```no_run
/// use compdb_testing::BuildTree;
///
/// let tree = BuildTree::new().with_object("kernel/fork.o", "kernel/fork.c");
/// let result = tree.run(&["-O", "out"]).unwrap();
/// assert!(result.success());
/// ```
pub struct BuildTree {
    temp_dir: TempDir,
    out_dir: PathBuf,
    cwd: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for BuildTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildTree {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let out_dir = root.join("out");
        fs::create_dir_all(&out_dir).expect("Failed to create out dir");

        Self {
            temp_dir,
            out_dir,
            cwd: root,
            env_vars: HashMap::new(),
        }
    }

    /// Temp root, also the working directory for CLI runs
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Where the CLI writes with default configuration
    pub fn database_path(&self) -> PathBuf {
        self.cwd.join("compile_commands.json")
    }

    /// Add a Kbuild record for `output` compiled from `source` with a gcc command line.
    pub fn with_object(self, output: &str, source: &str) -> Self {
        let command = gcc_command(output, source);
        self.write_record(&record_path_for(output), &kbuild_record(output, source, &command))
            .expect("Failed to write record");
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write raw text at `relative` under the out dir, creating parents.
    pub fn write_record(&self, relative: &str, content: &str) -> Result<PathBuf> {
        self.write_bytes(relative, content.as_bytes())
    }

    /// Write raw bytes at `relative` under the out dir (e.g. a corrupt record).
    pub fn write_bytes(&self, relative: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.out_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Put a file at the database location, e.g. to check it survives a failed run.
    pub fn seed_database(&self, content: &str) -> Result<()> {
        fs::write(self.database_path(), content)?;
        Ok(())
    }

    pub fn read_database_text(&self) -> Result<String> {
        let path = self.database_path();
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    pub fn read_database(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.read_database_text()?)?)
    }

    pub fn load_database(&self) -> Result<CompilationDatabase> {
        Ok(serde_json::from_str(&self.read_database_text()?)?)
    }

    /// Files left in the working directory, excluding the out dir
    pub fn cwd_entries(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.cwd)? {
            let entry = entry?;
            if entry.path() == self.out_dir {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    /// Configure a CLI command with this tree's working directory and env vars.
    ///
    /// Inherited COMPDB_* variables are cleared so the host environment
    /// cannot leak into a test.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.current_dir(&self.cwd)
            .env_remove("COMPDB_OUT_DIR")
            .env_remove("COMPDB_CONFIG")
            .env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `compdb` binary with `args` inside this tree.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("compdb")
            .map_err(|e| anyhow::anyhow!("Failed to find compdb binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
