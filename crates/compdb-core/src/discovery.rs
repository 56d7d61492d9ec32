use crate::Result;
use glob::Pattern;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File name pattern Kbuild uses for per-object command records
pub const DEFAULT_RECORD_PATTERN: &str = "*.o.cmd";

/// Finds command record files under a set of search roots.
///
/// Directories are walked recursively and filtered by file name; any other
/// entry is taken verbatim as a record path without checking that it exists,
/// so a bad path surfaces as a read error once parsing starts.
#[derive(Debug, Clone)]
pub struct RecordDiscovery {
    pattern: Pattern,
    dedup_paths: bool,
}

impl Default for RecordDiscovery {
    fn default() -> Self {
        Self {
            pattern: Pattern::new(DEFAULT_RECORD_PATTERN).expect("default pattern is valid"),
            dedup_paths: false,
        }
    }
}

impl RecordDiscovery {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Pattern::new(pattern)?,
            dedup_paths: false,
        })
    }

    /// Drop repeated record paths (compared as absolute paths), keeping the first.
    /// Off by default: overlapping roots yield the same record twice.
    pub fn with_dedup_paths(mut self, dedup_paths: bool) -> Self {
        self.dedup_paths = dedup_paths;
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn discover(&self, search_paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for search_path in search_paths {
            if search_path.is_dir() {
                let before = files.len();
                self.walk(search_path, &mut files);
                debug!(
                    root = %search_path.display(),
                    count = files.len() - before,
                    "scanned search root"
                );
            } else {
                files.push(search_path.clone());
            }
        }

        if self.dedup_paths {
            dedup_by_absolute_path(files)
        } else {
            files
        }
    }

    fn walk(&self, root: &Path, files: &mut Vec<PathBuf>) {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "skipping unreadable path");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.pattern.matches(name));

            if matches {
                files.push(entry.into_path());
            }
        }
    }
}

/// Search roots for a run: the given paths, or the output directory when none are given
pub fn search_roots(search_paths: &[PathBuf], out_dir: &Path) -> Vec<PathBuf> {
    if search_paths.is_empty() {
        vec![out_dir.to_path_buf()]
    } else {
        search_paths.to_vec()
    }
}

fn dedup_by_absolute_path(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|path| {
            let key = std::path::absolute(path).unwrap_or_else(|_| path.clone());
            seen.insert(key)
        })
        .collect()
}
