use super::entry::CompileEntry;
use serde::{Deserialize, Serialize};

/// Ordered collection of compile entries.
///
/// Order follows worker completion and is not stable between runs;
/// compare databases with [`CompilationDatabase::same_entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilationDatabase(Vec<CompileEntry>);

impl CompilationDatabase {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[CompileEntry] {
        &self.0
    }

    /// First entry produced for the given object identifier
    pub fn find_by_output(&self, output: &str) -> Option<&CompileEntry> {
        self.0.iter().find(|entry| entry.output == output)
    }

    /// Compare as multisets, ignoring order
    pub fn same_entries(&self, other: &CompilationDatabase) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut lhs: Vec<&CompileEntry> = self.0.iter().collect();
        let mut rhs: Vec<&CompileEntry> = other.0.iter().collect();
        lhs.sort_by(|a, b| entry_key(a).cmp(&entry_key(b)));
        rhs.sort_by(|a, b| entry_key(a).cmp(&entry_key(b)));
        lhs == rhs
    }
}

fn entry_key(entry: &CompileEntry) -> (&str, &str, &str, &str) {
    (&entry.output, &entry.file, &entry.command, &entry.directory)
}

impl Extend<CompileEntry> for CompilationDatabase {
    fn extend<I: IntoIterator<Item = CompileEntry>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl From<Vec<CompileEntry>> for CompilationDatabase {
    fn from(entries: Vec<CompileEntry>) -> Self {
        Self(entries)
    }
}
