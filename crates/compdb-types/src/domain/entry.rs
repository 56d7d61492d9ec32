use serde::{Deserialize, Serialize};

/// One compiled translation unit, as consumed by clangd and friends.
///
/// Field order is the serialized order; downstream tools key on these exact names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompileEntry {
    /// Absolute build output directory, identical for every entry in a run
    pub directory: String,

    /// Compiler invocation exactly as the build system recorded it
    pub command: String,

    /// Source path as recorded by the build system (may be relative to `directory`)
    pub file: String,

    /// Object file identifier, e.g. `kernel/sched/core.o`
    pub output: String,
}

impl CompileEntry {
    pub fn new(
        directory: impl Into<String>,
        command: impl Into<String>,
        file: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            command: command.into(),
            file: file.into(),
            output: output.into(),
        }
    }
}
