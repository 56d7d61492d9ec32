mod database;
mod entry;

pub use database::CompilationDatabase;
pub use entry::CompileEntry;
