use crate::{Error, Result};
use compdb_types::CompilationDatabase;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// File name clangd and most indexers look for
pub const DEFAULT_DATABASE_NAME: &str = "compile_commands.json";

/// Render the database as a one-space indented JSON array
pub fn render_database(database: &CompilationDatabase) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    database.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Replace `destination` with the serialized database.
///
/// The document is written to a temporary file next to the destination and
/// renamed over it, so readers see either the old file or the complete new one.
/// On failure the temporary file is removed and the destination is untouched.
pub fn write_database(database: &CompilationDatabase, destination: &Path) -> Result<()> {
    let content = render_database(database)?;

    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let write_err = |source| Error::Write {
        path: destination.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".compile_commands.")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_err)?;

    publish(&mut tmp, &content).map_err(write_err)?;

    tmp.persist(destination).map_err(|err| write_err(err.error))?;

    Ok(())
}

fn publish(tmp: &mut NamedTempFile, content: &[u8]) -> std::io::Result<()> {
    tmp.write_all(content)?;
    tmp.flush()?;

    // NamedTempFile is created 0600; a database is meant to be shared
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    tmp.as_file().sync_all()
}
