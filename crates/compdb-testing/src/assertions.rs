//! Assertions over a written compile_commands.json.

use anyhow::{Context, Result};
use serde_json::Value;

const FIELDS: [&str; 4] = ["directory", "command", "file", "output"];

/// Assert the database is an array with exactly `expected` entries.
pub fn assert_entry_count(json: &Value, expected: usize) -> Result<()> {
    let entries = json.as_array().context("Expected top-level JSON array")?;

    if entries.len() != expected {
        anyhow::bail!("Expected {} entries, got {}", expected, entries.len());
    }

    Ok(())
}

/// Assert every entry carries exactly the four string fields.
pub fn assert_entry_shape(json: &Value) -> Result<()> {
    let entries = json.as_array().context("Expected top-level JSON array")?;

    for (i, entry) in entries.iter().enumerate() {
        let object = entry
            .as_object()
            .with_context(|| format!("Entry {} is not an object", i))?;

        if object.len() != FIELDS.len() {
            anyhow::bail!("Entry {} has {} fields, expected 4", i, object.len());
        }
        for field in FIELDS {
            if !object.get(field).is_some_and(Value::is_string) {
                anyhow::bail!("Entry {} missing string field '{}'", i, field);
            }
        }
    }

    Ok(())
}

/// Assert that the entry for `output` exists and has the given source and directory.
pub fn assert_has_entry(json: &Value, output: &str, file: &str, directory: &str) -> Result<()> {
    let entries = json.as_array().context("Expected top-level JSON array")?;

    let entry = entries
        .iter()
        .find(|e| e["output"] == output)
        .with_context(|| format!("No entry for output {}", output))?;

    if entry["file"] != file {
        anyhow::bail!("Entry {} has file {} but expected {}", output, entry["file"], file);
    }
    if entry["directory"] != directory {
        anyhow::bail!(
            "Entry {} has directory {} but expected {}",
            output,
            entry["directory"],
            directory
        );
    }

    Ok(())
}

/// Assert that no entry references `output`.
pub fn assert_no_entry(json: &Value, output: &str) -> Result<()> {
    let entries = json.as_array().context("Expected top-level JSON array")?;

    if entries.iter().any(|e| e["output"] == output) {
        anyhow::bail!("Unexpected entry for output {}", output);
    }

    Ok(())
}
