//! Bulk load of `key:value` lines.

use super::CliError;
use hashkv_core::{Key, Manager};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Parses `key:value` lines.
///
/// The key ends at the first `:`. Both sides are trimmed and blank lines are
/// skipped. Lines are returned in file order, duplicates included, so the
/// store reports them as duplicates on insert.
///
/// # Errors
///
/// Returns [`CliError::MalformedLine`] for a line without a `:` or with an
/// empty key.
pub fn parse_entries(text: &str) -> Result<Vec<(Key, String)>, CliError> {
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let malformed = || CliError::MalformedLine {
            line: number + 1,
            content: line.to_string(),
        };
        let (key, value) = line.split_once(':').ok_or_else(malformed)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed());
        }
        let key = match key.parse::<Key>() {
            Ok(key) => key,
            Err(never) => match never {},
        };
        entries.push((key, value.trim().to_string()));
    }
    Ok(entries)
}

/// Runs `load`: inserts every entry of `path`, reports each result, then
/// prints the full listing. Returns whether every insert succeeded.
///
/// The file is parsed completely before anything is inserted.
pub fn run(manager: &Manager, path: &Path, out: &mut impl Write) -> Result<bool, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_entries(&text)?;
    debug!(path = %path.display(), entries = entries.len(), "loading entries");

    let mut all_ok = true;
    for (key, value) in entries {
        let result = manager.insert(key, value);
        writeln!(out, "{}", result.message)?;
        all_ok &= result.succeeded;
    }

    for line in manager.list_all_entries()? {
        writeln!(out, "{line}")?;
    }
    Ok(all_ok)
}
