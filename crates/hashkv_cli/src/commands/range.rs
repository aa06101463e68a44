//! Range command implementation.

use super::CliError;
use hashkv_core::Manager;
use std::io::Write;

/// Runs `range`. Returns false if nothing matched.
pub fn run(manager: &Manager, start: i64, end: i64, out: &mut impl Write) -> Result<bool, CliError> {
    let entries = manager.range_query(start, end)?;
    if entries.is_empty() {
        writeln!(out, "No entries between {start} and {end}.")?;
        return Ok(false);
    }
    for entry in &entries {
        writeln!(out, "{entry}")?;
    }
    Ok(true)
}
