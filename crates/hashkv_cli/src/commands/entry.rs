//! Single-key commands.

use super::CliError;
use hashkv_core::{Key, Manager, OperationResult};
use std::io::Write;

/// Runs `insert`. Returns whether the operation succeeded.
pub fn insert(
    manager: &Manager,
    key: &str,
    value: String,
    out: &mut impl Write,
) -> Result<bool, CliError> {
    report(manager.insert(parse(key), value), out)
}

/// Runs `delete`. Returns whether the operation succeeded.
pub fn delete(manager: &Manager, key: &str, out: &mut impl Write) -> Result<bool, CliError> {
    report(manager.delete(parse(key)), out)
}

/// Runs `search`. Returns whether the operation succeeded.
pub fn search(manager: &Manager, key: &str, out: &mut impl Write) -> Result<bool, CliError> {
    report(manager.search(parse(key)), out)
}

fn parse(raw: &str) -> Key {
    match raw.parse::<Key>() {
        Ok(key) => key,
        Err(never) => match never {},
    }
}

fn report(result: OperationResult, out: &mut impl Write) -> Result<bool, CliError> {
    writeln!(out, "{}", result.message)?;
    Ok(result.succeeded)
}
