//! Inspect command implementation.

use super::{CliError, StoreOptions};
use hashkv_core::{Manager, StoreStats, SyncPolicy};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Output format for `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(CliError::UnknownFormat(other.to_string())),
        }
    }
}

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Local artifact directory, if any.
    pub data_dir: Option<String>,
    /// Mirror directory, if any.
    pub mirror_dir: Option<String>,
    /// Sync policy name.
    pub sync_policy: &'static str,
    /// Bucket statistics.
    #[serde(flatten)]
    pub stats: StoreStats,
    /// Every artifact name currently in the mirror.
    pub mirror_artifacts: Vec<String>,
}

/// Runs the inspect command.
pub fn run(
    options: &StoreOptions,
    manager: &Manager,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let result = InspectResult {
        data_dir: options.data_dir.as_ref().map(|p| p.display().to_string()),
        mirror_dir: options.mirror_dir.as_ref().map(|p| p.display().to_string()),
        sync_policy: match manager.config().sync_policy {
            SyncPolicy::Strict => "strict",
            SyncPolicy::Lenient => "lenient",
        },
        stats: manager.stats()?,
        mirror_artifacts: manager.mirror().list().map_err(hashkv_core::CoreError::from)?,
    };

    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?,
        OutputFormat::Text => print_text_output(&result, out)?,
    }
    Ok(())
}

fn print_text_output(result: &InspectResult, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "HashKV Store Inspection")?;
    writeln!(out, "=======================")?;
    writeln!(out)?;
    writeln!(
        out,
        "Data dir:    {}",
        result.data_dir.as_deref().unwrap_or("(memory)")
    )?;
    writeln!(
        out,
        "Mirror dir:  {}",
        result.mirror_dir.as_deref().unwrap_or("(memory)")
    )?;
    writeln!(out, "Sync policy: {}", result.sync_policy)?;
    writeln!(out)?;
    writeln!(out, "Buckets: {}", result.stats.bucket_count)?;
    for bucket in &result.stats.buckets {
        writeln!(
            out,
            "  [{}] {:>6} keys  {}{}",
            bucket.index,
            bucket.keys,
            bucket.mirror_name,
            if bucket.mirrored { "" } else { " (not mirrored)" }
        )?;
    }
    writeln!(out, "Total keys: {}", result.stats.total_keys)?;
    writeln!(out)?;
    writeln!(out, "Mirror artifacts: {}", result.mirror_artifacts.len())?;
    for name in &result.mirror_artifacts {
        writeln!(out, "  {name}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn options(root: &std::path::Path) -> StoreOptions {
        StoreOptions {
            data_dir: Some(root.join("data")),
            mirror_dir: Some(root.join("share")),
            buckets: 4,
            lenient: false,
        }
    }

    #[test]
    fn parse_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(CliError::UnknownFormat(_))
        ));
    }

    #[test]
    fn json_output() {
        let temp = tempdir().unwrap();
        let opts = options(temp.path());
        let manager = opts.open().unwrap();
        manager.insert(5, "x");
        manager.insert(9, "y");

        let mut out = Vec::new();
        run(&opts, &manager, OutputFormat::Json, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["bucket_count"], 4);
        assert_eq!(json["total_keys"], 2);
        assert_eq!(json["sync_policy"], "strict");
        assert_eq!(json["buckets"][1]["keys"], 2);
        assert_eq!(json["mirror_artifacts"], serde_json::json!(["bucket1.txt"]));
    }

    #[test]
    fn text_output() {
        let temp = tempdir().unwrap();
        let opts = options(temp.path());
        let manager = opts.open().unwrap();
        manager.insert(2, "a");

        let mut out = Vec::new();
        run(&opts, &manager, OutputFormat::Text, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Buckets: 4"));
        assert!(text.contains("bucket0.txt (not mirrored)"));
        assert!(text.contains("Total keys: 1"));
    }
}
