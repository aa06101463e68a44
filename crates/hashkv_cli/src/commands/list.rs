//! List command implementation.

use super::CliError;
use hashkv_core::Manager;
use std::io::Write;

/// Runs `list`, for one bucket or for all of them.
pub fn run(manager: &Manager, bucket: Option<usize>, out: &mut impl Write) -> Result<bool, CliError> {
    let lines = match bucket {
        Some(index) => manager.list_entries(index)?,
        None => manager.list_all_entries()?,
    };
    for line in &lines {
        writeln!(out, "{line}")?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashkv_core::Config;

    #[test]
    fn lists_all_with_headers() {
        let manager = Manager::open(Config::new().bucket_count(2)).unwrap();
        manager.insert(1, "one");

        let mut out = Vec::new();
        run(&manager, None, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Bucket 0\nBucket 1\n1 : one\n");
    }

    #[test]
    fn single_bucket() {
        let manager = Manager::open(Config::new().bucket_count(2)).unwrap();
        manager.insert(1, "one");
        manager.insert(2, "two");

        let mut out = Vec::new();
        run(&manager, Some(0), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 : two\n");

        assert!(run(&manager, Some(5), &mut Vec::new()).is_err());
    }
}
