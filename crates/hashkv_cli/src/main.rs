//! HashKV CLI
//!
//! Command-line access to a HashKV store.
//!
//! # Commands
//!
//! - `insert` / `delete` / `search` - Single-key operations
//! - `range` - Integer range query
//! - `list` - Entries of one bucket or of all buckets
//! - `load` - Bulk insert from a file of `key:value` lines
//! - `inspect` - Bucket statistics and mirror contents

mod commands;

use clap::{Parser, Subcommand};
use commands::{CliError, StoreOptions};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// HashKV command-line store tools.
#[derive(Parser)]
#[command(name = "hashkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory for local bucket artifacts
    #[arg(global = true, short, long)]
    data_dir: Option<PathBuf>,

    /// Shared directory used as the bucket mirror
    #[arg(global = true, short, long)]
    mirror_dir: Option<PathBuf>,

    /// Number of buckets
    #[arg(global = true, short, long, default_value_t = hashkv_core::DEFAULT_BUCKET_COUNT)]
    buckets: usize,

    /// Keep going when the mirror or local artifacts fail
    #[arg(global = true, long)]
    lenient: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a value under a new key
    Insert {
        /// Key (integer or text)
        key: String,
        /// Value
        value: String,
    },

    /// Remove a key
    Delete {
        /// Key (integer or text)
        key: String,
    },

    /// Look up a key
    Search {
        /// Key (integer or text)
        key: String,
    },

    /// List entries with integer keys between two bounds (inclusive)
    Range {
        /// First bound
        #[arg(allow_negative_numbers = true)]
        start: i64,
        /// Second bound
        #[arg(allow_negative_numbers = true)]
        end: i64,
    },

    /// List entries
    List {
        /// Only list this bucket
        #[arg(long)]
        bucket: Option<usize>,
    },

    /// Insert every `key:value` line of a file, then list all entries
    Load {
        /// File with one `key:value` entry per line
        file: PathBuf,
    },

    /// Display bucket statistics and mirror contents
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool, CliError> {
    let options = StoreOptions {
        data_dir: cli.data_dir,
        mirror_dir: cli.mirror_dir,
        buckets: cli.buckets,
        lenient: cli.lenient,
    };
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Version => {
            commands::version(&mut out)?;
            Ok(true)
        }
        Commands::Insert { key, value } => {
            commands::entry::insert(&options.open()?, &key, value, &mut out)
        }
        Commands::Delete { key } => commands::entry::delete(&options.open()?, &key, &mut out),
        Commands::Search { key } => commands::entry::search(&options.open()?, &key, &mut out),
        Commands::Range { start, end } => {
            commands::range::run(&options.open()?, start, end, &mut out)
        }
        Commands::List { bucket } => commands::list::run(&options.open()?, bucket, &mut out),
        Commands::Load { file } => commands::load::run(&options.open()?, &file, &mut out),
        Commands::Inspect { format } => {
            let format = format.parse()?;
            commands::inspect::run(&options, &options.open()?, format, &mut out)?;
            Ok(true)
        }
    }
}
