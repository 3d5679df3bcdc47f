//! # logarchive-cli
//!
//! Command-line shell over `logarchive-core`.
//!
//! ## Commands
//!
//! - `logarchive cat` / `merge` - decode and concatenate, or merge sorted logs
//! - `logarchive compress` / `delete` / `debug` / `list` / `upload` - walk a log tree
//! - `logarchive read` / `dates` - read-endpoint resolution against a directory
//! - `logarchive benchmark` / `modes` - codec comparison and mode vocabulary
//! - `logarchive store-*` - directory-backed object store
//!
//! ## Configuration
//!
//! - `LOGARCHIVE_STORE_DIR` - object store root
//! - `LOGARCHIVE_WORKING_DIR` - read endpoint root (default: `.`)
//! - `LOGARCHIVE_CHUNK_SIZE` - read chunk size in bytes
//! - `RUST_LOG` - overrides `--verbose`/`--quiet`

#![forbid(unsafe_code)]

pub mod commands;

use clap::{Parser, Subcommand};

/// Log archive toolkit.
#[derive(Debug, Parser)]
#[command(name = "logarchive")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Debug logging.
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Warnings and errors only.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode (or re-encode) files and concatenate them.
    Cat(commands::stream::CatArgs),
    /// Merge sorted log files line by line.
    Merge(commands::stream::MergeArgs),
    /// Re-encode matching files in place.
    Compress(commands::filetree::WalkArgs),
    /// Delete matching files.
    Delete(commands::filetree::WalkArgs),
    /// Log every matching file.
    Debug(commands::filetree::WalkArgs),
    /// Print matching files.
    List(commands::filetree::WalkArgs),
    /// Upload matching files into the object store.
    Upload(commands::filetree::UploadArgs),
    /// Read a file the way the read endpoint would serve it.
    Read(commands::serve::ReadArgs),
    /// Index dated log files below a path.
    Dates(commands::serve::DatesArgs),
    /// Compare codecs on one file.
    Benchmark(commands::bench::BenchArgs),
    /// List compression modes.
    Modes,
    /// Store one file as an object.
    StorePut(commands::store::StorePutArgs),
    /// List objects.
    StoreList(commands::store::StoreListArgs),
    /// Object counts and sizes per directory.
    StoreDu(commands::store::StoreDuArgs),
    /// Write an object body to stdout or a file.
    StoreGet(commands::store::StoreGetArgs),
    /// Delete objects whose key ends with a suffix.
    StoreDeleteBySuffix(commands::store::StoreDeleteArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_and_quiet_pick_log_level() {
        let cli = Cli::parse_from(["logarchive", "modes"]);
        assert_eq!(cli.log_level(), "info");

        let cli = Cli::parse_from(["logarchive", "-v", "modes"]);
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::parse_from(["logarchive", "modes", "--quiet"]);
        assert_eq!(cli.log_level(), "warn");

        assert!(Cli::try_parse_from(["logarchive", "-v", "-q", "modes"]).is_err());
    }

    #[test]
    fn walk_flags_parse() {
        let cli = Cli::parse_from([
            "logarchive",
            "compress",
            "--top",
            "/var/log/app",
            "--older",
            "2d",
            "--bigger",
            "1k",
            "--compress",
            "xz",
            "--dry",
        ]);
        let Commands::Compress(args) = cli.command else {
            panic!("expected compress");
        };
        assert!(args.dry);
        assert_eq!(args.compress, "xz");
        assert_eq!(args.filter.older.as_deref(), Some("2d"));
        assert!(args.filter.to_filter().is_ok());
    }

    #[test]
    fn store_subcommands_are_kebab_case() {
        let cli = Cli::parse_from([
            "logarchive",
            "store-delete-by-suffix",
            "--store-dir",
            "/tmp/store",
            "--suffix",
            ".gz",
        ]);
        assert!(matches!(cli.command, Commands::StoreDeleteBySuffix(_)));
    }

    #[test]
    fn benchmark_takes_repeated_modes() {
        let cli = Cli::parse_from(["logarchive", "benchmark", "a.log", "-c", "gzip", "-c", "xz"]);
        let Commands::Benchmark(args) = cli.command else {
            panic!("expected benchmark");
        };
        assert_eq!(args.modes, vec!["gzip", "xz"]);
    }
}
