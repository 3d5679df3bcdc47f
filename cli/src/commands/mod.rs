//! Subcommand implementations. Each is a thin shell over `logarchive-core`.

pub mod bench;
pub mod filetree;
pub mod serve;
pub mod store;
pub mod stream;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use logarchive_core::config::FilterConfig;
use logarchive_core::filetree::FileFilter;
use logarchive_core::stream::{open_output, OutputSink};

/// File selection flags shared by the walk commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only files modified at least this long ago (`2d`, `36h`, `1w`).
    #[arg(long)]
    pub older: Option<String>,

    /// Only files modified within this duration.
    #[arg(long)]
    pub newer: Option<String>,

    /// Only files at least this large (`1k`, `4.1k`, `10M`).
    #[arg(long)]
    pub bigger: Option<String>,

    /// Only files at most this large.
    #[arg(long)]
    pub smaller: Option<String>,

    /// Day or half-open day range named by the file: `2024-01-01..2024-01-08`.
    #[arg(long)]
    pub date: Option<String>,

    /// Glob over the file name.
    #[arg(long)]
    pub name: Option<String>,
}

impl FilterArgs {
    pub fn to_config(&self) -> FilterConfig {
        FilterConfig {
            older: self.older.clone(),
            newer: self.newer.clone(),
            bigger: self.bigger.clone(),
            smaller: self.smaller.clone(),
            date: self.date.clone(),
            name: self.name.clone(),
        }
    }

    pub fn to_filter(&self) -> Result<FileFilter> {
        FileFilter::from_config(&self.to_config()).context("invalid filter")
    }
}

pub(crate) fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("non UTF-8 path: {}", path.display()))
}

/// `--output` file, or stdout.
pub(crate) fn output(path: Option<&PathBuf>) -> Result<Box<dyn std::io::Write + Send>> {
    let sink = match path {
        Some(p) => OutputSink::File(p.clone()),
        None => OutputSink::Stdout,
    };
    open_output(sink).context("cannot open output")
}
