//! compress / delete / debug / list / upload - file-tree walks.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use logarchive_core::compression::registry;
use logarchive_core::config::ProcessConfig;
use logarchive_core::constants::DEFAULT_PROCESS_MODE;
use logarchive_core::filetree::{
    process_walk, CompressProcessor, DebugProcessor, DeleteProcessor, FileProcessor, ListProcessor,
    UploadProcessor, WalkSummary,
};

use super::store::StoreArgs;
use super::FilterArgs;

#[derive(Debug, Args)]
pub struct WalkArgs {
    /// Root of the log tree.
    #[arg(long)]
    pub top: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Only report what would be done.
    #[arg(long)]
    pub dry: bool,

    /// Target compression mode.
    #[arg(long, default_value = DEFAULT_PROCESS_MODE)]
    pub compress: String,

    /// JSON output (`list` only).
    #[arg(long)]
    pub json: bool,
}

impl WalkArgs {
    fn process_config(&self) -> Result<ProcessConfig> {
        registry().validate_mode(&self.compress)?;
        Ok(ProcessConfig { dry: self.dry, mode: self.compress.clone() })
    }

    fn run(&self, processor: &mut dyn FileProcessor) -> Result<WalkSummary> {
        if !self.top.is_dir() {
            anyhow::bail!("not a directory: {}", self.top.display());
        }
        let summary = process_walk(&self.top, &mut [processor]);
        if summary.failed > 0 {
            warn!(failed = summary.failed, "some files failed");
        }
        info!(seen = summary.seen, processed = summary.processed, failed = summary.failed, "done");
        Ok(summary)
    }
}

pub fn compress(args: &WalkArgs) -> Result<()> {
    let mut processor = CompressProcessor::new(args.filter.to_filter()?, args.process_config()?);
    args.run(&mut processor)?;
    Ok(())
}

pub fn delete(args: &WalkArgs) -> Result<()> {
    let mut processor = DeleteProcessor::new(args.filter.to_filter()?, args.dry);
    args.run(&mut processor)?;
    Ok(())
}

pub fn debug(args: &WalkArgs) -> Result<()> {
    let mut processor = DebugProcessor::new(args.filter.to_filter()?);
    args.run(&mut processor)?;
    Ok(())
}

pub fn list(args: &WalkArgs) -> Result<()> {
    let mut processor = ListProcessor::new(args.filter.to_filter()?);
    args.run(&mut processor)?;

    let entries = processor.into_entries();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{:>10} {} {}",
            entry.size,
            entry.modified.format("%Y-%m-%d %H:%M:%S"),
            entry.path.display()
        );
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    #[command(flatten)]
    pub walk: WalkArgs,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Key prefix; keys are `prefix + path relative to --top`.
    #[arg(long, default_value = "")]
    pub prefix: String,
}

pub fn upload(args: &UploadArgs) -> Result<()> {
    let store = Arc::new(args.store.open()?);
    let mut processor = UploadProcessor::new(
        store,
        args.prefix.clone(),
        args.walk.top.clone(),
        args.walk.filter.to_filter()?,
        args.walk.process_config()?,
    )
    .context("cannot list existing objects")?;
    args.walk.run(&mut processor)?;
    Ok(())
}

