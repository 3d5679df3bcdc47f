//! store-* - directory-backed object store commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use logarchive_core::compression::{modes, registry};
use logarchive_core::storage::{delete_by_suffix as delete_objects, disk_usage, list_all, put_stream, BlobStore, DirBlobStore};
use logarchive_core::stream::{drain_to, PipelineBuilder};

use super::{output, path_str};

/// Object store location.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Root directory of the object store.
    #[arg(long, env = "LOGARCHIVE_STORE_DIR")]
    pub store_dir: PathBuf,
}

impl StoreArgs {
    pub fn open(&self) -> Result<DirBlobStore> {
        DirBlobStore::open(&self.store_dir)
            .with_context(|| format!("cannot open store {}", self.store_dir.display()))
    }
}

#[derive(Debug, Args)]
pub struct StorePutArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    pub file: PathBuf,

    /// Object key; defaults to the converted file name.
    #[arg(long)]
    pub key: Option<String>,

    /// Convert to this mode before storing.
    #[arg(long, short = 'c', default_value = modes::RAW)]
    pub compress: String,
}

pub fn put(args: &StorePutArgs) -> Result<()> {
    registry().validate_mode(&args.compress)?;
    let store = args.store.open()?;
    let name = path_str(&args.file)?;
    let (new_name, stream) = PipelineBuilder::new()
        .build(name, &args.compress, None)
        .with_context(|| format!("cannot open {name}"))?;

    let key = match &args.key {
        Some(key) => key.clone(),
        None => PathBuf::from(&new_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("cannot derive a key from the file name")?,
    };
    let size = put_stream(&store, &key, stream).with_context(|| format!("cannot store {key}"))?;
    info!(key = %key, size, "stored");
    Ok(())
}

#[derive(Debug, Args)]
pub struct StoreListArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, default_value = "")]
    pub prefix: String,

    #[arg(long)]
    pub json: bool,
}

pub fn list(args: &StoreListArgs) -> Result<()> {
    let store = args.store.open()?;
    let entries = list_all(&store, &args.prefix)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for meta in &entries {
        println!("{} {:>10} {}", meta.last_modified.format("%Y-%m-%d %H:%M:%S"), meta.size, meta.key);
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct StoreDuArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Add each directory's totals to all of its parents.
    #[arg(long, short = 'S')]
    pub summary: bool,

    #[arg(long, default_value = "/")]
    pub pathsep: String,
}

pub fn du(args: &StoreDuArgs) -> Result<()> {
    let store = args.store.open()?;
    let entries = list_all(&store, &args.prefix)?;
    for row in disk_usage(&entries, &args.pathsep, args.summary) {
        println!("{row}");
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct StoreGetArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    pub key: String,

    /// Convert from the key's encoding to this mode.
    #[arg(long, short = 'c', default_value = modes::RAW)]
    pub compress: String,

    /// Write here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn get(args: &StoreGetArgs) -> Result<()> {
    registry().validate_mode(&args.compress)?;
    let store = args.store.open()?;
    let body = store.get(&args.key).with_context(|| format!("cannot get {}", args.key))?;
    let (_, mut stream) = PipelineBuilder::new().build(&args.key, &args.compress, Some(body))?;
    let mut out = output(args.output.as_ref())?;
    drain_to(&mut stream, &mut out)?;
    Ok(())
}

#[derive(Debug, Args)]
pub struct StoreDeleteArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Key suffix to delete, e.g. `.gz`.
    #[arg(long)]
    pub suffix: String,

    #[arg(long)]
    pub dry: bool,
}

pub fn delete_by_suffix(args: &StoreDeleteArgs) -> Result<()> {
    let store = args.store.open()?;
    let keys = delete_objects(&store, &args.prefix, &args.suffix, args.dry)?;
    for key in &keys {
        println!("{key}");
    }
    Ok(())
}
