//! cat / merge - stream commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use logarchive_core::compression::{modes, registry};
use logarchive_core::config::ChunkConfig;
use logarchive_core::constants::DEFAULT_MERGE_BUFSIZE;
use logarchive_core::filetree::walk;
use logarchive_core::stream::{drain_to, open_input, BoxStream, InputSource, MergeStream, PipelineBuilder, Prefetch};
use logarchive_core::telemetry::{Stage, TelemetryTimer};

use super::{output, path_str};

#[derive(Debug, Args)]
pub struct CatArgs {
    /// Files to read, in order; `-` reads stdin.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output mode; `decompress` decodes by file suffix.
    #[arg(long, short = 'c', default_value = modes::DECOMPRESS)]
    pub compress: String,

    /// Write here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Read chunk size in bytes.
    #[arg(long, env = "LOGARCHIVE_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,
}

pub fn cat(args: &CatArgs) -> Result<()> {
    registry().validate_mode(&args.compress)?;
    let chunks = ChunkConfig::new(args.chunk_size, None)?;
    let builder = PipelineBuilder::new().chunk_size(chunks.read_chunk_size);
    let mut out = output(args.output.as_ref())?;

    for file in &args.files {
        let name = path_str(file)?;
        let source = if name == "-" {
            Some(open_input(InputSource::Stdin, chunks.read_chunk_size)?)
        } else {
            None
        };
        let (_, mut stream) = builder
            .build(name, &args.compress, source)
            .with_context(|| format!("cannot open {name}"))?;
        drain_to(&mut stream, &mut out).with_context(|| format!("failed reading {name}"))?;
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Sorted log files, or directories whose files are all merged.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Output chunk threshold in bytes.
    #[arg(long, default_value_t = DEFAULT_MERGE_BUFSIZE)]
    pub bufsize: usize,

    /// Decode each input on its own thread.
    #[arg(long)]
    pub prefetch: bool,

    /// Read chunk size in bytes.
    #[arg(long, env = "LOGARCHIVE_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,
}

fn merge_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        for item in walk(input) {
            match item {
                Ok((path, _)) => files.push(path),
                Err(e) => warn!(error = %e, "skipping unreadable directory"),
            }
        }
    }
    files
}

pub fn merge(args: &MergeArgs) -> Result<()> {
    let chunks = ChunkConfig::new(args.chunk_size, Some(args.bufsize))?;
    let builder = PipelineBuilder::new().chunk_size(chunks.read_chunk_size);

    let files = merge_inputs(&args.inputs);
    let mut streams: Vec<BoxStream> = Vec::with_capacity(files.len());
    for file in &files {
        let name = path_str(file)?;
        let (_, stream) = builder
            .build(name, modes::DECOMPRESS, None)
            .with_context(|| format!("cannot open {name}"))?;
        let stream: BoxStream = if args.prefetch { Box::new(Prefetch::spawn(stream)) } else { stream };
        streams.push(stream);
    }

    let mut timer = TelemetryTimer::new();
    let mut merged = MergeStream::with_bufsize(streams, chunks.merge_bufsize);
    let mut out = output(args.output.as_ref())?;
    let written = timer
        .time(Stage::Merge, || drain_to(&mut merged, &mut out))
        .context("merge failed")?;
    timer.finish();

    info!(
        inputs = files.len(),
        bytes = written,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "merged"
    );
    Ok(())
}
