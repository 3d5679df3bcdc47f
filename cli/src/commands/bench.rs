//! benchmark / modes - codec comparison.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use logarchive_core::benchmark::benchmark;
use logarchive_core::compression::{modes, registry};
use logarchive_core::telemetry::Stage;

#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Input file.
    pub file: PathBuf,

    /// Modes to compare (repeatable); every codec when omitted.
    #[arg(long = "compress", short = 'c')]
    pub modes: Vec<String>,

    /// JSON output.
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: &BenchArgs) -> Result<()> {
    let registry = registry();
    let modes: Vec<&str> = if args.modes.is_empty() {
        registry
            .descriptors()
            .map(|c| c.mode)
            .filter(|m| *m != modes::PASS)
            .collect()
    } else {
        args.modes.iter().map(String::as_str).collect()
    };

    let reports = benchmark(registry, &args.file, &modes)
        .with_context(|| format!("benchmark of {} failed", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    println!(
        "{:<10} {:>12} {:>12} {:>8} {:>12} {:>12} {}",
        "mode", "input", "output", "ratio", "compress_ms", "decompress_ms", "ok"
    );
    for report in &reports {
        let s = &report.snapshot;
        println!(
            "{:<10} {:>12} {:>12} {:>8.3} {:>12.1} {:>12.1} {}",
            report.mode,
            s.bytes_in,
            s.bytes_out,
            s.compression_ratio,
            s.stage_times.get_ms(Stage::Compress),
            s.stage_times.get_ms(Stage::Decompress),
            report.verified
        );
    }
    Ok(())
}

pub fn modes() -> Result<()> {
    let registry = registry();
    for mode in registry.compress_modes() {
        let suffix = registry.lookup_by_mode(mode).map_or("", |c| c.suffix);
        println!("{mode:<12} {suffix}");
    }
    Ok(())
}
