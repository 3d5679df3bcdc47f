//! logarchive - command-line entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logarchive_cli::commands;
use logarchive_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries data (cat, store-get); logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .init();

    match cli.command {
        Commands::Cat(args) => commands::stream::cat(&args),
        Commands::Merge(args) => commands::stream::merge(&args),
        Commands::Compress(args) => commands::filetree::compress(&args),
        Commands::Delete(args) => commands::filetree::delete(&args),
        Commands::Debug(args) => commands::filetree::debug(&args),
        Commands::List(args) => commands::filetree::list(&args),
        Commands::Upload(args) => commands::filetree::upload(&args),
        Commands::Read(args) => commands::serve::read(&args),
        Commands::Dates(args) => commands::serve::dates(&args),
        Commands::Benchmark(args) => commands::bench::execute(&args),
        Commands::Modes => commands::bench::modes(),
        Commands::StorePut(args) => commands::store::put(&args),
        Commands::StoreList(args) => commands::store::list(&args),
        Commands::StoreDu(args) => commands::store::du(&args),
        Commands::StoreGet(args) => commands::store::get(&args),
        Commands::StoreDeleteBySuffix(args) => commands::store::delete_by_suffix(&args),
    }
}
