//! read / dates - read-endpoint resolution from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use logarchive_core::serve::{list_dates, open_concat, open_for_read, open_merged, ServeConfig};
use logarchive_core::stream::drain_to;

use super::output;

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Directory request paths are resolved against.
    #[arg(long, env = "LOGARCHIVE_WORKING_DIR", default_value = ".")]
    pub working_dir: PathBuf,

    /// URI prefix used for printed links.
    #[arg(long, env = "LOGARCHIVE_URI_PREFIX", default_value = "/")]
    pub uri_prefix: String,
}

impl ServeArgs {
    fn config(&self) -> ServeConfig {
        ServeConfig {
            prefix: self.uri_prefix.clone(),
            ..ServeConfig::new(&self.working_dir)
        }
    }
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    #[command(flatten)]
    pub serve: ServeArgs,

    /// Request path below the working directory.
    pub path: String,

    /// `Accept-Encoding` value, e.g. `gzip, br`.
    #[arg(long, default_value = "")]
    pub accept_encoding: String,

    /// Write here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn read(args: &ReadArgs) -> Result<()> {
    let config = args.serve.config();
    let mut response = open_for_read(&config, &args.path, &args.accept_encoding)
        .with_context(|| format!("cannot read {}", args.path))?;
    info!(
        path = %response.path.display(),
        content_encoding = response.content_encoding.unwrap_or("identity"),
        content_type = %response.content_type,
        "serving"
    );
    let mut out = output(args.output.as_ref())?;
    drain_to(&mut response.body, &mut out)?;
    Ok(())
}

#[derive(Debug, Args)]
pub struct DatesArgs {
    #[command(flatten)]
    pub serve: ServeArgs,

    /// Request path below the working directory.
    #[arg(default_value = "")]
    pub path: String,

    /// Only file names starting with this, e.g. `2024-01`.
    #[arg(long, default_value = "")]
    pub month: String,

    /// Print the contents of every listed file, one after another.
    #[arg(long, conflicts_with = "merge")]
    pub cat: bool,

    /// Print the lines of every listed file merged in sort order.
    #[arg(long)]
    pub merge: bool,

    /// JSON index instead of one link per line.
    #[arg(long)]
    pub json: bool,
}

pub fn dates(args: &DatesArgs) -> Result<()> {
    let config = args.serve.config();
    if args.cat || args.merge {
        let mut body = if args.cat {
            open_concat(&config, &args.path, &args.month)
        } else {
            open_merged(&config, &args.path, &args.month)
        }
        .with_context(|| format!("cannot read {}", args.path))?;
        let mut out = output(None)?;
        drain_to(&mut body, &mut out)?;
        return Ok(());
    }

    let index = list_dates(&config, &args.path, &args.month)
        .with_context(|| format!("cannot list {}", args.path))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&index)?);
        return Ok(());
    }
    for (dir, days) in &index {
        for (day, uri) in days {
            println!("{dir} {day} {}", config.link(uri));
        }
    }
    Ok(())
}
