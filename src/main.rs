use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use listmatch::{run_files, ListmatchConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Match marketplace listings to catalog products.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Line-delimited JSON listings file
    listings: PathBuf,

    /// Line-delimited JSON products file
    products: PathBuf,

    /// Number of matching worker threads
    threads: NonZeroUsize,

    /// Result file; overrides `output.path` from the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let cfg = match &args.config {
        Some(path) => ListmatchConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ListmatchConfig::default(),
    };
    let output = args.output.unwrap_or_else(|| cfg.output.path.clone());

    info!(
        listings = %args.listings.display(),
        products = %args.products.display(),
        threads = args.threads.get(),
        output = %output.display(),
        "starting"
    );

    let summary = run_files(
        &args.listings,
        &args.products,
        &output,
        args.threads.get(),
        &cfg,
    )
    .context("matching run failed")?;

    info!(
        accepted_listings = summary.accepted_listings,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Finished."
    );
    Ok(())
}
