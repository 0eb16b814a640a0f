use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scholarfeed_core::{FeedConfig, Pipeline, PublicationFetcher};

#[derive(Parser)]
#[command(
    name = "scholarfeed",
    about = "Render the publications section of the portfolio site",
    version
)]
struct Cli {
    /// TOML config file (defaults to $SCHOLARFEED_CONFIG, then ./scholarfeed.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the publications fragment, using the cache when fresh.
    Sync,
    /// Drop the cache slot and re-fetch before rendering.
    Refresh,
    /// Check which relay endpoints are currently reachable.
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => FeedConfig::from_file(path)?,
        None => FeedConfig::load(),
    };

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => run_sync(config, false).await,
        Commands::Refresh => run_sync(config, true).await,
        Commands::Probe => run_probe(config).await,
    }
}

async fn run_sync(config: FeedConfig, force: bool) -> Result<()> {
    let pipeline = Pipeline::new(config);
    let report = if force {
        pipeline.refresh().await
    } else {
        pipeline.load().await
    };

    println!(
        "rendered {} publication(s) from {} to {}",
        report.rendered,
        report.source,
        pipeline.output_path().display()
    );
    for err in &report.errors {
        eprintln!("warning: {err}");
    }
    Ok(())
}

async fn run_probe(config: FeedConfig) -> Result<()> {
    let fetcher = PublicationFetcher::new(&config);
    for status in fetcher.probe_relays().await {
        let state = if status.reachable { "ok" } else { "unreachable" };
        println!("{:<45} {state} ({} ms)", status.relay, status.latency_ms);
    }
    Ok(())
}
