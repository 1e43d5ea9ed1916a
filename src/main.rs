//! crawl-frontier main entry point
//!
//! Runs a polite breadth-first crawl from the seeds in a TOML configuration.

use anyhow::{Context, Result};
use clap::Parser;
use crawl_frontier::config::{load_config_with_hash, Config};
use crawl_frontier::crawler::Crawler;
use crawl_frontier::url::normalize_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// crawl-frontier: a polite crawler driven by a frontier scheduler
///
/// Pages are fetched in discovery order, subject to a page budget, a link
/// depth ceiling, per-domain politeness pacing and robots.txt rules.
#[derive(Parser, Debug)]
#[command(name = "crawl-frontier")]
#[command(version)]
#[command(about = "A polite crawler driven by a frontier scheduler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_frontier=info,warn"),
            1 => EnvFilter::new("crawl_frontier=debug,info"),
            2 => EnvFilter::new("crawl_frontier=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<()> {
    println!("=== crawl-frontier Dry Run ===\n");

    println!("Scheduler:");
    println!("  Page limit: {}", config.scheduler.page_limit);
    println!("  Depth limit: {}", config.scheduler.depth_limit);
    println!(
        "  Politeness interval: {}s",
        config.scheduler.politeness_interval_secs
    );
    println!("  Queue keying: {:?}", config.scheduler.queue_keying);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nRobots:");
    println!("  Cache TTL: {}h", config.robots.cache_ttl_hours);
    println!("  Failure retry: {}s", config.robots.failure_retry_secs);

    println!("\nWorkers:");
    println!("  Count: {}", config.workers.count);
    println!("  Request timeout: {}s", config.workers.request_timeout_secs);

    println!("\nSeeds ({}):", config.scheduler.seeds.len());
    for seed in &config.scheduler.seeds {
        let normalized = normalize_url(seed).with_context(|| format!("invalid seed {seed}"))?;
        println!("  - {}", normalized);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation, stopping early on Ctrl-C
async fn handle_crawl(config: Config) -> Result<()> {
    let crawler = Crawler::from_config(&config).context("failed to set up crawler")?;

    tokio::select! {
        result = crawler.run() => {
            let summary = result.context("crawl failed")?;
            println!(
                "Fetched {} page(s), {} failed, {} denied by robots.txt, {} discovered",
                summary.fetched, summary.failed, summary.denied, summary.discovered
            );
        }
        _ = tokio::signal::ctrl_c() => {
            let stats = crawler.scheduler().stats();
            tracing::warn!(
                "Interrupted: {} fetched, {} still pending",
                stats.pages_fetched,
                stats.pending
            );
        }
    }

    Ok(())
}
