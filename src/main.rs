//! Reel-Sweep main entry point
//!
//! This is the command-line interface for the Reel-Sweep catalog crawler.

use anyhow::{Context, Result};
use clap::Parser;
use reel_sweep::config::{load_config_with_hash, validate, Config};
use reel_sweep::crawler::{Coordinator, StopHandle};
use reel_sweep::output::{print_statistics, CrawlStatistics, JsonOutputHandler, OutputHandler, RunMetadata};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Reel-Sweep: a paginated catalog crawler
///
/// Reel-Sweep walks a catalog listing page, follows its cursor-paginated
/// fragments, enriches every new entry from its detail page, and writes the
/// deduplicated catalog plus its genre taxonomy as JSON.
#[derive(Parser, Debug)]
#[command(name = "reel-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A paginated catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply without one)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Origin listing URL, overriding the configuration
    #[arg(long, env = "SITE_URL", value_name = "URL")]
    origin: Option<String>,

    /// Maximum number of listing pages, seed page included
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Catalog output path, overriding the configuration
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            (Config::default(), None)
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid effective configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, config_hash.as_deref());
        return Ok(());
    }

    handle_crawl(config, config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reel_sweep=info,warn"),
            1 => EnvFilter::new("reel_sweep=debug,info"),
            2 => EnvFilter::new("reel_sweep=trace,debug"),
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

/// Applies command-line values on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(origin) = &cli.origin {
        config.source.origin_url = origin.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(output) = &cli.output {
        config.output.catalog_path = output.display().to_string();
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, config_hash: Option<&str>) {
    println!("=== Reel-Sweep Dry Run ===\n");

    println!("Source:");
    println!("  Listing URL: {}", config.source.origin_url);
    println!("  Pagination path: {}", config.source.pagination_path);
    println!(
        "  Form fields: {} / {} / {} / {}",
        config.source.cursor_field,
        config.source.year_field,
        config.source.category_field,
        config.source.sort_field
    );

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!(
        "  Timeouts: listing {}s, pagination {}s, detail {}s",
        config.crawler.listing_timeout_secs,
        config.crawler.pagination_timeout_secs,
        config.crawler.detail_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  Catalog: {}", config.output.catalog_path);
    if let Some(hash) = config_hash {
        println!("  Config hash: {}", hash);
    }

    println!("\nBaseline Genres ({}):", config.genres.baseline.len());
    for genre in &config.genres.baseline {
        println!("  - {}", genre);
    }

    println!("\n✓ Configuration is valid");
}

/// Exit status after an interrupt, as shells report SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// What a Ctrl-C press does, by how many have been received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    StopAfterPage,
    Exit,
}

impl InterruptAction {
    fn for_press(count: u32) -> Self {
        if count <= 1 {
            Self::StopAfterPage
        } else {
            Self::Exit
        }
    }
}

/// First Ctrl-C stops the crawl at the next page boundary; the second exits
async fn watch_interrupts(stop: StopHandle) {
    let mut presses = 0;
    while tokio::signal::ctrl_c().await.is_ok() {
        presses += 1;
        match InterruptAction::for_press(presses) {
            InterruptAction::StopAfterPage => {
                tracing::warn!("Interrupt received, stopping after the current page (press again to exit)");
                stop.stop();
            }
            InterruptAction::Exit => {
                tracing::error!("Second interrupt received, exiting without writing the catalog");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: Option<String>) -> Result<()> {
    let metadata = RunMetadata::new(config.source.origin_url.clone(), config_hash);
    let handler = JsonOutputHandler::new(&config.output.catalog_path);

    let coordinator = Coordinator::new(config).context("failed to set up crawler")?;

    tokio::spawn(watch_interrupts(coordinator.stop_handle()));

    let outcome = coordinator.run().await.context("crawl failed")?;

    handler
        .write_outcome(&outcome, &metadata)
        .with_context(|| format!("failed to write catalog to {}", handler.path().display()))?;

    print_statistics(&CrawlStatistics::from_outcome(&outcome));
    Ok(())
}
