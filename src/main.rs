//! Contact-Ripple main entry point
//!
//! This is the command-line interface for the Contact-Ripple contact crawler.

use anyhow::{bail, Context};
use clap::Parser;
use contact_ripple::config::{
    load_config_with_hash, load_seed_urls, validate, Config, OutputFormat, MAX_DEPTH_LIMIT,
};
use contact_ripple::crawler::{run_batch, Coordinator};
use contact_ripple::output::write_results;
use contact_ripple::state::StopSignal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Contact-Ripple: a bounded contact crawler
///
/// Contact-Ripple crawls each candidate website breadth-first, staying on the
/// candidate's site, and reports the emails, phone numbers, masked phone
/// numbers and resume links it finds.
#[derive(Parser, Debug)]
#[command(name = "contact-ripple")]
#[command(version)]
#[command(about = "A bounded contact crawler", long_about = None)]
struct Cli {
    /// Seed URLs to crawl
    #[arg(value_name = "URL")]
    urls: Vec<String>,

    /// File with one seed URL per line (blank lines and # comments skipped)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum link depth from the seed (1-15)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_DEPTH_LIMIT as i64))]
    depth: Option<u32>,

    /// Maximum pages fetched per seed
    #[arg(long)]
    max_pages: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write results to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of seeds crawled at the same time
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    concurrency: u16,

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
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let seeds = collect_seeds(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
        return Ok(());
    }

    if seeds.is_empty() {
        bail!("no seed URLs given; pass URLs as arguments or use --input");
    }

    handle_crawl(config, seeds, cli.concurrency as usize).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_ripple=info,warn"),
            1 => EnvFilter::new("contact_ripple=debug,info"),
            2 => EnvFilter::new("contact_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }

    validate(&config).context("invalid settings")?;
    Ok(config)
}

fn collect_seeds(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut seeds = cli.urls.clone();
    if let Some(path) = &cli.input {
        let from_file = load_seed_urls(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        tracing::info!("Loaded {} seeds from {}", from_file.len(), path.display());
        seeds.extend(from_file);
    }
    Ok(seeds)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, seeds: &[String]) {
    println!("=== Contact-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max links per page: {}", config.crawler.max_links_per_page);
    println!("  Max queue size: {}", config.crawler.max_queue_size);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Probe common paths: {}", config.crawler.probe_common_paths);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nExtraction:");
    println!(
        "  Phone digits: {}-{}",
        config.extraction.min_phone_digits, config.extraction.max_phone_digits
    );
    println!("  Mask characters: {}", config.extraction.mask_chars);
    println!("  Decode Cloudflare: {}", config.extraction.decode_cloudflare);
    println!("  Synthetic emails: {}", config.extraction.synthetic_emails);

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!(
        "  Path: {}",
        config.output.path.as_deref().unwrap_or("stdout")
    );

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        match contact_ripple::normalize_seed(seed) {
            Ok(root) => println!("  - {} -> {}", seed, root),
            Err(e) => println!("  - {} (invalid: {})", seed, e),
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, seeds: Vec<String>, concurrency: usize) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} seeds (concurrency {}, max depth {}, max pages {})",
        seeds.len(),
        concurrency,
        config.crawler.max_depth,
        config.crawler.max_pages
    );

    let coordinator =
        Arc::new(Coordinator::from_config(&config).context("failed to set up crawler")?);

    let stop = StopSignal::new();
    let on_interrupt = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with partial results");
            on_interrupt.stop();
        }
    });

    let results = run_batch(coordinator, seeds, concurrency, stop).await;

    let path = config.output.path.as_deref().map(Path::new);
    write_results(&results, config.output.format, path).context("failed to write results")?;

    Ok(())
}
