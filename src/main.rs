//! job-sift main entry point
//!
//! This is the command-line interface for the job-sift listing crawler.

use anyhow::Context;
use clap::Parser;
use job_sift::config::{load_config_with_hash, Config, SinkKind};
use job_sift::crawler::run_crawl;
use job_sift::output::{print_statistics, NotificationSink, StdoutSink};
use job_sift::query::{build_search_url, normalize, QueryTagSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

/// job-sift: crawl job listings and report those matching your tags
///
/// job-sift fetches the configured job-search page for the given tags,
/// visits every listing on it, and sends a single report of the listings
/// whose technology tags match.
#[derive(Parser, Debug)]
#[command(name = "job-sift")]
#[command(version)]
#[command(about = "Tag-filtered job listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Query tags, separated by commas, spaces or '+' (e.g. "rust, go")
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and tags and show the search URL without crawling
    #[arg(long, conflicts_with = "print")]
    dry_run: bool,

    /// Print the report to stdout instead of using the configured sink
    #[arg(long)]
    print: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // At least one tag is required before anything is fetched
    let query = normalize(cli.tags.as_deref()).context("Invalid --tags argument")?;

    if cli.dry_run {
        return handle_dry_run(&config, &query);
    }

    let sink: Option<Arc<dyn NotificationSink>> = if cli.print {
        Some(Arc::new(StdoutSink::new(
            config.notification.sender(&config.user_agent),
        )))
    } else {
        None
    };

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, aborting crawl");
        } else {
            std::future::pending::<()>().await;
        }
    };

    let outcome = run_crawl(&config, query, sink, shutdown)
        .await
        .context("Crawl failed")?;

    if !cli.quiet {
        print_statistics(&outcome.statistics, outcome.state);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_sift=info,warn"),
            1 => EnvFilter::new("job_sift=debug,info"),
            2 => EnvFilter::new("job_sift=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, query: &QueryTagSet) -> anyhow::Result<()> {
    let base = Url::parse(&config.crawler.search_url).context("Invalid search_url")?;
    let search_url = build_search_url(&base, query);

    println!("=== job-sift Dry Run ===\n");

    println!("Query tags ({}):", query.len());
    for tag in query.iter() {
        println!("  - {}", tag);
    }

    println!("\nSearch URL:");
    println!("  {}", search_url);

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  Retries: {} ({}ms apart)",
        config.crawler.max_retries, config.crawler.retry_delay_ms
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nNotification:");
    println!("  Send to: {}", config.notification.send_to);
    println!("  From: {}", config.notification.sender(&config.user_agent));
    println!("  Sink: {:?}", config.notification.sink);
    match config.notification.sink {
        SinkKind::Mailbox => {
            if let Some(dir) = &config.notification.mailbox_dir {
                println!("  Mailbox dir: {}", dir);
            }
        }
        SinkKind::Smtp => {
            let host = config.notification.smtp_host.as_deref().unwrap_or("");
            match config.notification.smtp_port {
                Some(port) => println!("  SMTP relay: {}:{}", host, port),
                None => println!("  SMTP relay: {}", host),
            }
            println!("  SMTP security: {:?}", config.notification.smtp_security);
            if let Some(user) = &config.notification.smtp_user {
                println!("  SMTP user: {}", user);
            }
        }
        SinkKind::Stdout => {}
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}
