//! Forum-Rounds main entry point
//!
//! This is the command-line interface for the Forum-Rounds topic visitor.

use anyhow::Context;
use clap::Parser;
use forum_rounds::config::{load_accounts, load_config_with_hash, Config, DEFAULT_ACCOUNTS_VAR};
use forum_rounds::feed::{RssWorklistSource, WorklistSource};
use forum_rounds::output::{print_fleet_summary, OffsetTimer};
use forum_rounds::FleetCoordinator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Forum-Rounds: a multi-account topic visitor
///
/// Logs every configured account into the forum, reads the latest topics
/// from the forum's feed, and visits each topic and all of its reply pages,
/// one browser per account, all accounts in parallel.
#[derive(Parser, Debug)]
#[command(name = "forum-rounds")]
#[command(version)]
#[command(about = "A multi-account forum topic visitor", long_about = None)]
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

    /// Environment variable holding a JSON account list
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ACCOUNTS_VAR)]
    accounts_env: String,

    /// Validate config and show what would run without starting browsers
    #[arg(long, conflicts_with = "list_topics")]
    dry_run: bool,

    /// Fetch the feed and print the worklist without starting browsers
    #[arg(long, conflicts_with = "dry_run")]
    list_topics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    setup_logging(cli.verbose, cli.quiet, config.logging.utc_offset_hours);
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.list_topics {
        return handle_list_topics(&config).await;
    }

    let accounts = load_accounts(&config.accounts, &cli.accounts_env)
        .context("Failed to load accounts")?;

    if cli.dry_run {
        handle_dry_run(&config, &accounts);
        return Ok(());
    }

    let coordinator =
        FleetCoordinator::from_config(&config).context("Failed to set up feed client")?;
    let fleet = coordinator.run_all(accounts).await;

    if !cli.quiet {
        print_fleet_summary(&fleet);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, utc_offset_hours: i32) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("forum_rounds=info,warn"),
            1 => EnvFilter::new("forum_rounds=debug,info"),
            2 => EnvFilter::new("forum_rounds=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Offset is range-checked during config validation
    let timer = OffsetTimer::from_hours(utc_offset_hours).unwrap_or_else(OffsetTimer::utc);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows settings and the masked account list
fn handle_dry_run(config: &Config, accounts: &[forum_rounds::Account]) {
    println!("=== Forum-Rounds Dry Run ===\n");

    println!("Site:");
    println!("  Home: {}", config.site.home_url);
    println!("  Feed: {}", config.site.feed_url);
    println!("  Ready selector: {}", config.site.ready_selector);

    println!("\nTraversal:");
    println!("  Max retries: {}", config.traversal.max_retries);
    println!("  Retry cooldown: {}ms", config.traversal.retry_cooldown_ms);
    println!("  Settle delay: {}ms", config.traversal.settle_delay_ms);
    println!("  Visit timeout: {}ms", config.traversal.visit_timeout_ms);
    println!(
        "  On topic exhausted: {:?}",
        config.traversal.on_topic_exhausted
    );

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    println!(
        "  Executable: {}",
        config.browser.chrome_path.as_deref().unwrap_or("(auto-detect)")
    );

    println!("\nAccounts ({}):", accounts.len());
    for account in accounts {
        println!("  - {}", account.masked());
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start {} concurrent sessions", accounts.len());
}

/// Handles the --list-topics mode: fetches and prints the worklist
async fn handle_list_topics(config: &Config) -> anyhow::Result<()> {
    let source = RssWorklistSource::new(config.site.feed_url.clone(), config.feed.clone())?;
    let worklist = source
        .fetch_worklist()
        .await
        .with_context(|| format!("Failed to fetch worklist from {}", source.feed_url()))?;

    println!("=== Worklist ({} topics) ===\n", worklist.len());
    for (position, entry) in worklist.iter().enumerate() {
        println!(
            "  {:>3}. {} ({} posts)",
            position + 1,
            entry.topic_url,
            entry.reply_count
        );
    }

    Ok(())
}
