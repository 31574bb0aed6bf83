//! Book-Scout main entry point
//!
//! This is the command-line interface for the Book-Scout catalogue crawler
//! and viewer.

use anyhow::Context;
use book_scout::config::{load_config_with_hash, Config, RecordFormat};
use book_scout::crawler::crawl;
use book_scout::output::print_statistics;
use book_scout::storage::{open_store, RecordStore, SqliteStore};
use book_scout::viewer::{
    parse_command, render, render_results, render_stats, session::HELP, BookFilter, BookTable,
    Choice, Command, ViewerError, ViewerSession,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Book-Scout: a polite book catalogue crawler and viewer
///
/// Book-Scout walks the listing pages of a book catalogue, extracts one
/// record per book detail page, stores the collection, and lets you filter
/// the stored collection by category, rating, price and text.
#[derive(Parser, Debug)]
#[command(name = "book-scout")]
#[command(version)]
#[command(about = "A polite book catalogue crawler and viewer", long_about = None)]
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
    #[arg(long, conflicts_with_all = ["stats", "view", "interactive"])]
    dry_run: bool,

    /// Show statistics of the stored collection and exit
    #[arg(long, conflicts_with_all = ["dry_run", "view", "interactive"])]
    stats: bool,

    /// Print the stored collection filtered by the filter options and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "interactive"])]
    view: bool,

    /// Browse the stored collection with commands read from stdin
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "view"])]
    interactive: bool,

    /// Only show books of this category
    #[arg(long, requires = "view")]
    category: Option<String>,

    /// Only show books with this star rating (e.g. Three)
    #[arg(long, requires = "view")]
    rating: Option<String>,

    /// Lowest price to show
    #[arg(long, requires = "view")]
    min_price: Option<f64>,

    /// Highest price to show
    #[arg(long, requires = "view")]
    max_price: Option<f64>,

    /// Text to search for in titles and descriptions
    #[arg(long, requires = "view")]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.view {
        handle_view(&config, &cli)?;
    } else if cli.interactive {
        handle_interactive(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("book_scout=info,warn"),
            1 => EnvFilter::new("book_scout=debug,info"),
            2 => EnvFilter::new("book_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows what a crawl would do
fn handle_dry_run(config: &Config) {
    println!("=== Book-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  Retries: {} ({}ms apart)",
        config.crawler.max_retries, config.crawler.retry_delay_ms
    );
    println!("  Obey robots.txt: {}", config.crawler.obey_robots);
    println!("  Deduplicate detail pages: {}", config.crawler.deduplicate);
    if config.crawler.allowed_domains.is_empty() {
        println!("  Allowed domains: seed host only");
    } else {
        println!(
            "  Allowed domains: {}",
            config.crawler.allowed_domains.join(", ")
        );
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path.display());
    println!("  Format: {}", config.output.format);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", config.crawler.seed_url);
}

/// Handles the --stats mode: shows statistics of the stored collection
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Records: {}\n", config.output.records_path.display());

    if config.output.format == RecordFormat::Sqlite && config.output.records_path.exists() {
        let store = SqliteStore::open(&config.output.records_path)?;
        if let Some(run) = store.latest_run()? {
            println!(
                "Last run: #{} started {} ({} records, config {})\n",
                run.id, run.started_at, run.record_count, run.config_hash
            );
        }
    }

    match BookTable::load(&config.output, &config.viewer.currency_symbol) {
        Ok(table) => {
            print!("{}", render_stats(&table.stats()));
            if let Some(bounds) = table.price_bounds() {
                let symbol = table.currency_symbol();
                println!("Price range: {}{:.2} - {}{:.2}", symbol, bounds.min, symbol, bounds.max);
            }
            Ok(())
        }
        Err(e @ ViewerError::SourceMissing { .. }) => {
            tracing::warn!("{}", e);
            print!("{}", render_stats(&Default::default()));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handles the --view mode: one filtered view of the stored collection
fn handle_view(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let table = match BookTable::load(&config.output, &config.viewer.currency_symbol) {
        Ok(table) => table,
        Err(e @ ViewerError::SourceMissing { .. }) => {
            tracing::warn!("{}", e);
            BookTable::new(Vec::new(), config.viewer.currency_symbol.as_str())
        }
        Err(e) => return Err(e).context("Failed to load records"),
    };

    let filters = BookFilter {
        category: cli
            .category
            .as_deref()
            .map_or(Choice::All, Choice::from_label),
        rating: cli
            .rating
            .as_deref()
            .map_or(Choice::All, Choice::from_label),
        min_price: cli.min_price,
        max_price: cli.max_price,
        query: cli.query.clone().unwrap_or_default(),
    };

    let rows = book_scout::filter(&table, &filters);
    print!("{}", render_results(&render(rows)));
    Ok(())
}

/// Handles the --interactive mode: commands from stdin drive a viewer session
fn handle_interactive(config: &Config) -> anyhow::Result<()> {
    let mut session = ViewerSession::open(&config.output, &config.viewer.currency_symbol)
        .context("Failed to open viewer")?;

    let table = session.table();
    println!("Categories: {}", table.category_options().join(", "));
    println!("Ratings: {}", table.rating_options().join(", "));
    if let Some(bounds) = session.bounds() {
        println!("Prices: {:.2} - {:.2}", bounds.min, bounds.max);
    }
    println!("Type 'help' for commands.\n");
    print!("{}", session.view().to_text());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Stats) => print!("{}", render_stats(&session.table().stats())),
            Ok(Command::Show) => print!("{}", session.view().to_text()),
            Ok(Command::Event(event)) => match session.handle(event) {
                Ok(update) => print!("{}", update.to_text()),
                Err(e) => eprintln!("{}", e),
            },
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!("Starting crawl at {}", config.crawler.seed_url);

    let output = config.output.clone();
    let outcome = crawl(config).await.context("Crawl failed")?;

    let mut store: Box<dyn RecordStore> = match output.format {
        RecordFormat::Sqlite => Box::new(
            SqliteStore::open(&output.records_path)
                .context("Failed to open record database")?
                .with_config_hash(config_hash),
        ),
        _ => open_store(&output).context("Failed to open record store")?,
    };

    store.save(&outcome.records).with_context(|| {
        format!(
            "Failed to save {} records to {}",
            outcome.records.len(),
            output.records_path.display()
        )
    })?;

    tracing::info!(
        "Saved {} records to {} ({})",
        outcome.records.len(),
        output.records_path.display(),
        output.format
    );

    print_statistics(&outcome.statistics);
    Ok(())
}
