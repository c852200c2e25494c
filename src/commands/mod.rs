//! CLI commands for quotebook

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::book::QuoteBook;
use crate::config::{load_config, save_config, Config, QuotebookPaths};
use crate::db::Database;
use crate::models::{starter_quotes, CategoryFilter};
use crate::notify::ConsoleNotifier;
use crate::reconcile::{self, HttpQuoteSource, ReconcileOutcome, Reconciler, SyncScheduler};
use crate::store::LocalStore;

/// Default file name for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Initialize quotebook for first-time setup
pub fn init(paths: &QuotebookPaths) -> Result<()> {
    if paths.is_initialized() {
        println!("Quotebook is already initialized at {}", paths.root.display());
        return Ok(());
    }

    println!("Initializing quotebook at {}...", paths.root.display());

    paths.ensure_dirs()?;
    println!("  Created directory structure");

    if !paths.config.exists() {
        save_config(paths, &Config::default())?;
        println!("  Created config.toml");
    }

    let store = LocalStore::new(Database::init(paths)?);
    let mut book = QuoteBook::open(store)?;
    if book.is_empty() {
        book.replace(starter_quotes());
        println!("  Seeded {} starter quotes", book.len());
    }

    println!();
    println!("Quotebook initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  quotebook show                 Show a random quote");
    println!("  quotebook add <text> -c <cat>  Add a quote");
    println!("  quotebook watch                Keep quotes synced with the server");

    Ok(())
}

/// Open the persisted quote book
pub fn open_book(paths: &QuotebookPaths) -> Result<QuoteBook> {
    ensure_initialized(paths)?;
    let db = Database::open(paths)?;
    let book = QuoteBook::open(LocalStore::new(db)).context("Failed to load quotes")?;
    Ok(book)
}

/// Show a random quote from the selected (or given) category
pub fn show(paths: &QuotebookPaths, category: Option<&str>) -> Result<()> {
    let book = open_book(paths)?;
    let filter = match category {
        Some(c) => parse_filter(c)?,
        None => book.filter().clone(),
    };

    match book.random_quote_by(&filter, &mut rand::thread_rng()) {
        Some(quote) => {
            println!("{}", quote.text);
            println!("  ({})", quote.category);
        }
        None => println!("No quotes available. Add a new quote!"),
    }
    Ok(())
}

/// Add a quote from the command line
pub fn add(paths: &QuotebookPaths, text: &str, category: &str) -> Result<()> {
    let mut book = open_book(paths)?;
    let quote = book.add(text, category)?.clone();
    println!("✓ Added quote: {}", quote);
    println!("  Total quotes: {}", book.len());
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Table,
}

/// List quotes, narrowed by a category when given
pub fn list(paths: &QuotebookPaths, category: Option<&str>, format: OutputFormat) -> Result<()> {
    let book = open_book(paths)?;
    let filter = match category {
        Some(c) => parse_filter(c)?,
        None => book.filter().clone(),
    };
    let quotes = book.filtered_by(&filter);

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&quotes)?);
        return Ok(());
    }

    if quotes.is_empty() {
        println!("No quotes found for filter '{}'.", filter);
        println!("Add one with: quotebook add <text> --category <category>");
        return Ok(());
    }

    println!("{:<4} {:<60} {:<15}", "#", "QUOTE", "CATEGORY");
    println!("{}", "-".repeat(80));
    for (idx, quote) in quotes.iter().enumerate() {
        println!(
            "{:<4} {:<60} {:<15}",
            idx + 1,
            truncate(&quote.text, 58),
            truncate(&quote.category, 15)
        );
    }
    println!();
    println!("{} of {} quotes (filter: {})", quotes.len(), book.len(), filter);

    Ok(())
}

/// List distinct categories, marking the selected one
pub fn categories(paths: &QuotebookPaths) -> Result<()> {
    let book = open_book(paths)?;
    let selected = book.filter();

    let marker = |active: bool| if active { "*" } else { " " };
    println!("{} all", marker(*selected == CategoryFilter::All));
    for category in book.categories() {
        let active = matches!(selected, CategoryFilter::Category(c) if c == category);
        println!("{} {}", marker(active), category);
    }
    Ok(())
}

/// Select and persist the category filter
pub fn filter(paths: &QuotebookPaths, category: &str) -> Result<()> {
    let mut book = open_book(paths)?;
    let filter = parse_filter(category)?;

    if let CategoryFilter::Category(c) = &filter {
        if !book.categories().contains(&c.as_str()) {
            println!("⚠ No quotes in category '{}' yet", c);
        }
    }

    book.set_filter(filter);
    println!("✓ Filter set to '{}' ({} quotes)", book.filter(), book.filtered().len());
    Ok(())
}

/// Export the full collection as pretty JSON
pub fn export(paths: &QuotebookPaths, output: Option<&Path>) -> Result<PathBuf> {
    let book = open_book(paths)?;
    let target = match output {
        Some(path) => path.to_path_buf(),
        None => paths.exports.join(EXPORT_FILE_NAME),
    };

    let json = book.export_json().context("Failed to serialize quotes")?;
    std::fs::write(&target, json)
        .with_context(|| format!("Failed to write export file: {}", target.display()))?;

    println!("✓ Exported {} quotes to {}", book.len(), target.display());
    Ok(target)
}

/// Append every quote from a JSON file
pub fn import(paths: &QuotebookPaths, file: &Path) -> Result<usize> {
    let mut book = open_book(paths)?;
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;

    let count = book
        .import_json(&json)
        .with_context(|| format!("Import file is not a JSON array of quotes: {}", file.display()))?;

    println!("✓ Quotes imported successfully: {} added, {} total", count, book.len());
    Ok(count)
}

/// Summary of the local store
pub fn status(paths: &QuotebookPaths) -> Result<()> {
    let config = load_config(paths)?;
    let book = open_book(paths)?;

    println!("Quotebook: {}", paths.root.display());
    println!("{}", "=".repeat(50));
    println!("Quotes:      {}", book.len());
    println!("Categories:  {}", book.categories().len());
    println!("Filter:      {}", book.filter());
    println!();
    println!("Server:      {}", config.sync.endpoint);
    println!("Interval:    {}s", config.sync.interval().as_secs());
    println!("Merge:       {}", config.sync.merge_policy);
    println!();
    println!("Stored keys:");
    for (key, updated_at) in book.store().database().keys()? {
        println!("  {:<20} updated {}", key, format_timestamp(updated_at));
    }
    Ok(())
}

/// Reconcile once with the server
///
/// A failed reconciliation is reported by the notifier and returned as
/// `ReconcileOutcome::Failed`, not as an error.
pub async fn sync(paths: &QuotebookPaths) -> Result<ReconcileOutcome> {
    let config = load_config(paths)?;
    let book = reconcile::shared(open_book(paths)?);
    let reconciler = build_reconciler(&config)?;

    println!("Syncing with {}...", config.sync.endpoint);
    Ok(reconciler.reconcile(&book).await)
}

/// Reconcile with the server on a fixed interval until interrupted
pub async fn watch(
    paths: &QuotebookPaths,
    interval_secs: Option<u64>,
    ticks: Option<u64>,
) -> Result<()> {
    let config = load_config(paths)?;
    let book = reconcile::shared(open_book(paths)?);
    let reconciler = Arc::new(build_reconciler(&config)?);

    let period = interval_secs
        .map(|s| Duration::from_secs(s.max(1)))
        .unwrap_or_else(|| config.sync.interval());
    let mut scheduler = SyncScheduler::new(reconciler, Arc::clone(&book), period);
    if let Some(ticks) = ticks {
        scheduler = scheduler.with_max_ticks(ticks);
    }

    println!(
        "Syncing with {} every {}s (Ctrl-C to stop)",
        config.sync.endpoint,
        period.as_secs()
    );

    tokio::select! {
        _ = scheduler.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            println!();
            println!("Stopping sync");
        }
    }

    let book = book.lock().await;
    println!("{} quotes in local store", book.len());
    Ok(())
}

fn build_reconciler(config: &Config) -> Result<Reconciler> {
    let source = Arc::new(
        HttpQuoteSource::from_config(&config.sync).context("Failed to build HTTP client")?,
    );
    let notifier = Arc::new(ConsoleNotifier::new());
    Ok(Reconciler::from_config(source, notifier, config))
}

fn parse_filter(category: &str) -> Result<CategoryFilter> {
    category.parse::<CategoryFilter>().map_err(|e| anyhow::anyhow!(e))
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

pub fn ensure_initialized(paths: &QuotebookPaths) -> Result<()> {
    if !paths.is_initialized() {
        bail!("Quotebook not initialized. Run `quotebook init` first.");
    }
    Ok(())
}
