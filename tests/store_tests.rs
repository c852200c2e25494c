// Integration tests for the on-disk store and CLI commands
// Uses a temporary quotebook home per test

use anyhow::Result;
use quotebook::book::QuoteBook;
use quotebook::commands;
use quotebook::config::QuotebookPaths;
use quotebook::db::Database;
use quotebook::models::{starter_quotes, CategoryFilter, Quote};
use quotebook::store::LocalStore;
use std::fs;
use tempfile::TempDir;

/// Initialized quotebook home in a temp directory
fn setup() -> Result<(TempDir, QuotebookPaths)> {
    let temp_dir = TempDir::new()?;
    let paths = QuotebookPaths::at(temp_dir.path());
    commands::init(&paths)?;
    Ok((temp_dir, paths))
}

#[test]
fn test_init_seeds_starter_quotes_once() -> Result<()> {
    let (_temp, paths) = setup()?;
    assert!(paths.is_initialized());

    let book = commands::open_book(&paths)?;
    assert_eq!(book.quotes(), starter_quotes().as_slice());

    // A second init leaves the store alone
    commands::add(&paths, "Extra", "Misc")?;
    commands::init(&paths)?;
    assert_eq!(commands::open_book(&paths)?.len(), 4);

    Ok(())
}

#[test]
fn test_commands_require_init() {
    let temp_dir = TempDir::new().unwrap();
    let paths = QuotebookPaths::at(temp_dir.path());
    let err = commands::open_book(&paths).unwrap_err();
    assert!(err.to_string().contains("not initialized"));
}

#[test]
fn test_save_of_loaded_collection_is_byte_identical() -> Result<()> {
    let (_temp, paths) = setup()?;
    let store = LocalStore::new(Database::open(&paths)?);
    let before = store.raw_quotes()?;

    let loaded = store.load()?;
    store.save(&loaded);

    assert_eq!(store.raw_quotes()?, before);
    Ok(())
}

#[test]
fn test_quotes_and_filter_survive_reopen() -> Result<()> {
    let (_temp, paths) = setup()?;

    commands::add(&paths, "  Keep going.  ", "Motivation")?;
    commands::filter(&paths, "Motivation")?;

    let book = commands::open_book(&paths)?;
    assert_eq!(
        book.filter(),
        &CategoryFilter::Category("Motivation".to_string())
    );
    let texts: Vec<&str> = book.filtered().iter().map(|q| q.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Do what you can, with what you have, where you are.", "Keep going."]
    );

    commands::filter(&paths, "all")?;
    assert_eq!(commands::open_book(&paths)?.filter(), &CategoryFilter::All);

    Ok(())
}

#[test]
fn test_add_rejects_blank_input() -> Result<()> {
    let (_temp, paths) = setup()?;
    let err = commands::add(&paths, "   ", "Motivation").unwrap_err();
    assert!(err.to_string().contains("fill in both"));
    assert_eq!(commands::open_book(&paths)?.len(), 3);
    Ok(())
}

#[test]
fn test_export_then_import_appends_everything() -> Result<()> {
    let (temp, paths) = setup()?;

    let exported = commands::export(&paths, None)?;
    assert_eq!(exported, paths.exports.join(commands::EXPORT_FILE_NAME));
    let json = fs::read_to_string(&exported)?;
    assert!(json.contains("\n  {"), "export should be pretty-printed");

    let count = commands::import(&paths, &exported)?;
    assert_eq!(count, 3);
    assert_eq!(commands::open_book(&paths)?.len(), 6);

    let empty = temp.path().join("empty.json");
    fs::write(&empty, "[]")?;
    let before = LocalStore::new(Database::open(&paths)?).raw_quotes()?;
    assert_eq!(commands::import(&paths, &empty)?, 0);
    assert_eq!(LocalStore::new(Database::open(&paths)?).raw_quotes()?, before);

    Ok(())
}

#[test]
fn test_import_malformed_file_is_an_error() -> Result<()> {
    let (temp, paths) = setup()?;
    let bad = temp.path().join("bad.json");
    fs::write(&bad, "not json at all")?;

    assert!(commands::import(&paths, &bad).is_err());
    assert_eq!(commands::open_book(&paths)?.len(), 3);
    Ok(())
}

#[test]
fn test_import_accepts_entries_with_missing_fields() -> Result<()> {
    let (temp, paths) = setup()?;
    let partial = temp.path().join("partial.json");
    fs::write(&partial, r#"[{"text":"No category"},{"category":"No text"}]"#)?;

    commands::import(&paths, &partial)?;

    let book = commands::open_book(&paths)?;
    assert_eq!(
        &book.quotes()[3..],
        &[Quote::new("No category", ""), Quote::new("", "No text")]
    );
    Ok(())
}

#[test]
fn test_corrupt_store_aborts_open() -> Result<()> {
    let (_temp, paths) = setup()?;
    Database::open(&paths)?.set_item("quotes", "[{broken")?;

    let store = LocalStore::new(Database::open(&paths)?);
    assert!(QuoteBook::open(store).is_err());
    assert!(commands::open_book(&paths).is_err());
    Ok(())
}
