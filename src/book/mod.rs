//! In-memory quote book backed by the local store
//!
//! `QuoteBook` is the single owner of the working collection and the
//! selected filter. Every mutation is flushed to the store as a whole.

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::models::{CategoryFilter, Quote};
use crate::store::{LocalStore, StoreError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Please fill in both the quote and category fields")]
    MissingField,
}

#[derive(Debug)]
pub struct QuoteBook {
    store: LocalStore,
    quotes: Vec<Quote>,
    filter: CategoryFilter,
}

impl QuoteBook {
    /// Load the persisted collection and filter
    pub fn open(store: LocalStore) -> Result<Self, StoreError> {
        let quotes = store.load()?;
        let filter = store.load_filter();
        Ok(Self {
            store,
            quotes,
            filter,
        })
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.store.save_filter(&filter);
        self.filter = filter;
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for quote in &self.quotes {
            if !seen.contains(&quote.category.as_str()) {
                seen.push(&quote.category);
            }
        }
        seen
    }

    /// Quotes matching the selected filter
    pub fn filtered(&self) -> Vec<&Quote> {
        self.filtered_by(&self.filter)
    }

    pub fn filtered_by(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| filter.matches(q)).collect()
    }

    /// Uniformly pick one quote from the filtered set
    pub fn random_quote<R: Rng>(&self, rng: &mut R) -> Option<&Quote> {
        self.random_quote_by(&self.filter, rng)
    }

    pub fn random_quote_by<R: Rng>(&self, filter: &CategoryFilter, rng: &mut R) -> Option<&Quote> {
        let candidates = self.filtered_by(filter);
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.gen_range(0..candidates.len())])
    }

    /// Append a user-entered quote after trimming both fields
    pub fn add(&mut self, text: &str, category: &str) -> Result<&Quote, QuoteError> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(QuoteError::MissingField);
        }

        self.quotes.push(Quote::new(text, category));
        self.store.save(&self.quotes);
        info!(category, total = self.quotes.len(), "Added quote");
        Ok(&self.quotes[self.quotes.len() - 1])
    }

    /// Append every entry of a JSON array; returns how many were appended
    ///
    /// Entries are not validated: each element becomes a quote, with empty
    /// fields wherever the element does not carry a string.
    pub fn import_json(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let imported: Vec<Quote> = entries.iter().map(Quote::from_value).collect();
        let count = imported.len();
        if count == 0 {
            return Ok(0);
        }

        self.quotes.extend(imported);
        self.store.save(&self.quotes);
        info!(count, total = self.quotes.len(), "Imported quotes");
        Ok(count)
    }

    /// Full collection as pretty-printed JSON
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.quotes)
    }

    /// Replace the whole collection and persist it
    pub fn replace(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.store.save(&self.quotes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn book_with(quotes: &[Quote]) -> QuoteBook {
        let store = LocalStore::new(Database::open_in_memory().unwrap());
        store.save(quotes);
        QuoteBook::open(store).unwrap()
    }

    #[test]
    fn test_add_trims_and_persists() {
        let mut book = book_with(&[]);
        let added = book.add("  Stay hungry.  ", " Wisdom ").unwrap().clone();
        assert_eq!(added, Quote::new("Stay hungry.", "Wisdom"));
        assert_eq!(book.store().load().unwrap(), vec![added]);
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut book = book_with(&[]);
        assert_eq!(book.add("   ", "Wisdom").unwrap_err(), QuoteError::MissingField);
        assert_eq!(book.add("Text", "").unwrap_err(), QuoteError::MissingField);
        assert!(book.is_empty());
        assert_eq!(book.store().raw_quotes().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let book = book_with(&[
            Quote::new("a", "Motivation"),
            Quote::new("b", "Inspiration"),
            Quote::new("c", "Motivation"),
        ]);
        assert_eq!(book.categories(), vec!["Motivation", "Inspiration"]);
    }

    #[test]
    fn test_random_quote_respects_filter() {
        let mut book = book_with(&[
            Quote::new("a", "Motivation"),
            Quote::new("b", "Inspiration"),
            Quote::new("c", "Motivation"),
        ]);
        book.set_filter(CategoryFilter::Category("Inspiration".to_string()));

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(book.random_quote(&mut rng).unwrap().text, "b");
        }
    }

    #[test]
    fn test_random_quote_none_when_filter_matches_nothing() {
        let mut book = book_with(&[Quote::new("a", "Motivation")]);
        book.set_filter(CategoryFilter::Category("Humor".to_string()));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(book.random_quote(&mut rng).is_none());
    }

    #[test]
    fn test_import_appends_without_dedup() {
        let mut book = book_with(&[Quote::new("a", "X")]);
        let count = book
            .import_json(r#"[{"text":"a","category":"X"},{"text":"b"}]"#)
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            book.quotes(),
            &[Quote::new("a", "X"), Quote::new("a", "X"), Quote::new("b", "")]
        );
    }

    #[test]
    fn test_import_keeps_malformed_entries() {
        let mut book = book_with(&[Quote::new("a", "X")]);
        let count = book
            .import_json(
                r#"[{"text":"ok","category":null},{"text":42,"category":"Y"},null,"bare",{"text":"fine","category":"Z"}]"#,
            )
            .unwrap();

        assert_eq!(count, 5);
        assert_eq!(
            book.quotes(),
            &[
                Quote::new("a", "X"),
                Quote::new("ok", ""),
                Quote::new("", "Y"),
                Quote::new("", ""),
                Quote::new("", ""),
                Quote::new("fine", "Z"),
            ]
        );
        assert_eq!(book.store().load().unwrap().len(), 6);
    }

    #[test]
    fn test_import_rejects_non_array() {
        let mut book = book_with(&[Quote::new("a", "X")]);
        assert!(book.import_json(r#"{"text":"a"}"#).is_err());
        assert_eq!(book.len(), 1);
    }
}
