//! Local store for quotes and the selected filter
//!
//! Every write replaces the whole value. Writes never surface errors to
//! callers; a failed write is logged and the previous value stays in place.

use thiserror::Error;
use tracing::{debug, warn};

use crate::db::Database;
use crate::models::{CategoryFilter, Quote};

/// Key holding the JSON-encoded quote collection
pub const QUOTES_KEY: &str = "quotes";
/// Key holding the last selected category, or `all`
pub const FILTER_KEY: &str = "lastSelectedFilter";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read `{key}` from storage: {reason}")]
    Read { key: &'static str, reason: String },

    #[error("Stored `{key}` is not valid JSON: {source}")]
    Parse {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write `{key}` to storage: {reason}")]
    Write { key: &'static str, reason: String },
}

/// Whole-value persistence over the key-value database
#[derive(Debug)]
pub struct LocalStore {
    db: Database,
}

impl LocalStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Load the persisted collection; empty when nothing was saved yet
    pub fn load(&self) -> Result<Vec<Quote>, StoreError> {
        let Some(raw) = self.read(QUOTES_KEY)? else {
            debug!("No persisted quotes, starting empty");
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            key: QUOTES_KEY,
            source,
        })
    }

    /// Persist the collection, logging and swallowing any storage failure
    pub fn save(&self, quotes: &[Quote]) {
        if let Err(e) = self.try_save(quotes) {
            warn!(error = %e, "Quotes were not persisted");
        }
    }

    pub fn try_save(&self, quotes: &[Quote]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(quotes).map_err(|e| StoreError::Write {
            key: QUOTES_KEY,
            reason: e.to_string(),
        })?;
        self.write(QUOTES_KEY, &raw)?;
        debug!(count = quotes.len(), "Persisted quotes");
        Ok(())
    }

    /// Last selected filter; `All` when unset or unreadable
    pub fn load_filter(&self) -> CategoryFilter {
        match self.read(FILTER_KEY) {
            Ok(Some(raw)) => raw.parse::<CategoryFilter>().unwrap_or_default(),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                warn!(error = %e, "Falling back to the 'all' filter");
                CategoryFilter::All
            }
        }
    }

    pub fn save_filter(&self, filter: &CategoryFilter) {
        if let Err(e) = self.write(FILTER_KEY, &filter.to_string()) {
            warn!(error = %e, "Filter selection was not persisted");
        }
    }

    /// Serialized collection exactly as stored
    pub fn raw_quotes(&self) -> Result<Option<String>, StoreError> {
        self.read(QUOTES_KEY)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn read(&self, key: &'static str) -> Result<Option<String>, StoreError> {
        self.db.get_item(key).map_err(|e| StoreError::Read {
            key,
            reason: format!("{:#}", e),
        })
    }

    fn write(&self, key: &'static str, value: &str) -> Result<(), StoreError> {
        self.db.set_item(key, value).map_err(|e| StoreError::Write {
            key,
            reason: format!("{:#}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> LocalStore {
        LocalStore::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_load_empty_store() {
        let store = memory_store();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.load_filter(), CategoryFilter::All);
    }

    #[test]
    fn test_corrupt_quotes_fail_to_load() {
        let store = memory_store();
        store.database().set_item(QUOTES_KEY, "{not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { key: QUOTES_KEY, .. }));
    }

    #[test]
    fn test_save_load_is_byte_stable() {
        let store = memory_store();
        store.save(&[Quote::new("A", "X"), Quote::new("B", "Y")]);
        let before = store.raw_quotes().unwrap().unwrap();

        let loaded = store.load().unwrap();
        store.save(&loaded);
        let after = store.raw_quotes().unwrap().unwrap();

        assert_eq!(before, after);
        assert_eq!(before, r#"[{"text":"A","category":"X"},{"text":"B","category":"Y"}]"#);
    }

    #[test]
    fn test_filter_uses_sentinel_for_all() {
        let store = memory_store();
        store.save_filter(&CategoryFilter::Category("Motivation".to_string()));
        assert_eq!(
            store.load_filter(),
            CategoryFilter::Category("Motivation".to_string())
        );

        store.save_filter(&CategoryFilter::All);
        assert_eq!(store.database().get_item(FILTER_KEY).unwrap().as_deref(), Some("all"));
    }
}
