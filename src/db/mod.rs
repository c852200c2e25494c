//! SQLite database layer for quotebook
//!
//! A whole-value key-value table; callers own the encoding of each value

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::QuotebookPaths;

/// Database wrapper
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing database; the schema comes from `init`
    pub fn open(paths: &QuotebookPaths) -> Result<Self> {
        let conn = Connection::open(&paths.db_file).context("Failed to open quotebook database")?;
        Ok(Self { conn })
    }

    /// Initialize a new database with schema
    pub fn init(paths: &QuotebookPaths) -> Result<Self> {
        let conn =
            Connection::open(&paths.db_file).context("Failed to create quotebook database")?;
        Self::with_schema(conn)
    }

    /// Private, non-persistent database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_schema(conn)
    }

    fn with_schema(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                updated_at  INTEGER NOT NULL
            )
            "#,
            [],
        )
        .context("Failed to create kv table")?;

        Ok(Self { conn })
    }

    /// Read the value stored under `key`
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key: {}", key))
    }

    /// Replace the value stored under `key`
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        self.conn
            .execute(
                r#"
                INSERT INTO kv (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE
                SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value, now],
            )
            .with_context(|| format!("Failed to write key: {}", key))?;
        Ok(())
    }

    /// All keys with their last write time, oldest first
    pub fn keys(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, updated_at FROM kv ORDER BY updated_at, key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<(String, i64)>>>()
            .context("Failed to list keys")?;
        Ok(rows)
    }
}
