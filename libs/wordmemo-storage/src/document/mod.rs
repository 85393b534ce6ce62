//! Document store backed by a local SQLite file.
//!
//! The schema creates the `word_banks`, `exam_records`, `mistakes` and
//! `settings` tables. Generic key-value traffic lands in `settings`. Every
//! operation runs in its own transaction against a single table.

pub mod schema;

use crate::backend::{BackendKind, PersistenceBackend};
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

enum Location {
    File(PathBuf),
    Memory,
}

pub struct DocumentBackend {
    location: Location,
    conn: Mutex<Option<Connection>>,
}

impl DocumentBackend {
    /// Database at `path`, created on `init` if necessary.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: Mutex::new(None),
        }
    }

    /// In-memory database (for testing).
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: Mutex::new(None),
        }
    }

    fn open(&self) -> std::result::Result<Connection, String> {
        let conn = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
                }
                Connection::open(path)
            }
            Location::Memory => Connection::open_in_memory(),
        }
        .map_err(|e| e.to_string())?;

        migrate(&conn).map_err(|e| e.to_string())?;
        Ok(conn)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let conn = guard.as_mut().ok_or(StorageError::NotOpen)?;
        f(conn)
    }

    /// Path of the database file, if file backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }
}

fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(schema::SCHEMA_VERSION_TABLE)?;
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    if version < schema::SCHEMA_VERSION {
        tracing::info!(from = version, to = schema::SCHEMA_VERSION, "upgrading document store schema");
        conn.execute_batch(schema::SCHEMA)?;
        conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![schema::SCHEMA_VERSION],
        )?;
    }
    Ok(())
}

#[async_trait]
impl PersistenceBackend for DocumentBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Document
    }

    async fn init(&self) -> Result<()> {
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            return Ok(());
        }

        let conn = self.open().map_err(|message| StorageError::Initialization {
            backend: "document",
            message,
        })?;
        tracing::debug!(path = ?self.path(), "document store open");
        *guard = Some(conn);
        Ok(())
    }

    async fn save(&self, key: &str, value: &Value) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, payload, Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let payload: Option<String> = self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let payload = tx
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            tx.commit()?;
            Ok(payload)
        })?;

        payload
            .map(|raw| serde_json::from_str(&raw).map_err(StorageError::from))
            .transpose()
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
            tx.commit()?;
            Ok(())
        })
    }
}
