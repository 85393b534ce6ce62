//! The key-value contract every persistence backend implements.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which storage technology a backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[serde(alias = "localstorage")]
    Local,
    #[serde(alias = "indexeddb")]
    Document,
    #[serde(alias = "api")]
    Remote,
}

impl Default for BackendKind {
    fn default() -> Self {
        Self::Document
    }
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Document => "document",
            Self::Remote => "remote",
        }
    }

    /// Parse a backend name. Also accepts the older storage type names.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "localstorage" => Some(Self::Local),
            "document" | "indexeddb" => Some(Self::Document),
            "remote" | "api" => Some(Self::Remote),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform asynchronous key-value store.
///
/// Values are opaque JSON: either a string or a structured value. Callers
/// own their schema.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Open the backend. Called once before any other operation.
    async fn init(&self) -> Result<()>;

    async fn save(&self, key: &str, value: &Value) -> Result<()>;

    /// Returns `None` when nothing is stored under `key`.
    async fn load(&self, key: &str) -> Result<Option<Value>>;

    async fn remove(&self, key: &str) -> Result<()>;
}
