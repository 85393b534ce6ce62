//! Single entry point for persistence.
//!
//! The facade picks a backend from configuration, initializes it lazily on
//! first use and, if that fails, switches to local storage for the rest of
//! the process. It also normalizes values so every backend sees the same
//! shapes: strings that hold JSON are stored as the structured value, and
//! loads always hand back text.

use crate::backend::{BackendKind, PersistenceBackend};
use crate::config::{StorageConfig, DEFAULT_LOCAL_QUOTA_BYTES};
use crate::document::DocumentBackend;
use crate::error::Result;
use crate::local::LocalBackend;
use crate::remote::RemoteBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Outcome of backend initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub requested: BackendKind,
    pub active: BackendKind,
    pub warnings: Vec<String>,
}

impl InitReport {
    pub fn fell_back(&self) -> bool {
        self.requested != self.active || !self.warnings.is_empty()
    }
}

struct Active {
    backend: Arc<dyn PersistenceBackend>,
    report: InitReport,
}

pub struct StorageFacade {
    primary: Arc<dyn PersistenceBackend>,
    fallback: Arc<dyn PersistenceBackend>,
    local_quota_bytes: usize,
    active: OnceCell<Active>,
}

impl StorageFacade {
    /// Facade over the backend named in `config`. Nothing is opened yet.
    pub fn from_config(config: &StorageConfig) -> Self {
        let primary: Arc<dyn PersistenceBackend> = match config.backend_type {
            BackendKind::Local => Arc::new(LocalBackend::new(
                config.local_path(),
                config.local_quota_bytes,
            )),
            BackendKind::Document => Arc::new(DocumentBackend::new(config.document_path())),
            BackendKind::Remote => Arc::new(RemoteBackend::new(&config.remote)),
        };
        let fallback = Arc::new(LocalBackend::new(
            config.local_path(),
            config.local_quota_bytes,
        ));

        Self {
            primary,
            fallback,
            local_quota_bytes: config.local_quota_bytes,
            active: OnceCell::new(),
        }
    }

    /// Facade over explicit backends.
    pub fn with_backends(
        primary: Arc<dyn PersistenceBackend>,
        fallback: Arc<dyn PersistenceBackend>,
    ) -> Self {
        Self {
            primary,
            fallback,
            local_quota_bytes: DEFAULT_LOCAL_QUOTA_BYTES,
            active: OnceCell::new(),
        }
    }

    /// Facade over `primary`, falling back to an in-memory local store.
    pub fn with_backend(primary: Arc<dyn PersistenceBackend>) -> Self {
        Self::with_backends(
            primary,
            Arc::new(LocalBackend::in_memory(DEFAULT_LOCAL_QUOTA_BYTES)),
        )
    }

    async fn active(&self) -> &Active {
        self.active
            .get_or_init(|| async {
                let requested = self.primary.kind();
                match self.primary.init().await {
                    Ok(()) => {
                        debug!(backend = %requested, "storage backend ready");
                        Active {
                            backend: Arc::clone(&self.primary),
                            report: InitReport {
                                requested,
                                active: requested,
                                warnings: Vec::new(),
                            },
                        }
                    }
                    Err(e) => {
                        warn!(backend = %requested, error = %e, "storage backend unavailable, using local storage");
                        let mut warnings =
                            vec![format!("{requested} backend unavailable: {e}")];
                        let backend = match self.fallback.init().await {
                            Ok(()) => Arc::clone(&self.fallback),
                            Err(e) => {
                                warn!(error = %e, "local storage unavailable, keeping data in memory");
                                warnings.push(format!("local storage unavailable: {e}"));
                                Arc::new(LocalBackend::in_memory(self.local_quota_bytes))
                                    as Arc<dyn PersistenceBackend>
                            }
                        };
                        Active {
                            report: InitReport {
                                requested,
                                active: backend.kind(),
                                warnings,
                            },
                            backend,
                        }
                    }
                }
            })
            .await
    }

    /// Initialize now instead of on first use. Safe to call repeatedly.
    pub async fn init(&self) -> InitReport {
        self.active().await.report.clone()
    }

    pub async fn init_report(&self) -> InitReport {
        self.init().await
    }

    /// Kind of the backend actually in use.
    pub async fn active_kind(&self) -> BackendKind {
        self.active().await.report.active
    }

    /// Store `value` under `key`. A string that parses as JSON is stored as
    /// the parsed value.
    pub async fn save(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = match value.into() {
            Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
            other => other,
        };
        debug!(key, "save");
        self.active().await.backend.save(key, &value).await
    }

    /// Text stored under `key`. Strings come back verbatim; structured
    /// values come back as JSON text.
    pub async fn load(&self, key: &str) -> Result<Option<String>> {
        debug!(key, "load");
        match self.active().await.backend.load(key).await? {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(other) => Ok(Some(serde_json::to_string(&other)?)),
        }
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        debug!(key, "remove");
        self.active().await.backend.remove(key).await
    }

    pub async fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.save(key, serde_json::to_value(value)?).await
    }

    /// Decode the value under `key`. A stored string is also tried as JSON
    /// text, since some backends keep structured values as strings.
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.active().await.backend.load(key).await? else {
            return Ok(None);
        };
        match value {
            Value::String(text) => match serde_json::from_value(Value::String(text.clone())) {
                Ok(decoded) => Ok(Some(decoded)),
                Err(_) => Ok(Some(serde_json::from_str(&text)?)),
            },
            other => Ok(Some(serde_json::from_value(other)?)),
        }
    }
}
