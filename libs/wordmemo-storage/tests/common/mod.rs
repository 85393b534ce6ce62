//! Shared setup for storage integration tests.

use std::path::PathBuf;

use tempfile::TempDir;
use wordmemo_storage::{BackendKind, StorageConfig, StorageFacade};

/// Temporary data directory plus a config pointing into it.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
    pub config: StorageConfig,
}

impl TestContext {
    pub fn new(backend_type: BackendKind) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StorageConfig {
            backend_type,
            data_dir: dir.path().join("data"),
            ..StorageConfig::default()
        };
        Self { dir, config }
    }

    pub fn with_remote(endpoint: Option<String>, timeout_ms: u64) -> Self {
        let mut ctx = Self::new(BackendKind::Remote);
        ctx.config.remote.endpoint = endpoint;
        ctx.config.remote.timeout_ms = timeout_ms;
        ctx
    }

    pub fn facade(&self) -> StorageFacade {
        StorageFacade::from_config(&self.config)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.data_dir.clone()
    }
}
