//! Storage configuration.

use crate::backend::BackendKind;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default request timeout for the remote backend.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default byte quota for the local backend.
pub const DEFAULT_LOCAL_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Remote backend options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL, e.g. `https://api.example.com/wordmemo`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Backend selection and per-backend options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend_type: BackendKind,
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Directory holding the document database and the local store file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_local_quota")]
    pub local_quota_bytes: usize,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_local_quota() -> usize {
    DEFAULT_LOCAL_QUOTA_BYTES
}
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordmemo")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend_type: BackendKind::default(),
            remote: RemoteConfig::default(),
            data_dir: default_data_dir(),
            local_quota_bytes: DEFAULT_LOCAL_QUOTA_BYTES,
        }
    }
}

impl StorageConfig {
    /// Load configuration from well-known paths, then apply env overrides.
    ///
    /// Search order:
    /// 1. `wordmemo.toml` in the current directory
    /// 2. `<config dir>/wordmemo/config.toml`
    ///
    /// Env overrides: `WORDMEMO_BACKEND`, `WORDMEMO_REMOTE_ENDPOINT`,
    /// `WORDMEMO_REMOTE_TIMEOUT_MS`, `WORDMEMO_DATA_DIR`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load from an explicit file, or search the default locations.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let local = PathBuf::from("wordmemo.toml");
                if local.exists() {
                    Some(local)
                } else {
                    dirs::config_dir()
                        .map(|dir| dir.join("wordmemo").join("config.toml"))
                        .filter(|p| p.exists())
                }
            }
        };

        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply overrides from a variable lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("WORDMEMO_BACKEND") {
            self.backend_type =
                BackendKind::from_str(&value).ok_or(ConfigError::UnknownBackend(value))?;
        }
        if let Some(value) = lookup("WORDMEMO_REMOTE_ENDPOINT") {
            let value = value.trim().to_string();
            self.remote.endpoint = (!value.is_empty()).then_some(value);
        }
        if let Some(value) = lookup("WORDMEMO_REMOTE_TIMEOUT_MS") {
            self.remote.timeout_ms = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "WORDMEMO_REMOTE_TIMEOUT_MS",
                value,
            })?;
        }
        if let Some(value) = lookup("WORDMEMO_DATA_DIR") {
            self.data_dir = PathBuf::from(value);
        }
        Ok(())
    }

    /// Path of the document database file.
    pub fn document_path(&self) -> PathBuf {
        self.data_dir.join("wordmemo.db")
    }

    /// Path of the file mirroring the local store.
    pub fn local_path(&self) -> PathBuf {
        self.data_dir.join("local-storage.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.backend_type, BackendKind::Document);
        assert_eq!(config.remote.endpoint, None);
        assert_eq!(config.remote.timeout_ms, 5000);
        assert!(config.document_path().ends_with("wordmemo.db"));
    }

    #[test]
    fn parses_toml_with_partial_fields() {
        let config: StorageConfig = toml::from_str(
            r#"
            backend_type = "remote"

            [remote]
            endpoint = "https://api.example.com/wordmemo"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend_type, BackendKind::Remote);
        assert_eq!(
            config.remote.endpoint.as_deref(),
            Some("https://api.example.com/wordmemo")
        );
        assert_eq!(config.remote.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn accepts_legacy_backend_names_in_toml() {
        let config: StorageConfig = toml::from_str(r#"backend_type = "indexeddb""#).unwrap();
        assert_eq!(config.backend_type, BackendKind::Document);
    }

    #[test]
    fn env_overrides_win() {
        let mut config = StorageConfig::default();
        config
            .apply_overrides(lookup(&[
                ("WORDMEMO_BACKEND", "api"),
                ("WORDMEMO_REMOTE_ENDPOINT", "http://localhost:8080"),
                ("WORDMEMO_REMOTE_TIMEOUT_MS", "250"),
                ("WORDMEMO_DATA_DIR", "/tmp/wordmemo-test"),
            ]))
            .unwrap();

        assert_eq!(config.backend_type, BackendKind::Remote);
        assert_eq!(config.remote.endpoint.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.remote.timeout_ms, 250);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/wordmemo-test"));
    }

    #[test]
    fn blank_endpoint_override_clears_endpoint() {
        let mut config = StorageConfig::default();
        config.remote.endpoint = Some("http://old".to_string());
        config
            .apply_overrides(lookup(&[("WORDMEMO_REMOTE_ENDPOINT", "  ")]))
            .unwrap();
        assert_eq!(config.remote.endpoint, None);
    }

    #[test]
    fn rejects_unknown_backend_and_bad_timeout() {
        let mut config = StorageConfig::default();
        assert!(matches!(
            config.apply_overrides(lookup(&[("WORDMEMO_BACKEND", "floppy")])),
            Err(ConfigError::UnknownBackend(_))
        ));
        assert!(matches!(
            config.apply_overrides(lookup(&[("WORDMEMO_REMOTE_TIMEOUT_MS", "soon")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordmemo.toml");
        std::fs::write(&path, "backend_type = \"local\"\nlocal_quota_bytes = 1024\n").unwrap();

        let config = StorageConfig::from_file(&path).unwrap();
        assert_eq!(config.backend_type, BackendKind::Local);
        assert_eq!(config.local_quota_bytes, 1024);
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordmemo.toml");
        std::fs::write(&path, "backend_type = 3").unwrap();
        assert!(matches!(
            StorageConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
