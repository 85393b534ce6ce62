//! Storage error types.

use thiserror::Error;

/// Result type alias using StorageError.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors reported by persistence backends and the facade.
///
/// Nothing here is retried; every failure reaches the caller once.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend is missing required configuration (e.g. remote endpoint).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The backend could not be opened.
    #[error("failed to initialize {backend} backend: {message}")]
    Initialization {
        backend: &'static str,
        message: String,
    },

    /// The local store would exceed its byte quota.
    #[error("local storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// A document store transaction failed or was aborted.
    #[error("transaction failed: {0}")]
    Transaction(#[from] rusqlite::Error),

    /// The document store was used before `init`.
    #[error("document store is not open")]
    NotOpen,

    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    /// The remote store answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown backend type: {0}")]
    UnknownBackend(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_carries_status() {
        let error = StorageError::Http {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn quota_error_display() {
        let error = StorageError::QuotaExceeded {
            needed: 12,
            quota: 10,
        };
        assert_eq!(
            error.to_string(),
            "local storage quota exceeded: 12 bytes needed, 10 allowed"
        );
    }

    #[test]
    fn unknown_backend_display() {
        let error = ConfigError::UnknownBackend("floppy".to_string());
        assert_eq!(error.to_string(), "unknown backend type: floppy");
    }
}
