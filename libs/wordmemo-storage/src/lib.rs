//! Persistence for the vocabulary drill.
//!
//! Three interchangeable backends sit behind [`PersistenceBackend`]:
//! - [`LocalBackend`]: string map mirrored to a JSON file, with a byte quota
//! - [`DocumentBackend`]: SQLite database with typed partitions
//! - [`RemoteBackend`]: JSON service over HTTP
//!
//! Applications talk to [`StorageFacade`], which selects a backend from
//! [`StorageConfig`] and falls back to local storage when it cannot start.

pub mod backend;
pub mod config;
pub mod document;
pub mod error;
pub mod facade;
pub mod local;
pub mod remote;
pub mod session_store;

pub use backend::{BackendKind, PersistenceBackend};
pub use config::{RemoteConfig, StorageConfig};
pub use document::DocumentBackend;
pub use error::{ConfigError, Result, StorageError};
pub use facade::{InitReport, StorageFacade};
pub use local::LocalBackend;
pub use remote::RemoteBackend;
pub use session_store::{load_context, persist};
