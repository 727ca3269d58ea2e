//! Error types.
//!
//! Matching never fails: ambiguous substrings, boundary false positives and
//! duplicate base items are settled by precedence rules. Errors only come from
//! the collaborators around the engine (catalog source, order sink, settings).

use std::path::PathBuf;
use thiserror::Error;

/// Loading a catalog document failed.
///
/// The [`CatalogStore`](crate::CatalogStore) never surfaces this to callers; it
/// logs the error and falls back to an empty catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch catalog {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to parse catalog document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persisting an order failed.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("order store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write order: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sending a reply to the customer failed.
#[derive(Error, Debug)]
#[error("failed to deliver message to {customer}: {message}")]
pub struct SendError {
    pub customer: String,
    pub message: String,
}

/// Settings could not be loaded.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
