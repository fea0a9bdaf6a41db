//! Error types for ferro-reconcile.
//!
//! Reconciliation itself fails open: the public operations on
//! [`Reconciler`](crate::reconcile::Reconciler) log and return empty or
//! partial results instead of propagating errors. `ReconcileError` is the
//! error currency at the seams where that posture does not apply: the source
//! query traits, accession parsing, and configuration/fixture loading.

use thiserror::Error;

/// Main error type for ferro-reconcile operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    /// Accession id does not start with `rs`/`ss` or has a non-numeric suffix.
    #[error("Invalid variant accession: {input}")]
    InvalidAccession { input: String },

    /// An injected data source failed to answer a query.
    #[error("Source query failed: {msg}")]
    Source { msg: String },

    /// Configuration file could not be read or parsed.
    #[error("Config error: {msg}")]
    Config { msg: String },

    /// IO error (for file operations).
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error.
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl ReconcileError {
    /// Create a source error from any displayable cause.
    pub fn source(msg: impl Into<String>) -> Self {
        ReconcileError::Source { msg: msg.into() }
    }
}

impl From<std::io::Error> for ReconcileError {
    fn from(err: std::io::Error) -> Self {
        ReconcileError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReconcileError {
    fn from(err: serde_json::Error) -> Self {
        ReconcileError::Json {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ReconcileError {
    fn from(err: toml::de::Error) -> Self {
        ReconcileError::Config {
            msg: err.to_string(),
        }
    }
}
