//! Error types for relay-sync.
//!
//! Expected conditions (local conflicts, drift) never surface here; they are
//! collected into result `warnings` / `errors`. A [`SyncError`] means the
//! whole operation stopped.

use std::path::PathBuf;

use thiserror::Error;

use relay_adapters::AdapterError;
use relay_core::{CoreError, SecurityViolation};

use crate::source::SourceError;

/// All errors that abort a sync, verify, or validate run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The template source could not produce templates.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Path traversal, oversized manifest, or malformed checksum.
    #[error("security violation: {0}")]
    Security(#[from] SecurityViolation),

    /// An error from an output adapter.
    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// An error from relay-core (config, filters).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest exists but is not valid JSON for the current schema.
    #[error("failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (manifest save).
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
