//! Error types for relay-adapters.

use thiserror::Error;

/// All errors that can arise from output adaptation.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Tera template engine error (preamble rendering).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),
}
