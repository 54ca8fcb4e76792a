//! Error types for relay-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (config save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config YAML failed to parse; includes file path and line context.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A target tool identifier that is not one of the known tools.
    #[error("unknown target tool '{0}'; expected one of: copilot, claude, cursor, windsurf, cline, aider")]
    UnknownTool(String),

    /// An asset category name that is not recognised.
    #[error("unknown asset type '{0}'; expected one of: instructions, prompts, agents, skills")]
    UnknownCategory(String),

    /// Filter construction produced an empty inclusion set.
    #[error("asset type filter includes no categories")]
    EmptyFilter,

    /// A manifest or template path failed security validation.
    #[error("security violation: {0}")]
    Security(#[from] SecurityViolation),
}

/// Conditions that abort an operation before anything is applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityViolation {
    #[error("path '{path}' escapes its root directory")]
    PathTraversal { path: String },

    #[error("path '{path}' is absolute")]
    AbsolutePath { path: String },

    #[error("manifest tracks {count} assets (maximum {max})")]
    TooManyAssets { count: usize, max: usize },

    #[error("checksum for '{path}' is not a SHA-256 hex digest: '{checksum}'")]
    MalformedChecksum { path: String, checksum: String },

    #[error("checksum recorded for '{path}' which is not a tracked asset")]
    UntrackedChecksum { path: String },
}

/// Convenience constructor for [`CoreError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
