//! Template sources.
//!
//! A [`TemplateProvider`] yields `(relative_path, content)` pairs plus a
//! [`SourceDescriptor`]. It never falls back to another source on failure;
//! the only automatic delegation is a remote provider with no repository
//! configured, which reads the bundled templates instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use relay_core::config::RelayConfig;
use relay_core::{SourceDescriptor, TemplateFile};

pub mod bundled;
pub mod remote;

pub use bundled::BundledTemplateProvider;
pub use remote::{GithubClient, RemoteClient, RemoteEntry, RemoteError, RemoteTemplateProvider};

/// Why a source produced no templates.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The bundled templates directory does not exist.
    #[error("templates directory not found at {path}")]
    Unavailable { path: PathBuf },

    /// The bundled directory exists but could not be read.
    #[error("failed to read templates at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network, HTTP status, decode, or timeout failure.
    #[error("failed to fetch templates from {repo}@{branch}: {source}")]
    RemoteFetchFailed {
        repo: String,
        branch: String,
        #[source]
        source: RemoteError,
    },
}

/// Outcome of [`TemplateProvider::fetch`].
#[derive(Debug)]
pub struct TemplateResult {
    /// Sorted by `relative_path`.
    pub templates: Vec<TemplateFile>,
    pub source: SourceDescriptor,
    pub error: Option<SourceError>,
}

impl TemplateResult {
    pub fn ok(mut templates: Vec<TemplateFile>, source: SourceDescriptor) -> Self {
        templates.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Self {
            templates,
            source,
            error: None,
        }
    }

    pub fn failed(error: SourceError, source: SourceDescriptor) -> Self {
        Self {
            templates: Vec::new(),
            source,
            error: Some(error),
        }
    }

    pub fn has_templates(&self) -> bool {
        !self.templates.is_empty()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Split into templates or the source error.
    pub fn into_result(self) -> Result<(Vec<TemplateFile>, SourceDescriptor), SourceError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok((self.templates, self.source)),
        }
    }
}

/// Produces the template set for a sync. No sync logic lives here.
pub trait TemplateProvider: Send + Sync {
    fn fetch(&self) -> TemplateResult;

    /// Descriptor of the configured source, without fetching.
    fn describe(&self) -> SourceDescriptor;
}

/// Build the provider a project config asks for.
///
/// An empty `source.repo` yields the bundled provider rooted at
/// `bundled_dir`; anything else yields the remote provider.
pub fn provider_from_config(config: &RelayConfig, bundled_dir: &Path) -> Box<dyn TemplateProvider> {
    let bundled = BundledTemplateProvider::new(bundled_dir);
    if config.source.repo.trim().is_empty() {
        return Box::new(bundled);
    }
    let client = GithubClient::new(Duration::from_secs(config.timeout_secs));
    Box::new(RemoteTemplateProvider::new(
        config.source.repo.clone(),
        config.source.branch.clone(),
        Box::new(client),
        bundled,
    ))
}
