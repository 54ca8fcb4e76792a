//! GitHub-hosted templates.
//!
//! The `templates` directory of `owner/repo@branch` is listed recursively
//! through the contents API and every file is downloaded raw. Any failure
//! ends the fetch with [`SourceError::RemoteFetchFailed`]; bundled templates
//! are used only when no repository is configured.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use relay_core::{SourceDescriptor, TemplateFile};

use super::{BundledTemplateProvider, SourceError, TemplateProvider, TemplateResult};

/// Directory listed inside the remote repository.
pub const REMOTE_TEMPLATES_DIR: &str = "templates";
const API_BASE: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
/// The contents API returns at most 1,000 entries per directory.
const MAX_PAGES: usize = 10;
const USER_AGENT: &str = concat!("relay/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Connection failure or timeout.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// One entry of a contents-API directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl RemoteEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }

    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// Transport seam for the remote provider.
pub trait RemoteClient: Send + Sync {
    /// One page (1-based) of the listing of `path` at `branch`.
    fn list_dir(
        &self,
        repo: &str,
        branch: &str,
        path: &str,
        page: usize,
    ) -> Result<Vec<RemoteEntry>, RemoteError>;

    fn download(&self, url: &str) -> Result<String, RemoteError>;
}

/// Blocking GitHub client with a fixed per-request timeout.
pub struct GithubClient {
    agent: ureq::Agent,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self { agent, token }
    }

    fn get(&self, url: &str) -> ureq::Request {
        let req = self.agent.get(url);
        match &self.token {
            Some(token) => req.set("Authorization", &format!("Bearer {token}")),
            None => req,
        }
    }
}

fn map_ureq(url: &str, err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(status, _) => RemoteError::Status {
            status,
            url: url.to_string(),
        },
        ureq::Error::Transport(t) => RemoteError::Transport {
            url: url.to_string(),
            message: t.to_string(),
        },
    }
}

impl RemoteClient for GithubClient {
    fn list_dir(
        &self,
        repo: &str,
        branch: &str,
        path: &str,
        page: usize,
    ) -> Result<Vec<RemoteEntry>, RemoteError> {
        let url = format!("{API_BASE}/repos/{repo}/contents/{path}");
        let response = self
            .get(&url)
            .set("Accept", "application/vnd.github+json")
            .query("ref", branch)
            .query("per_page", &PER_PAGE.to_string())
            .query("page", &page.to_string())
            .call()
            .map_err(|e| map_ureq(&url, e))?;
        response
            .into_json::<Vec<RemoteEntry>>()
            .map_err(|e| RemoteError::Decode {
                url,
                message: e.to_string(),
            })
    }

    fn download(&self, url: &str) -> Result<String, RemoteError> {
        let response = self.get(url).call().map_err(|e| map_ureq(url, e))?;
        response.into_string().map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

pub struct RemoteTemplateProvider {
    repo: String,
    branch: String,
    client: Box<dyn RemoteClient>,
    bundled: BundledTemplateProvider,
}

impl RemoteTemplateProvider {
    pub fn new(
        repo: impl Into<String>,
        branch: impl Into<String>,
        client: Box<dyn RemoteClient>,
        bundled: BundledTemplateProvider,
    ) -> Self {
        Self {
            repo: repo.into().trim().to_string(),
            branch: branch.into(),
            client,
            bundled,
        }
    }

    fn is_configured(&self) -> bool {
        !self.repo.is_empty()
    }

    /// Collect every file below `path`.
    ///
    /// The contents API may ignore `page` and return the full listing each
    /// time, so a page with no unseen entries also ends the directory.
    fn list_all(&self, path: &str, out: &mut Vec<RemoteEntry>) -> Result<(), RemoteError> {
        let mut seen: HashSet<String> = HashSet::new();
        for page in 1..=MAX_PAGES {
            let entries = self.client.list_dir(&self.repo, &self.branch, path, page)?;
            let count = entries.len();
            let mut fresh = 0;
            for entry in entries {
                if !seen.insert(entry.path.clone()) {
                    continue;
                }
                fresh += 1;
                if entry.is_dir() {
                    self.list_all(&entry.path, out)?;
                } else if entry.is_file() {
                    out.push(entry);
                }
            }
            if count < PER_PAGE || fresh == 0 {
                return Ok(());
            }
        }
        Err(RemoteError::Decode {
            url: path.to_string(),
            message: format!("listing did not end after {MAX_PAGES} pages"),
        })
    }

    fn download_all(&self) -> Result<Vec<TemplateFile>, RemoteError> {
        let mut entries = Vec::new();
        self.list_all(REMOTE_TEMPLATES_DIR, &mut entries)?;
        tracing::info!(
            "downloading {} template(s) from {}@{}",
            entries.len(),
            self.repo,
            self.branch
        );

        let prefix = format!("{REMOTE_TEMPLATES_DIR}/");
        let mut templates = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(url) = entry.download_url.as_deref() else {
                return Err(RemoteError::Decode {
                    url: entry.path.clone(),
                    message: "file entry has no download_url".to_string(),
                });
            };
            let content = self.client.download(url)?;
            let rel = entry.path.strip_prefix(&prefix).unwrap_or(&entry.path);
            tracing::debug!("downloaded {rel}");
            templates.push(TemplateFile::new(rel, content));
        }
        Ok(templates)
    }
}

impl TemplateProvider for RemoteTemplateProvider {
    fn fetch(&self) -> TemplateResult {
        if !self.is_configured() {
            tracing::debug!("no remote repository configured, using bundled templates");
            return self.bundled.fetch();
        }
        match self.download_all() {
            Ok(templates) => TemplateResult::ok(templates, self.describe()),
            Err(source) => {
                tracing::error!("remote fetch from {} failed: {source}", self.repo);
                TemplateResult::failed(
                    SourceError::RemoteFetchFailed {
                        repo: self.repo.clone(),
                        branch: self.branch.clone(),
                        source,
                    },
                    self.describe(),
                )
            }
        }
    }

    fn describe(&self) -> SourceDescriptor {
        if self.is_configured() {
            SourceDescriptor::remote(&self.repo, &self.branch)
        } else {
            self.bundled.describe()
        }
    }
}
