//! Subcommand implementations and the argument plumbing they share.

pub mod diff;
pub mod sync;
pub mod validate;
pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use relay_core::config::{self, RelayConfig};
use relay_core::{AssetTypeFilter, TargetTool};
use relay_sync::{provider_from_config, SyncEngine};

pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `--only` / `--exclude`
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only these asset types (instructions, prompts, agents, skills).
    #[arg(long, value_delimiter = ',', num_args = 1.., conflicts_with = "exclude")]
    pub only: Vec<String>,

    /// Every asset type except these.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub exclude: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<Option<AssetTypeFilter>> {
        if !self.only.is_empty() {
            return Ok(Some(AssetTypeFilter::only(&self.only).context("invalid --only")?));
        }
        if !self.exclude.is_empty() {
            return Ok(Some(
                AssetTypeFilter::exclude(&self.exclude).context("invalid --exclude")?,
            ));
        }
        Ok(None)
    }
}

/// Where templates come from, layered over `.relay.yaml`.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Remote template repository (`owner/repo`).
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch of the remote repository.
    #[arg(long)]
    pub branch: Option<String>,

    /// Local templates directory (defaults to $RELAY_TEMPLATES_DIR or ~/.relay/templates).
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

/// Canonical project root, defaulting to the current directory.
pub fn project_root(path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p,
        None => std::env::current_dir().context("could not determine current directory")?,
    };
    path.canonicalize()
        .with_context(|| format!("project directory not found: {}", path.display()))
}

/// Load `.relay.yaml` and apply flag overrides.
pub fn load_config(
    root: &Path,
    source: &SourceArgs,
    targets: &[TargetTool],
) -> Result<RelayConfig> {
    let mut cfg = config::load_at(root)
        .with_context(|| format!("failed to load {}", config::config_path_at(root).display()))?;
    if let Some(repo) = &source.repo {
        cfg.source.repo = repo.clone();
    }
    if let Some(branch) = &source.branch {
        cfg.source.branch = branch.clone();
    }
    if !targets.is_empty() {
        cfg.targets = targets.to_vec();
    }
    Ok(cfg)
}

pub fn build_engine(cfg: &RelayConfig, source: &SourceArgs) -> Result<SyncEngine> {
    let bundled = match &source.templates {
        Some(dir) => dir.clone(),
        None => config::templates_dir().context("could not resolve templates directory")?,
    };
    let provider = provider_from_config(cfg, &bundled);
    SyncEngine::new(provider, TOOL_VERSION).context("failed to initialise output adapters")
}
