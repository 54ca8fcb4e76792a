//! Per-project configuration.
//!
//! # Storage layout
//!
//! ```text
//! <project>/
//!   .relay.yaml      (optional; defaults apply when absent)
//! ```
//!
//! ```yaml
//! source:
//!   repo: acme/agent-assets
//!   branch: main
//! targets: [claude, cursor]
//! timeout_secs: 30
//! ```
//!
//! # API pattern
//!
//! - `fn_at(project_root: &Path, …)`: explicit root; used in tests with `TempDir`
//! - `templates_dir()` derives the bundled templates location from the
//!   environment / home directory

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::types::TargetTool;

pub const CONFIG_FILE: &str = ".relay.yaml";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Overrides the bundled templates directory.
pub const TEMPLATES_DIR_ENV: &str = "RELAY_TEMPLATES_DIR";

/// Remote template repository settings. An empty `repo` means "no remote".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            branch: default_branch(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub source: SourceConfig,
    /// Empty means the default single-target layout.
    #[serde(default)]
    pub targets: Vec<TargetTool>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            targets: Vec::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// `<project>/.relay.yaml`: pure, no I/O.
pub fn config_path_at(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE)
}

/// Load the project config, or defaults when the file does not exist.
pub fn load_at(project_root: &Path) -> Result<RelayConfig, CoreError> {
    let path = config_path_at(project_root);
    if !path.exists() {
        return Ok(RelayConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(RelayConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| CoreError::ConfigParse { path, source: e })
}

/// Atomically save the project config: `.relay.yaml.tmp` → rename.
pub fn save_at(project_root: &Path, config: &RelayConfig) -> Result<(), CoreError> {
    let path = config_path_at(project_root);
    let tmp = path.with_file_name(format!("{CONFIG_FILE}.tmp"));
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    Ok(())
}

/// Bundled templates directory: `$RELAY_TEMPLATES_DIR`, else `~/.relay/templates`.
pub fn templates_dir() -> Result<PathBuf, CoreError> {
    if let Some(dir) = std::env::var_os(TEMPLATES_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().ok_or(CoreError::HomeNotFound)?;
    Ok(templates_dir_at(&home))
}

/// `<home>/.relay/templates`: pure, no I/O.
pub fn templates_dir_at(home: &Path) -> PathBuf {
    home.join(".relay").join("templates")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let cfg = load_at(dir.path()).unwrap();
        assert_eq!(cfg, RelayConfig::default());
        assert_eq!(cfg.source.branch, "main");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cfg = RelayConfig {
            source: SourceConfig {
                repo: "acme/assets".into(),
                branch: "dev".into(),
            },
            targets: vec![TargetTool::Claude, TargetTool::Cursor],
            timeout_secs: 5,
        };
        save_at(dir.path(), &cfg).unwrap();
        assert!(!dir.path().join(".relay.yaml.tmp").exists());
        assert_eq!(load_at(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(config_path_at(dir.path()), "targets: [claude]\n").unwrap();
        let cfg = load_at(dir.path()).unwrap();
        assert_eq!(cfg.targets, vec![TargetTool::Claude]);
        assert_eq!(cfg.source.repo, "");
        assert_eq!(cfg.source.branch, "main");
    }

    #[test]
    fn malformed_yaml_reports_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(config_path_at(dir.path()), "targets: [unclosed").unwrap();
        let err = load_at(dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse { .. }));
        assert!(err.to_string().contains(".relay.yaml"));
    }

    #[test]
    fn templates_dir_is_under_home() {
        let home = TempDir::new().unwrap();
        assert!(templates_dir_at(home.path()).ends_with(".relay/templates"));
    }
}
