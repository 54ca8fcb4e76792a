//! Drift detection against the install manifest.
//!
//! Each `(trackingPath, checksum)` is resolved (`tool:path` relative to the
//! project root, plain paths under `.github`) and re-hashed. Restore rewrites
//! Modified and Missing files from the current template set.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use relay_adapters::AdapterRegistry;
use relay_core::checksum::file_checksum;
use relay_core::{AssetCategory, AssetTypeFilter, Manifest, TargetTool, TrackingPath};

use crate::engine::SyncEngine;
use crate::error::{io_err, SyncError};
use crate::manifest_store;
use crate::plan::{planned_outputs, PlannedOutput};
use crate::writer::write_atomic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerifyStatus {
    Valid,
    Modified,
    Missing,
    Restored,
}

impl VerifyStatus {
    pub fn is_drift(&self) -> bool {
        matches!(self, VerifyStatus::Modified | VerifyStatus::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAssetResult {
    pub tracking_path: String,
    pub status: VerifyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_checksum: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    pub assets: Vec<VerifyAssetResult>,
    pub errors: Vec<String>,
    pub exit_code: i32,
}

impl VerifyResult {
    fn no_manifest(project_root: &Path) -> Self {
        VerifyResult {
            assets: Vec::new(),
            errors: vec![format!(
                "no manifest found at {}",
                manifest_store::manifest_path_at(project_root).display()
            )],
            exit_code: 1,
        }
    }

    fn count(&self, status: VerifyStatus) -> usize {
        self.assets.iter().filter(|a| a.status == status).count()
    }

    pub fn valid_count(&self) -> usize {
        self.count(VerifyStatus::Valid)
    }

    pub fn modified_count(&self) -> usize {
        self.count(VerifyStatus::Modified)
    }

    pub fn missing_count(&self) -> usize {
        self.count(VerifyStatus::Missing)
    }

    pub fn restored_count(&self) -> usize {
        self.count(VerifyStatus::Restored)
    }

    pub fn drift(&self) -> impl Iterator<Item = &VerifyAssetResult> {
        self.assets.iter().filter(|a| a.status.is_drift())
    }

    fn settle_exit_code(&mut self) {
        let drifted = self.assets.iter().any(|a| a.status.is_drift());
        self.exit_code = i32::from(drifted || !self.errors.is_empty());
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Rewrite Modified and Missing assets from their templates.
    pub restore: bool,
    pub filter: Option<AssetTypeFilter>,
    /// Layout used to rebuild outputs on restore; empty falls back to the
    /// manifest's recorded targets.
    pub targets: Vec<TargetTool>,
}

/// Check the project's manifest without touching any file.
pub fn check_at(
    project_root: &Path,
    filter: Option<&AssetTypeFilter>,
    registry: &AdapterRegistry,
) -> Result<VerifyResult, SyncError> {
    match manifest_store::load_at(project_root)? {
        Some(manifest) => Ok(check_manifest(project_root, &manifest, filter, registry)),
        None => Ok(VerifyResult::no_manifest(project_root)),
    }
}

fn category_of(tracking: &TrackingPath, registry: &AdapterRegistry) -> AssetCategory {
    match tracking {
        TrackingPath::Plain(path) => AssetCategory::from_relative_path(path),
        TrackingPath::Tool { tool, path } => registry.get(*tool).classify(path),
    }
}

fn check_manifest(
    project_root: &Path,
    manifest: &Manifest,
    filter: Option<&AssetTypeFilter>,
    registry: &AdapterRegistry,
) -> VerifyResult {
    let mut result = VerifyResult::default();
    for (key, expected) in &manifest.checksums {
        let tracking = TrackingPath::parse(key);
        if let Some(filter) = filter {
            if !filter.includes(category_of(&tracking, registry)) {
                continue;
            }
        }

        let path = tracking.resolve(project_root);
        let (status, actual) = if !path.is_file() {
            (VerifyStatus::Missing, None)
        } else {
            match file_checksum(&path) {
                Ok(actual) if &actual == expected => (VerifyStatus::Valid, Some(actual)),
                Ok(actual) => (VerifyStatus::Modified, Some(actual)),
                Err(e) => {
                    result.errors.push(io_err(&path, e).to_string());
                    (VerifyStatus::Modified, None)
                }
            }
        };
        if status.is_drift() {
            tracing::debug!("{key}: {status:?}");
        }
        result.assets.push(VerifyAssetResult {
            tracking_path: key.clone(),
            status,
            expected_checksum: Some(expected.clone()),
            actual_checksum: actual,
        });
    }
    result.settle_exit_code();
    result
}

/// Targets to rebuild outputs with: explicit ones, else the manifest's.
/// An empty list selects the identity layout.
fn restore_targets(options: &VerifyOptions, manifest: &Manifest) -> Vec<TargetTool> {
    if !options.targets.is_empty() {
        return options.targets.clone();
    }
    manifest
        .targets
        .iter()
        .filter_map(|id| TargetTool::from_id(id))
        .collect()
}

impl SyncEngine {
    /// Classify every tracked asset, restoring drifted ones on request.
    ///
    /// Templates are fetched only when there is something to restore.
    pub fn verify(&self, project_root: &Path, options: &VerifyOptions) -> Result<VerifyResult, SyncError> {
        let Some(manifest) = manifest_store::load_at(project_root)? else {
            return Ok(VerifyResult::no_manifest(project_root));
        };
        let mut result = check_manifest(project_root, &manifest, options.filter.as_ref(), self.registry());
        tracing::info!(
            "verify: {} valid, {} modified, {} missing",
            result.valid_count(),
            result.modified_count(),
            result.missing_count()
        );
        if !options.restore || result.drift().next().is_none() {
            return Ok(result);
        }

        let (templates, _) = self.load_templates()?;
        let targets = restore_targets(options, &manifest);
        let outputs = planned_outputs(&templates, &targets, self.registry(), project_root)?;
        let mut by_key: HashMap<String, &PlannedOutput> = HashMap::new();
        for output in &outputs {
            by_key.entry(output.tracking_key()).or_insert(output);
        }

        for asset in result.assets.iter_mut().filter(|a| a.status.is_drift()) {
            let Some(output) = by_key.get(&asset.tracking_path) else {
                result
                    .errors
                    .push(format!("{}: no template to restore from", asset.tracking_path));
                continue;
            };
            let restored = write_atomic(&output.full_path, &output.content)
                .and_then(|()| file_checksum(&output.full_path).map_err(|e| io_err(&output.full_path, e)));
            match restored {
                Ok(checksum) => {
                    tracing::info!("restored {}", asset.tracking_path);
                    asset.status = VerifyStatus::Restored;
                    asset.actual_checksum = Some(checksum);
                }
                Err(err) => result.errors.push(format!("{}: {err}", asset.tracking_path)),
            }
        }
        result.settle_exit_code();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::checksum::sha256_hex;
    use std::fs;
    use tempfile::TempDir;

    fn seeded(tmp: &TempDir) -> Manifest {
        let github = tmp.path().join(".github/prompts");
        fs::create_dir_all(&github).unwrap();
        fs::write(github.join("x.md"), "B").unwrap();
        fs::write(tmp.path().join("CLAUDE.md"), "A\n").unwrap();

        let mut manifest = Manifest::create("0.1.0", None, Some(vec!["copilot".into(), "claude".into()]));
        manifest.record("prompts/x.md", sha256_hex(b"B"));
        manifest.record("claude:CLAUDE.md", sha256_hex(b"A\n"));
        manifest.record("prompts/gone.md", sha256_hex(b"G"));
        manifest_store::save_at(tmp.path(), &manifest).unwrap();
        manifest
    }

    #[test]
    fn no_manifest_is_terminal() {
        let tmp = TempDir::new().unwrap();
        let registry = AdapterRegistry::new().unwrap();
        let result = check_at(tmp.path(), None, &registry).unwrap();
        assert!(result.assets.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn classifies_valid_modified_missing() {
        let tmp = TempDir::new().unwrap();
        seeded(&tmp);
        fs::write(tmp.path().join("CLAUDE.md"), "A\nedited\n").unwrap();

        let registry = AdapterRegistry::new().unwrap();
        let result = check_at(tmp.path(), None, &registry).unwrap();
        let status = |key: &str| {
            result
                .assets
                .iter()
                .find(|a| a.tracking_path == key)
                .map(|a| a.status)
        };
        assert_eq!(status("prompts/x.md"), Some(VerifyStatus::Valid));
        assert_eq!(status("claude:CLAUDE.md"), Some(VerifyStatus::Modified));
        assert_eq!(status("prompts/gone.md"), Some(VerifyStatus::Missing));
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn filter_applies_to_tool_paths_via_adapter() {
        let tmp = TempDir::new().unwrap();
        seeded(&tmp);
        let registry = AdapterRegistry::new().unwrap();
        let only = AssetTypeFilter::only(&["instructions"]).unwrap();
        let result = check_at(tmp.path(), Some(&only), &registry).unwrap();
        let keys: Vec<&str> = result.assets.iter().map(|a| a.tracking_path.as_str()).collect();
        assert_eq!(keys, vec!["claude:CLAUDE.md"]);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn restore_layout_follows_recorded_targets() {
        let identity = Manifest::create("0.1.0", None, Some(Vec::new()));
        assert!(restore_targets(&VerifyOptions::default(), &identity).is_empty());

        let copilot = Manifest::create("0.1.0", None, Some(vec!["copilot".into()]));
        assert_eq!(
            restore_targets(&VerifyOptions::default(), &copilot),
            vec![TargetTool::Copilot]
        );

        let multi = Manifest::create("0.1.0", None, Some(vec!["copilot".into(), "cursor".into()]));
        assert_eq!(
            restore_targets(&VerifyOptions::default(), &multi),
            vec![TargetTool::Copilot, TargetTool::Cursor]
        );
    }
}
