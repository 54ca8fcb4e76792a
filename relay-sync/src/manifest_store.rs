//! Manifest persistence at `<project>/.github/.relay/manifest.json`.
//!
//! Writes use the atomic `.tmp` + rename pattern. Every loaded manifest is
//! passed through [`validate_manifest`] before it is returned.

use std::path::{Path, PathBuf};

use relay_core::security::validate_manifest;
use relay_core::{Manifest, TargetTool};

use crate::error::{io_err, SyncError};

/// Tracking path of the manifest file itself, relative to the primary home.
pub const MANIFEST_TRACKING_PATH: &str = ".relay/manifest.json";

/// `<project>/.github/.relay/manifest.json`
pub fn manifest_path_at(project_root: &Path) -> PathBuf {
    project_root
        .join(TargetTool::PRIMARY.home_dir())
        .join(".relay")
        .join("manifest.json")
}

/// Load the project's manifest.
///
/// Returns `Ok(None)` if no manifest has been written yet.
pub fn load_at(project_root: &Path) -> Result<Option<Manifest>, SyncError> {
    let path = manifest_path_at(project_root);
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(&path, e)),
    };
    let manifest: Manifest = serde_json::from_str(&contents)
        .map_err(|source| SyncError::ManifestParse { path, source })?;
    validate_manifest(&manifest)?;
    Ok(Some(manifest))
}

/// Replace the project's manifest atomically.
pub fn save_at(project_root: &Path, manifest: &Manifest) -> Result<PathBuf, SyncError> {
    validate_manifest(manifest)?;
    let path = manifest_path_at(project_root);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid manifest path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    tracing::debug!("manifest saved: {}", path.display());
    Ok(path)
}
