//! Read-only compliance check for CI.
//!
//! Same drift signal as verify; only the severity differs. Default mode
//! reports drift as warnings, strict mode as errors. A missing manifest is
//! always an error.

use std::path::Path;

use serde::Serialize;

use relay_adapters::AdapterRegistry;

use crate::error::SyncError;
use crate::verify::{check_at, VerifyAssetResult, VerifyStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Default,
    /// `--strict` / `--ci`
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub mode: ValidationMode,
    pub compliant: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub drift: Vec<VerifyAssetResult>,
    pub exit_code: i32,
}

fn describe(asset: &VerifyAssetResult) -> String {
    match asset.status {
        VerifyStatus::Missing => format!("{}: missing", asset.tracking_path),
        _ => format!("{}: modified since install", asset.tracking_path),
    }
}

pub fn validate_compliance(project_root: &Path, mode: ValidationMode) -> Result<ComplianceReport, SyncError> {
    let registry = AdapterRegistry::new()?;
    let checked = check_at(project_root, None, &registry)?;

    let drift: Vec<VerifyAssetResult> = checked.drift().cloned().collect();
    let mut errors = checked.errors;
    let mut warnings = Vec::new();
    let messages = drift.iter().map(describe);
    match mode {
        ValidationMode::Default => warnings.extend(messages),
        ValidationMode::Strict => errors.extend(messages),
    }

    let compliant = errors.is_empty();
    tracing::info!(
        "compliance ({mode:?}): {} drifted, {}",
        drift.len(),
        if compliant { "compliant" } else { "not compliant" }
    );
    Ok(ComplianceReport {
        mode,
        compliant,
        errors,
        warnings,
        drift,
        exit_code: i32::from(!compliant),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_manifest_fails_in_both_modes() {
        let tmp = TempDir::new().unwrap();
        for mode in [ValidationMode::Default, ValidationMode::Strict] {
            let report = validate_compliance(tmp.path(), mode).unwrap();
            assert!(!report.compliant);
            assert_eq!(report.exit_code, 1);
            assert_eq!(report.errors.len(), 1);
        }
    }
}
