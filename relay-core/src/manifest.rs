//! The install manifest: what a sync wrote and the checksum of each asset.
//!
//! Pure data. Persistence lives in `relay-sync::manifest_store`; shape checks
//! live in [`crate::security`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{SourceDescriptor, TargetTool};

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub schema_version: u32,
    pub installed_at: DateTime<Utc>,
    pub tool_version: String,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub source: SourceDescriptor,
    #[serde(default)]
    pub assets: Vec<String>,
    /// Tracking path → SHA-256 hex.
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
}

impl Manifest {
    /// Seed an empty manifest at the current schema version.
    ///
    /// `source` defaults to bundled, `targets` to the primary tool.
    pub fn create(
        tool_version: impl Into<String>,
        source: Option<SourceDescriptor>,
        targets: Option<Vec<String>>,
    ) -> Self {
        Manifest {
            schema_version: SCHEMA_VERSION,
            installed_at: Utc::now(),
            tool_version: tool_version.into(),
            targets: targets.unwrap_or_else(|| vec![TargetTool::PRIMARY.id().to_string()]),
            source: source.unwrap_or_default(),
            assets: Vec::new(),
            checksums: BTreeMap::new(),
        }
    }

    /// Track an asset. Re-recording a path replaces its checksum.
    pub fn record(&mut self, tracking_path: impl Into<String>, checksum: impl Into<String>) {
        let tracking_path = tracking_path.into();
        if !self.assets.contains(&tracking_path) {
            self.assets.push(tracking_path.clone());
        }
        self.checksums.insert(tracking_path, checksum.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_seeds_schema_and_defaults() {
        let m = Manifest::create("1.2.3", None, None);
        assert_eq!(m.schema_version, SCHEMA_VERSION);
        assert_eq!(m.targets, vec!["copilot".to_string()]);
        assert_eq!(m.source, SourceDescriptor::bundled());
        assert!(m.assets.is_empty());
    }

    #[test]
    fn serializes_camel_case_fields() {
        let mut m = Manifest::create("0.1.0", Some(SourceDescriptor::remote("o/r", "dev")), None);
        m.record("prompts/x.md", "a".repeat(64));
        let json = serde_json::to_value(&m).unwrap();
        for key in ["schemaVersion", "installedAt", "toolVersion", "targets", "source", "assets", "checksums"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["source"]["type"], "remote");
    }

    #[test]
    fn record_does_not_duplicate_assets() {
        let mut m = Manifest::create("0.1.0", None, None);
        m.record("a.md", "1".repeat(64));
        m.record("a.md", "2".repeat(64));
        assert_eq!(m.assets.len(), 1);
        assert_eq!(m.checksums["a.md"], "2".repeat(64));
    }
}
