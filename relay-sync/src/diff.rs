//! Unified diffs of what `relay sync --force` would write.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use similar::TextDiff;

use crate::engine::{SyncEngine, SyncOptions};
use crate::error::{io_err, SyncError};

/// A single output whose on-disk content differs from the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub tracking_path: String,
    pub path: PathBuf,
    pub unified_diff: String,
}

impl SyncEngine {
    /// Compare every planned output with the file on disk.
    ///
    /// Missing files diff against empty content. No files are written.
    pub fn diff(&self, project_root: &Path, options: &SyncOptions) -> Result<Vec<FileDiff>, SyncError> {
        let (outputs, _) = self.plan(project_root, &options.targets)?;
        let mut seen = HashSet::new();
        let mut diffs = Vec::new();

        for output in outputs {
            if let Some(filter) = &options.filter {
                if !filter.includes(output.category) {
                    continue;
                }
            }
            if !seen.insert(output.full_path.clone()) {
                continue;
            }
            let existing = read_existing_or_empty(&output.full_path)?;
            if existing == output.content {
                continue;
            }

            let relative = output.tracking.project_relative();
            let old_header = format!("a/{relative}");
            let new_header = format!("b/{relative}");
            let unified = TextDiff::from_lines(&existing, &output.content)
                .unified_diff()
                .header(&old_header, &new_header)
                .context_radius(3)
                .to_string();

            diffs.push(FileDiff {
                tracking_path: output.tracking_key(),
                path: output.full_path,
                unified_diff: unified,
            });
        }
        Ok(diffs)
    }
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}
