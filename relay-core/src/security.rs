//! Manifest and path validation.
//!
//! Every violation aborts the calling operation before anything is applied.

use crate::checksum::is_sha256_hex;
use crate::error::SecurityViolation;
use crate::manifest::Manifest;
use crate::tracking::TrackingPath;

/// Upper bound on tracked assets in a single manifest.
pub const MAX_MANIFEST_ASSETS: usize = 10_000;

/// Reject oversized manifests, malformed checksums, and escaping paths.
pub fn validate_manifest(manifest: &Manifest) -> Result<(), SecurityViolation> {
    if manifest.assets.len() > MAX_MANIFEST_ASSETS {
        return Err(SecurityViolation::TooManyAssets {
            count: manifest.assets.len(),
            max: MAX_MANIFEST_ASSETS,
        });
    }
    for asset in &manifest.assets {
        validate_tracking_path(asset)?;
    }
    for (path, checksum) in &manifest.checksums {
        if !manifest.assets.iter().any(|a| a == path) {
            return Err(SecurityViolation::UntrackedChecksum { path: path.clone() });
        }
        if !is_sha256_hex(checksum) {
            return Err(SecurityViolation::MalformedChecksum {
                path: path.clone(),
                checksum: checksum.clone(),
            });
        }
    }
    Ok(())
}

/// A tracking path must stay inside its root: the primary home for plain
/// paths, the project root for `tool:` paths.
pub fn validate_tracking_path(raw: &str) -> Result<(), SecurityViolation> {
    let parsed = TrackingPath::parse(raw);
    normalize_within_root(parsed.path()).map(|_| ())
}

/// Template paths must stay inside the template tree.
pub fn validate_template_path(relative_path: &str) -> Result<String, SecurityViolation> {
    normalize_within_root(relative_path)
}

/// Resolve `.` and `..` segments; error when the result would leave the root.
pub fn normalize_within_root(path: &str) -> Result<String, SecurityViolation> {
    let unified = path.replace('\\', "/");
    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(SecurityViolation::AbsolutePath {
            path: path.to_string(),
        });
    }
    let mut stack: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.pop().is_none() {
                    return Err(SecurityViolation::PathTraversal {
                        path: path.to_string(),
                    });
                }
            }
            other => stack.push(other),
        }
    }
    if stack.is_empty() {
        return Err(SecurityViolation::PathTraversal {
            path: path.to_string(),
        });
    }
    Ok(stack.join("/"))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
