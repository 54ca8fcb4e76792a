//! Template → output expansion shared by sync, preview, diff, and restore.

use std::path::{Path, PathBuf};

use relay_adapters::{AdapterRegistry, AssetMetadata};
use relay_core::security::{normalize_within_root, validate_template_path};
use relay_core::{AssetCategory, TargetTool, TemplateFile, TrackingPath};

use crate::error::SyncError;

/// One physical file a sync would write.
#[derive(Debug, Clone)]
pub(crate) struct PlannedOutput {
    /// Normalized template path this output came from.
    pub template_path: String,
    pub category: AssetCategory,
    pub tracking: TrackingPath,
    pub full_path: PathBuf,
    pub content: String,
}

impl PlannedOutput {
    pub fn tracking_key(&self) -> String {
        self.tracking.to_string()
    }
}

/// Expand every template into its outputs.
///
/// All template paths are validated first, so a traversal anywhere in the
/// set fails the call before the caller touches disk. An empty `targets`
/// slice selects the identity layout: `.github/<relativePath>` with the
/// content left as-is.
pub(crate) fn planned_outputs(
    templates: &[TemplateFile],
    targets: &[TargetTool],
    registry: &AdapterRegistry,
    project_root: &Path,
) -> Result<Vec<PlannedOutput>, SyncError> {
    let normalized = templates
        .iter()
        .map(|t| validate_template_path(&t.relative_path).map(|rel| TemplateFile::new(rel, t.content.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = Vec::new();
    for template in &normalized {
        outputs_for(template, targets, registry, project_root, &mut out)?;
    }
    Ok(out)
}

fn outputs_for(
    template: &TemplateFile,
    targets: &[TargetTool],
    registry: &AdapterRegistry,
    project_root: &Path,
    out: &mut Vec<PlannedOutput>,
) -> Result<(), SyncError> {
    let category = template.category();

    if targets.is_empty() {
        let tracking = TrackingPath::Plain(template.relative_path.clone());
        out.push(PlannedOutput {
            template_path: template.relative_path.clone(),
            category,
            full_path: tracking.resolve(project_root),
            tracking,
            content: template.content.clone(),
        });
        return Ok(());
    }

    let meta = AssetMetadata::for_template(template);
    for adapter in registry.resolve(targets) {
        let rel = normalize_within_root(&adapter.output_path(category, &template.relative_path))?;
        let tracking = TrackingPath::for_output(adapter.tool(), &rel);
        let content = adapter.transform_content(&template.content, &meta)?;
        out.push(PlannedOutput {
            template_path: template.relative_path.clone(),
            category,
            full_path: tracking.resolve(project_root),
            tracking,
            content,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::SecurityViolation;

    fn registry() -> AdapterRegistry {
        AdapterRegistry::new().unwrap()
    }

    #[test]
    fn identity_layout_keeps_content() {
        let templates = vec![TemplateFile::new("prompts/x.md", "<!-- claude-only -->c<!-- /claude-only -->")];
        let outs = planned_outputs(&templates, &[], &registry(), Path::new("/p")).unwrap();
        assert_eq!(outs.len(), 1);
        assert_eq!(outs[0].tracking_key(), "prompts/x.md");
        assert_eq!(outs[0].full_path, PathBuf::from("/p/.github/prompts/x.md"));
        assert_eq!(outs[0].content, templates[0].content);
    }

    #[test]
    fn one_output_per_target() {
        let templates = vec![TemplateFile::new("copilot-instructions.md", "# Rules\n")];
        let outs = planned_outputs(
            &templates,
            &[TargetTool::Copilot, TargetTool::Claude],
            &registry(),
            Path::new("/p"),
        )
        .unwrap();
        let keys: Vec<String> = outs.iter().map(|o| o.tracking_key()).collect();
        assert_eq!(keys, vec!["copilot-instructions.md", "claude:CLAUDE.md"]);
        assert_eq!(outs[1].full_path, PathBuf::from("/p/CLAUDE.md"));
    }

    #[test]
    fn traversal_anywhere_fails_the_whole_plan() {
        let templates = vec![
            TemplateFile::new("prompts/ok.md", "fine"),
            TemplateFile::new("prompts/../../../evil.md", "bad"),
        ];
        let err = planned_outputs(&templates, &[], &registry(), Path::new("/p")).unwrap_err();
        assert!(matches!(
            err,
            SyncError::Security(SecurityViolation::PathTraversal { .. })
        ));
    }
}
