//! The [`OutputAdapter`] contract and path helpers shared by the tool adapters.

use relay_core::{AssetCategory, TargetTool, TemplateFile};

use crate::error::AdapterError;
use crate::sections::strip_tool_sections;

/// What an adapter knows about the asset it is transforming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMetadata {
    /// Template-tree path, e.g. `agents/reviewer.md`.
    pub relative_path: String,
    pub category: AssetCategory,
}

impl AssetMetadata {
    pub fn for_template(file: &TemplateFile) -> Self {
        Self {
            relative_path: file.relative_path.clone(),
            category: file.category(),
        }
    }

    pub fn file_name(&self) -> &str {
        file_name(&self.relative_path)
    }
}

/// Lays out and rewrites assets for one consumer tool. No I/O.
pub trait OutputAdapter: Send + Sync {
    fn tool(&self) -> TargetTool;

    /// Output location relative to the project root, forward-slashed.
    fn output_path(&self, category: AssetCategory, relative_path: &str) -> String;

    /// Rewrite content for this tool.
    fn transform_content(&self, content: &str, metadata: &AssetMetadata) -> Result<String, AdapterError>;

    /// Category of one of this adapter's own output paths.
    fn classify(&self, output_path: &str) -> AssetCategory;

    /// Section stripping for this tool; the first step of every transform.
    fn strip_sections(&self, content: &str) -> String {
        let ids = known_tool_ids();
        strip_tool_sections(content, self.tool().id(), ids.as_slice())
    }
}

/// Identifiers of every known tool, for section stripping.
pub fn known_tool_ids() -> Vec<&'static str> {
    TargetTool::all().iter().map(|t| t.id()).collect()
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub(crate) fn file_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

/// `x.prompt.md` → `x.prompt`.
pub(crate) fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Stem for instruction files: `copilot-instructions.md` → `instructions`,
/// `style.instructions.md` → `style`.
pub(crate) fn instruction_stem(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with("copilot-instructions.md") {
        return "instructions";
    }
    if lower.ends_with(".instructions.md") {
        return &file_name[..file_name.len() - ".instructions.md".len()];
    }
    file_stem(file_name)
}

/// Path below the first segment: `instructions/a/b.md` → `a/b.md`.
/// A single-segment path is returned unchanged; `copilot-instructions.md`
/// becomes `instructions.md`.
pub(crate) fn instruction_subpath(relative_path: &str) -> String {
    let name = file_name(relative_path);
    if name.to_ascii_lowercase().ends_with("copilot-instructions.md") {
        return "instructions.md".to_string();
    }
    match relative_path.split_once('/') {
        Some((_, rest)) if !rest.is_empty() => rest.to_string(),
        _ => relative_path.to_string(),
    }
}

/// `skills/<name>/<rest>` → `<name>/<rest>`, taking `<name>` from the second
/// segment. A file directly under `skills/` keeps its file name.
pub(crate) fn skill_subpath(relative_path: &str) -> String {
    let segments: Vec<&str> = relative_path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [_, name, rest @ ..] if !rest.is_empty() => format!("{name}/{}", rest.join("/")),
        _ => file_name(relative_path).to_string(),
    }
}

/// First matching prefix wins; order matters when prefixes nest.
pub(crate) fn classify_by_prefix(
    output_path: &str,
    table: &[(&str, AssetCategory)],
    fallback: AssetCategory,
) -> AssetCategory {
    table
        .iter()
        .find(|(prefix, _)| output_path.starts_with(prefix))
        .map(|(_, category)| *category)
        .unwrap_or(fallback)
}

/// Text of the first Markdown heading, if any.
pub(crate) fn first_heading(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim_start();
        let hashes = line.chars().take_while(|c| *c == '#').count();
        if hashes == 0 || hashes > 6 {
            return None;
        }
        let rest = &line[hashes..];
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let text = rest.trim().trim_end_matches('#').trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

/// Content already carries a YAML frontmatter block.
pub(crate) fn has_frontmatter(content: &str) -> bool {
    content.starts_with("---\n")
}
