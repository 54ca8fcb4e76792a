//! Domain types shared by every relay crate.
//!
//! Template paths are always `String`s with forward slashes: they name a
//! location inside the conceptual template tree, not a filesystem path.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// TemplateFile
// ---------------------------------------------------------------------------

/// One file produced by a template source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFile {
    /// Forward-slash path relative to the root of the template tree.
    pub relative_path: String,
    pub content: String,
}

impl TemplateFile {
    /// Build a template, normalising `\` separators and any leading `./` or `/`.
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: normalize_relative(&relative_path.into()),
            content: content.into(),
        }
    }

    /// Category derived from the path by folder / filename convention.
    pub fn category(&self) -> AssetCategory {
        AssetCategory::from_relative_path(&self.relative_path)
    }

    /// Final path segment, e.g. `x.md` for `prompts/x.md`.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

fn normalize_relative(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut trimmed = path.as_str();
    loop {
        if let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            trimmed = rest;
        } else {
            break;
        }
    }
    trimmed.to_string()
}

// ---------------------------------------------------------------------------
// AssetCategory
// ---------------------------------------------------------------------------

/// The kind of asset a template represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Instruction,
    Prompt,
    Agent,
    Skill,
}

impl AssetCategory {
    /// All categories in a stable order.
    pub fn all() -> &'static [AssetCategory] {
        &[
            AssetCategory::Instruction,
            AssetCategory::Prompt,
            AssetCategory::Agent,
            AssetCategory::Skill,
        ]
    }

    /// Derive the category of a template path.
    ///
    /// A `copilot-instructions.md` file name wins; otherwise the first
    /// directory segment named `instructions`, `prompts`, `agents` or
    /// `skills` decides. Anything else is a prompt.
    pub fn from_relative_path(path: &str) -> Self {
        let path = path.replace('\\', "/");
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some(file_name) = segments.pop() else {
            return AssetCategory::Prompt;
        };
        if file_name.to_ascii_lowercase().ends_with("copilot-instructions.md") {
            return AssetCategory::Instruction;
        }
        for dir in segments {
            match dir.to_ascii_lowercase().as_str() {
                "instructions" => return AssetCategory::Instruction,
                "prompts" => return AssetCategory::Prompt,
                "agents" => return AssetCategory::Agent,
                "skills" => return AssetCategory::Skill,
                _ => {}
            }
        }
        AssetCategory::Prompt
    }

    /// Plural name used on the command line and in messages.
    pub fn plural(&self) -> &'static str {
        match self {
            AssetCategory::Instruction => "instructions",
            AssetCategory::Prompt => "prompts",
            AssetCategory::Agent => "agents",
            AssetCategory::Skill => "skills",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

impl FromStr for AssetCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instruction" | "instructions" => Ok(AssetCategory::Instruction),
            "prompt" | "prompts" => Ok(AssetCategory::Prompt),
            "agent" | "agents" => Ok(AssetCategory::Agent),
            "skill" | "skills" => Ok(AssetCategory::Skill),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AssetTypeFilter
// ---------------------------------------------------------------------------

/// A non-empty set of included asset categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTypeFilter {
    included: BTreeSet<AssetCategory>,
}

impl AssetTypeFilter {
    /// Include exactly the named categories.
    pub fn only<S: AsRef<str>>(names: &[S]) -> Result<Self, CoreError> {
        let included = names
            .iter()
            .map(|n| n.as_ref().parse::<AssetCategory>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Self::from_set(included)
    }

    /// Include every category except the named ones.
    ///
    /// Excluding all four categories is an error.
    pub fn exclude<S: AsRef<str>>(names: &[S]) -> Result<Self, CoreError> {
        let excluded = names
            .iter()
            .map(|n| n.as_ref().parse::<AssetCategory>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        let included = AssetCategory::all()
            .iter()
            .copied()
            .filter(|c| !excluded.contains(c))
            .collect();
        Self::from_set(included)
    }

    fn from_set(included: BTreeSet<AssetCategory>) -> Result<Self, CoreError> {
        if included.is_empty() {
            return Err(CoreError::EmptyFilter);
        }
        Ok(Self { included })
    }

    pub fn includes(&self, category: AssetCategory) -> bool {
        self.included.contains(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = AssetCategory> + '_ {
        self.included.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// TargetTool
// ---------------------------------------------------------------------------

/// Consumer applications relay can lay assets out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetTool {
    Copilot,
    Claude,
    Cursor,
    Windsurf,
    Cline,
    Aider,
}

impl TargetTool {
    /// The tool whose home directory roots plain tracking paths.
    pub const PRIMARY: TargetTool = TargetTool::Copilot;

    /// All tools in a stable order.
    pub fn all() -> &'static [TargetTool] {
        &[
            TargetTool::Copilot,
            TargetTool::Claude,
            TargetTool::Cursor,
            TargetTool::Windsurf,
            TargetTool::Cline,
            TargetTool::Aider,
        ]
    }

    /// Lowercase identifier used in markers, tracking paths and config.
    pub fn id(&self) -> &'static str {
        match self {
            TargetTool::Copilot => "copilot",
            TargetTool::Claude => "claude",
            TargetTool::Cursor => "cursor",
            TargetTool::Windsurf => "windsurf",
            TargetTool::Cline => "cline",
            TargetTool::Aider => "aider",
        }
    }

    /// The tool's home directory, relative to the project root.
    pub fn home_dir(&self) -> &'static str {
        match self {
            TargetTool::Copilot => ".github",
            TargetTool::Claude => ".claude",
            TargetTool::Cursor => ".cursor",
            TargetTool::Windsurf => ".windsurf",
            TargetTool::Cline => ".clinerules",
            TargetTool::Aider => ".aider",
        }
    }

    /// Case-insensitive lookup that returns `None` for unknown identifiers.
    pub fn from_id(id: &str) -> Option<TargetTool> {
        let id = id.trim();
        TargetTool::all()
            .iter()
            .copied()
            .find(|t| t.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for TargetTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TargetTool {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetTool::from_id(s).ok_or_else(|| CoreError::UnknownTool(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Source descriptor
// ---------------------------------------------------------------------------

/// Where a template set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Bundled,
    Remote,
}

/// Serialized as `{ "type": "remote", "repo": "owner/repo", "branch": "main" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceDescriptor {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl SourceDescriptor {
    pub fn bundled() -> Self {
        Self::default()
    }

    pub fn remote(repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Remote,
            repo: Some(repo.into()),
            branch: Some(branch.into()),
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.repo, &self.branch) {
            (SourceKind::Remote, Some(repo), Some(branch)) => write!(f, "{repo}@{branch}"),
            (SourceKind::Remote, Some(repo), None) => write!(f, "{repo}"),
            _ => f.write_str("bundled"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
