//! Manifest tracking paths.
//!
//! A tracking path is either plain (`prompts/x.md`, rooted at the primary
//! tool's home directory) or multi-target (`claude:CLAUDE.md`, rooted at the
//! project root). Only a known tool identifier before the first `:` makes a
//! path multi-target; `notes:todo.md` is a plain path.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::TargetTool;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackingPath {
    Plain(String),
    Tool { tool: TargetTool, path: String },
}

impl TrackingPath {
    pub fn parse(raw: &str) -> Self {
        if let Some((prefix, rest)) = raw.split_once(':') {
            if let Some(tool) = TargetTool::from_id(prefix) {
                return TrackingPath::Tool {
                    tool,
                    path: rest.to_string(),
                };
            }
        }
        TrackingPath::Plain(raw.to_string())
    }

    /// Tracking path for an adapter output given relative to the project root.
    ///
    /// Outputs inside the primary home collapse to plain paths.
    pub fn for_output(tool: TargetTool, project_relative: &str) -> Self {
        let home = format!("{}/", TargetTool::PRIMARY.home_dir());
        match project_relative.strip_prefix(&home) {
            Some(rest) => TrackingPath::Plain(rest.to_string()),
            None => TrackingPath::Tool {
                tool,
                path: project_relative.to_string(),
            },
        }
    }

    /// The path component without any tool prefix.
    pub fn path(&self) -> &str {
        match self {
            TrackingPath::Plain(p) => p,
            TrackingPath::Tool { path, .. } => path,
        }
    }

    /// Path relative to the project root.
    pub fn project_relative(&self) -> String {
        match self {
            TrackingPath::Plain(p) => format!("{}/{}", TargetTool::PRIMARY.home_dir(), p),
            TrackingPath::Tool { path, .. } => path.clone(),
        }
    }

    /// Filesystem location under `project_root`.
    pub fn resolve(&self, project_root: &Path) -> PathBuf {
        match self {
            TrackingPath::Plain(p) => join_slashed(&project_root.join(TargetTool::PRIMARY.home_dir()), p),
            TrackingPath::Tool { path, .. } => join_slashed(project_root, path),
        }
    }
}

impl fmt::Display for TrackingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingPath::Plain(p) => f.write_str(p),
            TrackingPath::Tool { tool, path } => write!(f, "{}:{}", tool.id(), path),
        }
    }
}

fn join_slashed(base: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |acc, seg| acc.join(seg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tool_prefix_case_insensitively() {
        assert_eq!(
            TrackingPath::parse("Claude:CLAUDE.md"),
            TrackingPath::Tool {
                tool: TargetTool::Claude,
                path: "CLAUDE.md".to_string()
            }
        );
    }

    #[test]
    fn unknown_prefix_stays_plain() {
        assert_eq!(
            TrackingPath::parse("notes:todo.md"),
            TrackingPath::Plain("notes:todo.md".to_string())
        );
    }

    #[test]
    fn resolve_plain_and_tool_paths() {
        let root = Path::new("/proj");
        assert_eq!(
            TrackingPath::parse("prompts/x.md").resolve(root),
            PathBuf::from("/proj/.github/prompts/x.md")
        );
        assert_eq!(
            TrackingPath::parse("claude:.claude/agents/a.md").resolve(root),
            PathBuf::from("/proj/.claude/agents/a.md")
        );
    }

    #[test]
    fn outputs_under_primary_home_are_plain() {
        let t = TrackingPath::for_output(TargetTool::Copilot, ".github/prompts/x.md");
        assert_eq!(t.to_string(), "prompts/x.md");
        let t = TrackingPath::for_output(TargetTool::Claude, "CLAUDE.md");
        assert_eq!(t.to_string(), "claude:CLAUDE.md");
        assert_eq!(t.project_relative(), "CLAUDE.md");
    }
}
