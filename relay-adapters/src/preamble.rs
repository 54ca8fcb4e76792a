//! Tera-rendered frontmatter preambles.
//!
//! | Template                | Used by                                 |
//! |-------------------------|-----------------------------------------|
//! | `cursor/rule.mdc`       | Cursor instructions and agents (`.mdc`) |
//! | `windsurf/rule.md`      | Windsurf instructions                   |
//! | `claude/agent.md`       | Claude sub-agents                       |

use serde::Serialize;
use tera::{Context, Tera};

use crate::adapter::{file_stem, first_heading, has_frontmatter, AssetMetadata};
use crate::error::AdapterError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("cursor/rule.mdc", include_str!("templates/cursor_rule.mdc.tera")),
    ("windsurf/rule.md", include_str!("templates/windsurf_rule.md.tera")),
    ("claude/agent.md", include_str!("templates/claude_agent.md.tera")),
];

/// Which preamble to wrap a body in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preamble {
    CursorRule { always_apply: bool },
    WindsurfRule,
    ClaudeAgent,
}

impl Preamble {
    fn template_name(&self) -> &'static str {
        match self {
            Preamble::CursorRule { .. } => "cursor/rule.mdc",
            Preamble::WindsurfRule => "windsurf/rule.md",
            Preamble::ClaudeAgent => "claude/agent.md",
        }
    }
}

#[derive(Debug, Serialize)]
struct PreambleCtx<'a> {
    name: &'a str,
    description: String,
    globs: &'a str,
    always_apply: bool,
    body: &'a str,
}

/// Compiled preamble templates. Build once and share.
pub struct Preambles {
    tera: Tera,
}

impl Preambles {
    pub fn new() -> Result<Self, AdapterError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TPLS.iter().map(|(name, body)| (*name, *body)))?;
        Ok(Preambles { tera })
    }

    /// Wrap `body` in `preamble`. Bodies that already open with frontmatter
    /// are returned unchanged.
    pub fn wrap(
        &self,
        preamble: Preamble,
        body: &str,
        metadata: &AssetMetadata,
    ) -> Result<String, AdapterError> {
        if has_frontmatter(body) {
            return Ok(body.to_string());
        }
        let file_name = metadata.file_name();
        let always_apply = match preamble {
            Preamble::CursorRule { always_apply } => always_apply,
            _ => false,
        };
        let ctx = PreambleCtx {
            name: file_stem(file_name),
            description: first_heading(body).unwrap_or_else(|| file_name.to_string()),
            globs: "",
            always_apply,
            body: body.trim_end(),
        };
        let rendered = self
            .tera
            .render(preamble.template_name(), &Context::from_serialize(&ctx)?)?;
        let mut out = rendered.trim().to_string();
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::AssetCategory;

    fn meta(path: &str) -> AssetMetadata {
        AssetMetadata {
            relative_path: path.to_string(),
            category: AssetCategory::from_relative_path(path),
        }
    }

    #[test]
    fn preambles_compile() {
        Preambles::new().expect("embedded preamble templates must parse");
    }

    #[test]
    fn cursor_rule_uses_first_heading() {
        let p = Preambles::new().unwrap();
        let out = p
            .wrap(
                Preamble::CursorRule { always_apply: true },
                "# Team Rules: strict\n\nBe kind.\n",
                &meta("copilot-instructions.md"),
            )
            .unwrap();
        assert!(out.starts_with("---\ndescription: \"Team Rules: strict\"\nglobs:\nalwaysApply: true\n---\n"));
        assert!(out.ends_with("Be kind.\n"));
    }

    #[test]
    fn description_defaults_to_file_name() {
        let p = Preambles::new().unwrap();
        let out = p
            .wrap(Preamble::ClaudeAgent, "no heading\n", &meta("agents/reviewer.md"))
            .unwrap();
        assert!(out.contains("name: \"reviewer\"\n"));
        assert!(out.contains("description: \"reviewer.md\"\n"));
    }

    #[test]
    fn agent_name_with_yaml_syntax_stays_valid() {
        let p = Preambles::new().unwrap();
        let out = p
            .wrap(Preamble::ClaudeAgent, "body\n", &meta("agents/fix: now #1.md"))
            .unwrap();
        let front = out
            .strip_prefix("---\n")
            .and_then(|rest| rest.split("\n---\n").next())
            .unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(front).unwrap();
        assert_eq!(value["name"].as_str(), Some("fix: now #1"));
    }

    #[test]
    fn existing_frontmatter_is_not_wrapped_twice() {
        let p = Preambles::new().unwrap();
        let body = "---\nname: x\n---\n\nbody\n";
        let out = p.wrap(Preamble::WindsurfRule, body, &meta("instructions/x.md")).unwrap();
        assert_eq!(out, body);
    }
}
