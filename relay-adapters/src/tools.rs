//! One adapter per [`TargetTool`].
//!
//! # Path mapping
//!
//! | Tool     | Instruction                       | Prompt                     | Agent                              | Skill                         |
//! |----------|-----------------------------------|----------------------------|------------------------------------|-------------------------------|
//! | Copilot  | `.github/<path>`                  | `.github/<path>`           | `.github/<path>`                   | `.github/skills/<name>/…`     |
//! | Claude   | `CLAUDE.md`                       | `.claude/commands/<file>`  | `.claude/agents/<file>`            | `.claude/skills/<name>/…`     |
//! | Cursor   | `.cursor/rules/<stem>.mdc`        | `.cursor/commands/<file>`  | `.cursor/rules/agents/<stem>.mdc`  | `.cursor/skills/<name>/…`     |
//! | Windsurf | `.windsurf/rules/<sub>`           | `.windsurf/workflows/<file>` | `.windsurf/rules/agents/<file>`  | `.windsurf/skills/<name>/…`   |
//! | Cline    | `.clinerules/<sub>`               | `.clinerules/workflows/<file>` | `.clinerules/agents/<file>`    | `.clinerules/skills/<name>/…` |
//! | Aider    | `CONVENTIONS.md`                  | `.aider/prompts/<file>`    | `.aider/agents/<file>`             | `.aider/skills/<name>/…`      |

use std::sync::Arc;

use relay_core::{AssetCategory, TargetTool};

use crate::adapter::{
    classify_by_prefix, file_name, file_stem, instruction_stem, instruction_subpath,
    skill_subpath, AssetMetadata, OutputAdapter,
};
use crate::error::AdapterError;
use crate::preamble::{Preamble, Preambles};

// ---------------------------------------------------------------------------
// Copilot (primary)
// ---------------------------------------------------------------------------

/// The primary tool: template paths map 1:1 under `.github/`.
pub struct CopilotAdapter;

impl OutputAdapter for CopilotAdapter {
    fn tool(&self) -> TargetTool {
        TargetTool::Copilot
    }

    fn output_path(&self, category: AssetCategory, relative_path: &str) -> String {
        match category {
            AssetCategory::Skill => format!(".github/skills/{}", skill_subpath(relative_path)),
            _ => format!(".github/{relative_path}"),
        }
    }

    fn transform_content(&self, content: &str, _metadata: &AssetMetadata) -> Result<String, AdapterError> {
        Ok(self.strip_sections(content))
    }

    fn classify(&self, output_path: &str) -> AssetCategory {
        let rel = output_path.strip_prefix(".github/").unwrap_or(output_path);
        AssetCategory::from_relative_path(rel)
    }
}

// ---------------------------------------------------------------------------
// Claude
// ---------------------------------------------------------------------------

/// Every instruction file collapses into `CLAUDE.md`.
pub struct ClaudeAdapter {
    preambles: Arc<Preambles>,
}

impl ClaudeAdapter {
    pub fn new(preambles: Arc<Preambles>) -> Self {
        Self { preambles }
    }
}

impl OutputAdapter for ClaudeAdapter {
    fn tool(&self) -> TargetTool {
        TargetTool::Claude
    }

    fn output_path(&self, category: AssetCategory, relative_path: &str) -> String {
        match category {
            AssetCategory::Instruction => "CLAUDE.md".to_string(),
            AssetCategory::Prompt => format!(".claude/commands/{}", file_name(relative_path)),
            AssetCategory::Agent => format!(".claude/agents/{}", file_name(relative_path)),
            AssetCategory::Skill => format!(".claude/skills/{}", skill_subpath(relative_path)),
        }
    }

    fn transform_content(&self, content: &str, metadata: &AssetMetadata) -> Result<String, AdapterError> {
        let body = self.strip_sections(content);
        match metadata.category {
            AssetCategory::Agent => self.preambles.wrap(Preamble::ClaudeAgent, &body, metadata),
            _ => Ok(body),
        }
    }

    fn classify(&self, output_path: &str) -> AssetCategory {
        classify_by_prefix(
            output_path,
            &[
                ("CLAUDE.md", AssetCategory::Instruction),
                (".claude/commands/", AssetCategory::Prompt),
                (".claude/agents/", AssetCategory::Agent),
                (".claude/skills/", AssetCategory::Skill),
            ],
            AssetCategory::Prompt,
        )
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Rules become `.mdc` files with MDC frontmatter.
pub struct CursorAdapter {
    preambles: Arc<Preambles>,
}

impl CursorAdapter {
    pub fn new(preambles: Arc<Preambles>) -> Self {
        Self { preambles }
    }
}

impl OutputAdapter for CursorAdapter {
    fn tool(&self) -> TargetTool {
        TargetTool::Cursor
    }

    fn output_path(&self, category: AssetCategory, relative_path: &str) -> String {
        let name = file_name(relative_path);
        match category {
            AssetCategory::Instruction => format!(".cursor/rules/{}.mdc", instruction_stem(name)),
            AssetCategory::Prompt => format!(".cursor/commands/{name}"),
            AssetCategory::Agent => format!(".cursor/rules/agents/{}.mdc", file_stem(name)),
            AssetCategory::Skill => format!(".cursor/skills/{}", skill_subpath(relative_path)),
        }
    }

    fn transform_content(&self, content: &str, metadata: &AssetMetadata) -> Result<String, AdapterError> {
        let body = self.strip_sections(content);
        match metadata.category {
            AssetCategory::Instruction => {
                self.preambles
                    .wrap(Preamble::CursorRule { always_apply: true }, &body, metadata)
            }
            AssetCategory::Agent => {
                self.preambles
                    .wrap(Preamble::CursorRule { always_apply: false }, &body, metadata)
            }
            _ => Ok(body),
        }
    }

    fn classify(&self, output_path: &str) -> AssetCategory {
        classify_by_prefix(
            output_path,
            &[
                (".cursor/rules/agents/", AssetCategory::Agent),
                (".cursor/rules/", AssetCategory::Instruction),
                (".cursor/commands/", AssetCategory::Prompt),
                (".cursor/skills/", AssetCategory::Skill),
            ],
            AssetCategory::Prompt,
        )
    }
}

// ---------------------------------------------------------------------------
// Windsurf
// ---------------------------------------------------------------------------

/// Multi-file instructions keep their subfolder structure under `rules/`.
pub struct WindsurfAdapter {
    preambles: Arc<Preambles>,
}

impl WindsurfAdapter {
    pub fn new(preambles: Arc<Preambles>) -> Self {
        Self { preambles }
    }
}

impl OutputAdapter for WindsurfAdapter {
    fn tool(&self) -> TargetTool {
        TargetTool::Windsurf
    }

    fn output_path(&self, category: AssetCategory, relative_path: &str) -> String {
        match category {
            AssetCategory::Instruction => {
                format!(".windsurf/rules/{}", instruction_subpath(relative_path))
            }
            AssetCategory::Prompt => format!(".windsurf/workflows/{}", file_name(relative_path)),
            AssetCategory::Agent => format!(".windsurf/rules/agents/{}", file_name(relative_path)),
            AssetCategory::Skill => format!(".windsurf/skills/{}", skill_subpath(relative_path)),
        }
    }

    fn transform_content(&self, content: &str, metadata: &AssetMetadata) -> Result<String, AdapterError> {
        let body = self.strip_sections(content);
        match metadata.category {
            AssetCategory::Instruction => self.preambles.wrap(Preamble::WindsurfRule, &body, metadata),
            _ => Ok(body),
        }
    }

    fn classify(&self, output_path: &str) -> AssetCategory {
        classify_by_prefix(
            output_path,
            &[
                (".windsurf/rules/agents/", AssetCategory::Agent),
                (".windsurf/rules/", AssetCategory::Instruction),
                (".windsurf/workflows/", AssetCategory::Prompt),
                (".windsurf/skills/", AssetCategory::Skill),
            ],
            AssetCategory::Prompt,
        )
    }
}

// ---------------------------------------------------------------------------
// Cline
// ---------------------------------------------------------------------------

pub struct ClineAdapter;

impl OutputAdapter for ClineAdapter {
    fn tool(&self) -> TargetTool {
        TargetTool::Cline
    }

    fn output_path(&self, category: AssetCategory, relative_path: &str) -> String {
        match category {
            AssetCategory::Instruction => format!(".clinerules/{}", instruction_subpath(relative_path)),
            AssetCategory::Prompt => format!(".clinerules/workflows/{}", file_name(relative_path)),
            AssetCategory::Agent => format!(".clinerules/agents/{}", file_name(relative_path)),
            AssetCategory::Skill => format!(".clinerules/skills/{}", skill_subpath(relative_path)),
        }
    }

    fn transform_content(&self, content: &str, _metadata: &AssetMetadata) -> Result<String, AdapterError> {
        Ok(self.strip_sections(content))
    }

    fn classify(&self, output_path: &str) -> AssetCategory {
        classify_by_prefix(
            output_path,
            &[
                (".clinerules/workflows/", AssetCategory::Prompt),
                (".clinerules/agents/", AssetCategory::Agent),
                (".clinerules/skills/", AssetCategory::Skill),
                (".clinerules/", AssetCategory::Instruction),
            ],
            AssetCategory::Prompt,
        )
    }
}

// ---------------------------------------------------------------------------
// Aider
// ---------------------------------------------------------------------------

/// Every instruction file collapses into `CONVENTIONS.md`.
pub struct AiderAdapter;

impl OutputAdapter for AiderAdapter {
    fn tool(&self) -> TargetTool {
        TargetTool::Aider
    }

    fn output_path(&self, category: AssetCategory, relative_path: &str) -> String {
        match category {
            AssetCategory::Instruction => "CONVENTIONS.md".to_string(),
            AssetCategory::Prompt => format!(".aider/prompts/{}", file_name(relative_path)),
            AssetCategory::Agent => format!(".aider/agents/{}", file_name(relative_path)),
            AssetCategory::Skill => format!(".aider/skills/{}", skill_subpath(relative_path)),
        }
    }

    fn transform_content(&self, content: &str, _metadata: &AssetMetadata) -> Result<String, AdapterError> {
        Ok(self.strip_sections(content))
    }

    fn classify(&self, output_path: &str) -> AssetCategory {
        classify_by_prefix(
            output_path,
            &[
                ("CONVENTIONS.md", AssetCategory::Instruction),
                (".aider/prompts/", AssetCategory::Prompt),
                (".aider/agents/", AssetCategory::Agent),
                (".aider/skills/", AssetCategory::Skill),
            ],
            AssetCategory::Prompt,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(path: &str) -> AssetMetadata {
        AssetMetadata {
            relative_path: path.to_string(),
            category: AssetCategory::from_relative_path(path),
        }
    }

    #[test]
    fn claude_collapses_instructions() {
        let a = ClaudeAdapter::new(Arc::new(Preambles::new().unwrap()));
        assert_eq!(a.output_path(AssetCategory::Instruction, "copilot-instructions.md"), "CLAUDE.md");
        assert_eq!(a.output_path(AssetCategory::Instruction, "instructions/style.md"), "CLAUDE.md");
    }

    #[test]
    fn skills_use_second_segment_as_name() {
        let a = AiderAdapter;
        assert_eq!(
            a.output_path(AssetCategory::Skill, "skills/release/SKILL.md"),
            ".aider/skills/release/SKILL.md"
        );
    }

    #[test]
    fn copilot_strips_other_tools_only() {
        let out = CopilotAdapter
            .transform_content(
                "# T\n<!-- copilot-only -->mine<!-- /copilot-only -->\n<!-- cline-only -->theirs<!-- /cline-only -->",
                &meta("prompts/t.md"),
            )
            .unwrap();
        assert_eq!(out, "# T\nmine\n");
    }

    #[test]
    fn windsurf_wraps_instructions_only() {
        let a = WindsurfAdapter::new(Arc::new(Preambles::new().unwrap()));
        let rule = a.transform_content("# Style\nx", &meta("instructions/style.md")).unwrap();
        assert!(rule.starts_with("---\ntrigger: always_on\n"));
        let flow = a.transform_content("# Flow\nx", &meta("prompts/flow.md")).unwrap();
        assert_eq!(flow, "# Flow\nx\n");
    }

    #[test]
    fn cursor_classify_nested_prefix_first() {
        let a = CursorAdapter::new(Arc::new(Preambles::new().unwrap()));
        assert_eq!(a.classify(".cursor/rules/agents/r.mdc"), AssetCategory::Agent);
        assert_eq!(a.classify(".cursor/rules/instructions.mdc"), AssetCategory::Instruction);
    }
}
