use relay_adapters::{strip_tool_sections, AdapterRegistry, AssetMetadata};
use relay_core::{AssetCategory, TargetTool, TemplateFile};
use rstest::rstest;

#[rstest]
#[case(TargetTool::Copilot, "copilot-instructions.md", ".github/copilot-instructions.md")]
#[case(TargetTool::Copilot, "prompts/x.md", ".github/prompts/x.md")]
#[case(TargetTool::Copilot, "skills/lint/SKILL.md", ".github/skills/lint/SKILL.md")]
#[case(TargetTool::Claude, "copilot-instructions.md", "CLAUDE.md")]
#[case(TargetTool::Claude, "prompts/x.md", ".claude/commands/x.md")]
#[case(TargetTool::Claude, "agents/reviewer.md", ".claude/agents/reviewer.md")]
#[case(TargetTool::Claude, "skills/lint/SKILL.md", ".claude/skills/lint/SKILL.md")]
#[case(TargetTool::Cursor, "copilot-instructions.md", ".cursor/rules/instructions.mdc")]
#[case(TargetTool::Cursor, "instructions/style.instructions.md", ".cursor/rules/style.mdc")]
#[case(TargetTool::Cursor, "agents/reviewer.md", ".cursor/rules/agents/reviewer.mdc")]
#[case(TargetTool::Windsurf, "instructions/backend/api.md", ".windsurf/rules/backend/api.md")]
#[case(TargetTool::Windsurf, "copilot-instructions.md", ".windsurf/rules/instructions.md")]
#[case(TargetTool::Windsurf, "prompts/x.md", ".windsurf/workflows/x.md")]
#[case(TargetTool::Cline, "instructions/backend/api.md", ".clinerules/backend/api.md")]
#[case(TargetTool::Cline, "agents/a.md", ".clinerules/agents/a.md")]
#[case(TargetTool::Aider, "copilot-instructions.md", "CONVENTIONS.md")]
#[case(TargetTool::Aider, "skills/release/SKILL.md", ".aider/skills/release/SKILL.md")]
fn output_path_table(#[case] tool: TargetTool, #[case] template: &str, #[case] expected: &str) {
    let registry = AdapterRegistry::new().expect("registry");
    let category = AssetCategory::from_relative_path(template);
    assert_eq!(registry.get(tool).output_path(category, template), expected);
}

#[test]
fn classify_inverts_output_path_for_every_tool() {
    let registry = AdapterRegistry::new().expect("registry");
    let templates = [
        "copilot-instructions.md",
        "prompts/x.md",
        "agents/reviewer.md",
        "skills/lint/SKILL.md",
    ];
    for tool in TargetTool::all() {
        let adapter = registry.get(*tool);
        for template in templates {
            let category = AssetCategory::from_relative_path(template);
            let out = adapter.output_path(category, template);
            assert_eq!(
                adapter.classify(&out),
                category,
                "{tool} classified {out} wrongly"
            );
        }
    }
}

#[test]
fn every_transform_ends_with_single_newline_and_no_markers() {
    let registry = AdapterRegistry::new().expect("registry");
    let content = "# Title\n\n<!-- claude-only -->C<!-- /claude-only -->\n\n\n\
                   <!-- cursor-only -->U<!-- /cursor-only -->\nshared\n\n";
    for category_path in ["copilot-instructions.md", "prompts/p.md", "agents/a.md"] {
        let file = TemplateFile::new(category_path, content);
        let meta = AssetMetadata::for_template(&file);
        for tool in TargetTool::all() {
            let out = registry
                .get(*tool)
                .transform_content(&file.content, &meta)
                .unwrap_or_else(|e| panic!("{tool}: {e}"));
            assert!(out.ends_with('\n') && !out.ends_with("\n\n"), "{tool}: {out:?}");
            assert!(!out.contains("-only -->"), "{tool} left a marker: {out:?}");
            assert!(out.contains("shared"));
            assert_eq!(out.contains('C'), *tool == TargetTool::Claude, "{tool}: {out:?}");
            assert_eq!(out.contains('U'), *tool == TargetTool::Cursor, "{tool}: {out:?}");
        }
    }
}

#[test]
fn cursor_frontmatter_is_valid_yaml() {
    let registry = AdapterRegistry::new().expect("registry");
    let file = TemplateFile::new("copilot-instructions.md", "# Rules: \"quoted\"\nbody\n");
    let out = registry
        .get(TargetTool::Cursor)
        .transform_content(&file.content, &AssetMetadata::for_template(&file))
        .expect("transform");
    let front = out
        .strip_prefix("---\n")
        .and_then(|rest| rest.split_once("\n---\n"))
        .map(|(yaml, _)| yaml)
        .expect("frontmatter block");
    let value: serde_yaml::Value = serde_yaml::from_str(front).expect("valid yaml");
    assert_eq!(value["description"].as_str(), Some("Rules: \"quoted\""));
    assert_eq!(value["alwaysApply"].as_bool(), Some(true));
}

#[test]
fn section_stripping_is_deterministic() {
    let input = "<!-- a-only -->X<!-- /a-only --><!-- b-only -->Y<!-- /b-only -->";
    let first = strip_tool_sections(input, "b", &["a", "b"]);
    let second = strip_tool_sections(&first, "b", &["a", "b"]);
    assert_eq!(first, "Y\n");
    assert_eq!(second, first);
}
