//! Tool-specific section stripping.
//!
//! Templates may fence content for a single tool:
//!
//! ```text
//! <!-- claude-only -->
//! Only Claude sees this.
//! <!-- /claude-only -->
//! ```
//!
//! Marker matching is case-insensitive and tolerant of extra whitespace
//! inside the comment.

use std::sync::LazyLock;

use regex::Regex;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("invalid newline regex"));

fn marker(tool: &str, closing: bool) -> Regex {
    let slash = if closing { "/" } else { "" };
    Regex::new(&format!(r"(?i)<!--\s*{slash}{}-only\s*-->", regex::escape(tool)))
        .expect("escaped marker regex is always valid")
}

/// Keep `keep`'s sections, drop every other known tool's sections.
///
/// 1. For each other tool, remove the first start/end marker pair and
///    everything between, repeating until no complete pair remains. An
///    unterminated start marker is left as-is.
/// 2. Remove the markers (not the content) of the kept tool.
/// 3. Collapse runs of three or more newlines to two.
/// 4. Trim and end with exactly one newline.
pub fn strip_tool_sections<S: AsRef<str>>(content: &str, keep: &str, known_tools: &[S]) -> String {
    let mut text = content.replace("\r\n", "\n");

    for tool in known_tools.iter().map(AsRef::as_ref) {
        if tool.eq_ignore_ascii_case(keep) {
            continue;
        }
        let start = marker(tool, false);
        let end = marker(tool, true);
        loop {
            let Some(open) = start.find(&text) else {
                break;
            };
            let Some(close) = end.find(&text[open.end()..]) else {
                break;
            };
            let span = open.start()..open.end() + close.end();
            text.replace_range(span, "");
        }
    }

    let text = marker(keep, false).replace_all(&text, "");
    let text = marker(keep, true).replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");

    let mut out = text.trim().to_string();
    out.push('\n');
    out
}
