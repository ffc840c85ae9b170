//! LaTeX export line source.
//!
//! Pandoc-style exports wrap the question stream in a preamble and list
//! environments. Those structural lines are dropped; everything else is
//! passed through for the cleanup pipeline to strip.

use regex::Regex;
use std::sync::LazyLock;

static RE_STRUCTURAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\\(?:begin|end)\{[^}]*\}(?:\[[^\]]*\])?\s*$|^\\(?:documentclass|usepackage|tightlist|maketitle|title|author|date)\b",
    )
    .unwrap()
});

static RE_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\\item\s*(?:\[([^\]]*)\])?\s*").unwrap());

/// Splits a LaTeX export into content lines.
pub fn lines(text: &str) -> Vec<String> {
    text.lines().filter_map(content_line).collect()
}

/// Returns the content of one line, or `None` for structural lines.
fn content_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('%') || RE_STRUCTURAL.is_match(line) {
        return None;
    }
    // A custom item label is content: `\item[(খ)] দুই` keeps `(খ)`
    let line = RE_ITEM.replace(line, "$1 ");
    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}
