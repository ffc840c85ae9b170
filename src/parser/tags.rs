//! Bracket metadata tags.
//!
//! `[ঢাকা বোর্ড ২০২৩]` attributes a question to a board or institute;
//! `[টপিক: গতি]` names its topic. Pandoc's LaTeX writer escapes the brackets
//! as `{[}..{]}`.

use crate::variant::BracketStyle;
use regex::Regex;
use std::sync::LazyLock;

static RE_SQUARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]").unwrap());

static RE_PANDOC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\[\}(.*?)\{\]\}").unwrap());

static RE_TOPIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^টপিক\s*[:ঃ]\s*").unwrap());

/// A metadata tag lifted out of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// Content after the topic prefix.
    Topic(String),
    /// Board or institute attribution, kept verbatim.
    Board(String),
}

impl Tag {
    /// Classifies bracket content. Empty content yields no tag.
    pub fn from_content(content: &str) -> Option<Tag> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        match RE_TOPIC_PREFIX.find(content) {
            Some(m) => Some(Tag::Topic(content[m.end()..].trim().to_string())),
            None => Some(Tag::Board(content.to_string())),
        }
    }
}

fn pattern(style: BracketStyle) -> &'static Regex {
    match style {
        BracketStyle::Square => &RE_SQUARE,
        BracketStyle::PandocEscaped => &RE_PANDOC,
    }
}

/// Removes every tag from `line`, returning the remainder and the tags in order.
pub fn extract(line: &str, style: BracketStyle) -> (String, Vec<Tag>) {
    let re = pattern(style);
    let mut tags = Vec::new();
    let mut rest = String::with_capacity(line.len());
    let mut last = 0;

    for caps in re.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        rest.push_str(&line[last..whole.start()]);
        rest.push(' ');
        last = whole.end();
        if let Some(tag) = Tag::from_content(inner.as_str()) {
            tags.push(tag);
        }
    }
    rest.push_str(&line[last..]);

    (collapse(&rest), tags)
}

/// Removes the run of tags at the end of `line`.
///
/// Only tags separated from each other by whitespace and ending the line
/// count; brackets in the middle of the text stay where they are.
pub fn extract_trailing(line: &str, style: BracketStyle) -> (String, Vec<Tag>) {
    let re = pattern(style);
    let matches: Vec<_> = re.captures_iter(line).collect();

    let mut cut = line.trim_end().len();
    let mut taken = Vec::new();
    for caps in matches.iter().rev() {
        let Some(whole) = caps.get(0) else { continue };
        if !line[whole.end()..cut].trim().is_empty() {
            break;
        }
        cut = whole.start();
        taken.push(caps.get(1).map(|m| m.as_str()).unwrap_or_default());
    }

    let tags = taken.into_iter().rev().filter_map(Tag::from_content).collect();
    (line[..cut].trim_end().to_string(), tags)
}

/// Returns the tags if `line` consists of nothing but tags.
pub fn whole_line(line: &str, style: BracketStyle) -> Option<Vec<Tag>> {
    let (rest, tags) = extract(line, style);
    if rest.is_empty() && pattern(style).is_match(line) {
        Some(tags)
    } else {
        None
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
