//! Line classifier.
//!
//! Each trimmed line plays exactly one structural role. Roles are tried in a
//! fixed priority order ([`RULES`]); the first rule that accepts the line wins
//! and continuation is the fallback.

use super::tags::{self, Tag};
use crate::model::Label;
use crate::variant::{AnswerStyle, SerialStyle, Variant};
use regex::Regex;
use std::sync::LazyLock;

static RE_SERIAL_BENGALI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([০-৯]+)([.,)।:])(\s*)(.*)$").unwrap());

static RE_SERIAL_WESTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)([.,)।:])(\s*)(.*)$").unwrap());

static RE_SERIAL_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([০-৯0-9]+)([.,)।:])(\s*)(.*)$").unwrap());

static RE_SERIAL_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^প্রশ্ন\s*([০-৯0-9]+)\s*([.)।:])(\s*)(.*)$").unwrap());

/// An option label at the start of the line or after whitespace.
static RE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)([কখগঘ])[.)]").unwrap());

static RE_SUB_OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(i{1,3}|I{1,3}|iv|IV)[.)]\s*(.*)$").unwrap());

static RE_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^উত্তর\s*[:ঃ]\s*(.*)$").unwrap());

static RE_PART_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^উত্তর\s*\(\s*([কখগঘ])\s*\)\s*[.:ঃ]?\s*(.*)$").unwrap());

static RE_EXPLANATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ব্যাখ্যা\s*[:ঃ]\s*(.*)$").unwrap());

/// The structural role of one line, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Starts a new question.
    Serial {
        /// Serial token.
        serial: String,
        /// Text after the separator.
        rest: String,
    },
    /// One or more labelled options.
    Options {
        /// Text before the first label (empty for anchored lines).
        lead: String,
        /// Each label with its text.
        entries: Vec<(Label, String)>,
    },
    /// `i.`, `ii.`, `iii.` statement folded into the body.
    SubOption {
        /// Roman label as written.
        label: String,
        /// Statement text.
        text: String,
    },
    /// `উত্তর: ...`
    Answer(String),
    /// `উত্তর (ক). ...`
    PartAnswer {
        /// Sub-question answered.
        label: Label,
        /// Answer text.
        text: String,
    },
    /// `ব্যাখ্যা: ...`
    Explanation(String),
    /// A line made only of metadata tags.
    Tags(Vec<Tag>),
    /// Anything else.
    Continuation(String),
}

impl Line {
    /// Rule kind that produced this line.
    pub fn kind(&self) -> LineKind {
        match self {
            Line::Serial { .. } => LineKind::Serial,
            Line::Options { .. } => LineKind::Options,
            Line::SubOption { .. } => LineKind::SubOption,
            Line::Answer(_) | Line::PartAnswer { .. } => LineKind::Answer,
            Line::Explanation(_) => LineKind::Explanation,
            Line::Tags(_) => LineKind::Tags,
            Line::Continuation(_) => LineKind::Continuation,
        }
    }
}

/// Rule identifiers, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Question start.
    Serial,
    /// Option label(s).
    Options,
    /// Roman sub-option.
    SubOption,
    /// Answer marker.
    Answer,
    /// Explanation marker.
    Explanation,
    /// Whole-line tags.
    Tags,
    /// Fallback.
    Continuation,
}

type Rule = fn(&str, &Variant) -> Option<Line>;

/// Classification rules in priority order.
pub const RULES: &[(LineKind, Rule)] = &[
    (LineKind::Serial, serial),
    (LineKind::Options, options),
    (LineKind::SubOption, sub_option),
    (LineKind::Answer, answer),
    (LineKind::Explanation, explanation),
    (LineKind::Tags, whole_line_tags),
];

/// Classifies one trimmed line.
pub fn classify(line: &str, variant: &Variant) -> Line {
    RULES
        .iter()
        .find_map(|(_, rule)| rule(line, variant))
        .unwrap_or_else(|| Line::Continuation(line.to_string()))
}

fn serial(line: &str, variant: &Variant) -> Option<Line> {
    let re: &Regex = match variant.serial_style {
        SerialStyle::BengaliDigits => &RE_SERIAL_BENGALI,
        SerialStyle::WesternDigits => &RE_SERIAL_WESTERN,
        SerialStyle::AnyDigits => &RE_SERIAL_ANY,
        SerialStyle::Keyword => &RE_SERIAL_KEYWORD,
    };
    let caps = re.captures(line)?;
    let digits = caps.get(1)?.as_str();
    let separator = caps.get(2)?.as_str();
    let gap = caps.get(3)?.as_str();
    let rest = caps.get(4)?.as_str();

    // "2.5 kg" is a number, not question 2
    if gap.is_empty() && rest.starts_with(|c: char| c.is_numeric()) {
        return None;
    }
    // "3, 4 and 5" reads as a list unless a space follows the comma
    if separator == "," && gap.is_empty() && !rest.is_empty() {
        return None;
    }

    let serial = match variant.serial_style {
        SerialStyle::Keyword => format!("প্রশ্ন {digits}"),
        _ => digits.to_string(),
    };
    Some(Line::Serial {
        serial,
        rest: rest.trim().to_string(),
    })
}

/// Splits `line` at option labels.
///
/// Accepts lines that start with a label, and lines holding two or more
/// labels after some lead text.
fn options(line: &str, _variant: &Variant) -> Option<Line> {
    let found: Vec<(usize, usize, Label)> = RE_LABEL
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let letter = caps.get(1)?;
            let label = Label::from_char(letter.as_str().chars().next()?)?;
            Some((letter.start(), whole.end(), label))
        })
        .collect();

    let anchored = found.first().is_some_and(|(start, _, _)| *start == 0);
    if !anchored && found.len() < 2 {
        return None;
    }

    let lead = found
        .first()
        .map(|(start, _, _)| line[..*start].trim().to_string())
        .unwrap_or_default();

    let entries = found
        .iter()
        .enumerate()
        .map(|(i, (_, text_start, label))| {
            let text_end = found.get(i + 1).map(|(s, _, _)| *s).unwrap_or(line.len());
            (*label, line[*text_start..text_end].trim().to_string())
        })
        .collect();

    Some(Line::Options { lead, entries })
}

fn sub_option(line: &str, variant: &Variant) -> Option<Line> {
    if !variant.sub_options {
        return None;
    }
    let caps = RE_SUB_OPTION.captures(line)?;
    Some(Line::SubOption {
        label: caps.get(1)?.as_str().to_string(),
        text: caps.get(2)?.as_str().trim().to_string(),
    })
}

fn answer(line: &str, variant: &Variant) -> Option<Line> {
    if variant.answer_style == AnswerStyle::PerPart {
        if let Some(caps) = RE_PART_ANSWER.captures(line) {
            let label = Label::from_char(caps.get(1)?.as_str().chars().next()?)?;
            return Some(Line::PartAnswer {
                label,
                text: caps.get(2)?.as_str().trim().to_string(),
            });
        }
    }
    let caps = RE_ANSWER.captures(line)?;
    Some(Line::Answer(caps.get(1)?.as_str().trim().to_string()))
}

fn explanation(line: &str, variant: &Variant) -> Option<Line> {
    if !variant.explanations {
        return None;
    }
    let caps = RE_EXPLANATION.captures(line)?;
    Some(Line::Explanation(caps.get(1)?.as_str().trim().to_string()))
}

fn whole_line_tags(line: &str, variant: &Variant) -> Option<Line> {
    tags::whole_line(line, variant.bracket_style).map(Line::Tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(line: &str) -> Line {
        classify(line, &Variant::mcq())
    }

    #[test]
    fn test_rule_order() {
        let kinds: Vec<_> = RULES.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Serial,
                LineKind::Options,
                LineKind::SubOption,
                LineKind::Answer,
                LineKind::Explanation,
                LineKind::Tags
            ]
        );
    }

    #[test]
    fn test_serial_separators() {
        for line in ["১২. প্রশ্ন", "১২) প্রশ্ন", "১২। প্রশ্ন", "১২, প্রশ্ন", "12: প্রশ্ন"] {
            match mcq(line) {
                Line::Serial { serial, rest } => {
                    assert!(serial == "১২" || serial == "12", "{line}");
                    assert_eq!(rest, "প্রশ্ন");
                }
                other => panic!("{line}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_serial_style_restricts_digits() {
        let bengali = Variant::mcq().with_serial_style(SerialStyle::BengaliDigits);
        assert_eq!(classify("3. x", &bengali).kind(), LineKind::Continuation);
        assert_eq!(classify("৩. x", &bengali).kind(), LineKind::Serial);
    }

    #[test]
    fn test_decimal_is_not_serial() {
        assert_eq!(mcq("2.5 kg ভর").kind(), LineKind::Continuation);
        assert_eq!(mcq("৩,৪ ও ৫").kind(), LineKind::Continuation);
    }

    #[test]
    fn test_keyword_serial() {
        let line = classify("প্রশ্ন ৩. নিচের উদ্দীপক পড়", &Variant::creative());
        assert_eq!(
            line,
            Line::Serial {
                serial: "প্রশ্ন ৩".into(),
                rest: "নিচের উদ্দীপক পড়".into()
            }
        );
        // digit serials are not questions in the keyword variant
        assert_eq!(
            classify("৩. কিছু", &Variant::creative()).kind(),
            LineKind::Continuation
        );
    }

    #[test]
    fn test_single_option() {
        assert_eq!(
            mcq("খ) ৯"),
            Line::Options {
                lead: String::new(),
                entries: vec![(Label::Kha, "৯".into())]
            }
        );
    }

    #[test]
    fn test_options_on_one_line() {
        assert_eq!(
            mcq("ক. ১ খ. ২ গ) ৩ ঘ) ৪"),
            Line::Options {
                lead: String::new(),
                entries: vec![
                    (Label::Ka, "১".into()),
                    (Label::Kha, "২".into()),
                    (Label::Ga, "৩".into()),
                    (Label::Gha, "৪".into()),
                ]
            }
        );
    }

    #[test]
    fn test_unanchored_options_need_two_labels() {
        match mcq("নিচের কোনটি? ক) লাল খ) নীল") {
            Line::Options { lead, entries } => {
                assert_eq!(lead, "নিচের কোনটি?");
                assert_eq!(entries.len(), 2);
            }
            other => panic!("{other:?}"),
        }
        assert_eq!(mcq("শুধু একটি ক) লেবেল").kind(), LineKind::Continuation);
    }

    #[test]
    fn test_label_inside_word_ignored() {
        // "খ." glued to a preceding letter is not a label
        assert_eq!(mcq("সখ. কিছু").kind(), LineKind::Continuation);
    }

    #[test]
    fn test_sub_option() {
        assert_eq!(
            mcq("ii. দ্বিতীয় বক্তব্য"),
            Line::SubOption {
                label: "ii".into(),
                text: "দ্বিতীয় বক্তব্য".into()
            }
        );
        assert_eq!(
            classify("ii. x", &Variant::latex_mcq()).kind(),
            LineKind::Continuation
        );
    }

    #[test]
    fn test_answers() {
        assert_eq!(mcq("উত্তর: ক"), Line::Answer("ক".into()));
        assert_eq!(mcq("উত্তরঃ ৪ মিটার"), Line::Answer("৪ মিটার".into()));
        assert_eq!(mcq("উত্তর (ক). লেখা").kind(), LineKind::Continuation);

        let creative = Variant::creative();
        assert_eq!(
            classify("উত্তর (গ). তিন", &creative),
            Line::PartAnswer {
                label: Label::Ga,
                text: "তিন".into()
            }
        );
        assert_eq!(classify("উত্তর: সব", &creative), Line::Answer("সব".into()));
    }

    #[test]
    fn test_explanation_only_when_enabled() {
        assert_eq!(
            classify("ব্যাখ্যাঃ কারণ", &Variant::latex_mcq()),
            Line::Explanation("কারণ".into())
        );
        assert_eq!(mcq("ব্যাখ্যাঃ কারণ").kind(), LineKind::Continuation);
    }

    #[test]
    fn test_tag_line_and_continuation() {
        assert_eq!(
            mcq("[ঢাকা বোর্ড]"),
            Line::Tags(vec![Tag::Board("ঢাকা বোর্ড".into())])
        );
        assert_eq!(mcq("সাধারণ লেখা"), Line::Continuation("সাধারণ লেখা".into()));
    }
}
