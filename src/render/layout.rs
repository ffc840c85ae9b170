//! Question layout: one question to its paragraph lines.

use super::{Layout, RenderOptions};
use crate::model::{Label, Question};

/// Bengali digits zero through nine.
const BENGALI_DIGITS: [char; 10] = ['০', '১', '২', '৩', '৪', '৫', '৬', '৭', '৮', '৯'];

/// Lines for one question, without the trailing blank separator.
///
/// Board and topic are written in square brackets so the rendered text
/// parses back into the same fields.
pub fn question_lines(q: &Question, options: &RenderOptions) -> Vec<String> {
    let mut lines = Vec::new();

    let serial = if options.bengali_serials {
        to_bengali_digits(&q.serial)
    } else {
        q.serial.clone()
    };
    match (serial.is_empty(), q.body.is_empty()) {
        (false, false) => lines.push(format!("{}. {}", serial, q.body)),
        (false, true) => lines.push(format!("{}.", serial)),
        (true, false) => lines.push(q.body.clone()),
        (true, true) => {}
    }

    // One tag line: only the line right after the serial is read back as tags
    let mut tags = Vec::new();
    if options.include_board && !q.board_institute.is_empty() {
        tags.push(format!("[{}]", q.board_institute));
    }
    if options.include_topic && !q.topic.is_empty() {
        tags.push(format!("[টপিক: {}]", q.topic));
    }
    if !tags.is_empty() {
        lines.push(tags.join(" "));
    }

    match options.layout {
        Layout::Mcq => mcq_parts(q, options, &mut lines),
        Layout::Creative => creative_parts(q, options, &mut lines),
    }

    if options.include_explanations && !q.explanation.is_empty() {
        lines.push(format!("ব্যাখ্যাঃ {}", q.explanation));
    }

    lines
}

fn mcq_parts(q: &Question, options: &RenderOptions, lines: &mut Vec<String>) {
    for (label, text) in q.options.iter() {
        if !text.is_empty() {
            lines.push(format!("{}) {}", label, text));
        }
    }
    if options.include_answers && !q.answer.is_empty() {
        lines.push(format!("উত্তরঃ {}", q.answer));
    }
}

fn creative_parts(q: &Question, options: &RenderOptions, lines: &mut Vec<String>) {
    for label in Label::ALL {
        let part = q.option(label);
        if !part.is_empty() {
            lines.push(format!("{}. {}", label, part));
        }
        let answer = q.part_answers.get(label);
        if options.include_answers && !answer.is_empty() {
            lines.push(format!("উত্তর ({}). {}", label, answer));
        }
    }
    if options.include_answers && !q.answer.is_empty() {
        lines.push(format!("উত্তরঃ {}", q.answer));
    }
}

/// Replaces ASCII digits with Bengali digits.
pub fn to_bengali_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => BENGALI_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}
