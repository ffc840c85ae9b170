//! Question record parser.
//!
//! Folds an ordered stream of lines into [`Question`] records. The parser is
//! total: every input yields a report, unrecognized text degrades to
//! continuation, and text seen before the first question is dropped.

pub mod classify;
pub mod tags;

pub use classify::{classify, Line, LineKind};
pub use tags::Tag;

use crate::cleanup::{cleanup, Cleaned};
use crate::model::{push_text, Label, Question};
use crate::variant::{TagScope, Variant};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Where continuation lines are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// Question stem.
    Body,
    /// An option's text.
    Option(Label),
    /// The MCQ answer.
    Answer,
    /// A creative sub-question's answer.
    PartAnswer(Label),
    /// The explanation.
    Explanation,
}

/// Result of parsing one line stream.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport {
    /// Questions in input order.
    pub questions: Vec<Question>,
    /// Serials seen more than once, in order of repetition.
    pub duplicate_serials: Vec<String>,
    /// Lines dropped because no question was open.
    pub orphan_lines: usize,
    /// Non-empty lines read.
    pub line_count: usize,
}

impl ParseReport {
    /// Returns true if no question was recognized.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Parses lines into questions.
///
/// ```
/// use proshno::{parse_lines, Variant};
///
/// let lines = ["১. ২ + ২ = ?", "ক) ৪", "খ) ৫", "উত্তর: ক"];
/// let report = parse_lines(lines, &Variant::mcq());
/// assert_eq!(report.questions.len(), 1);
/// assert_eq!(report.questions[0].answer, "৪");
/// ```
pub fn parse_lines<I, S>(lines: I, variant: &Variant) -> ParseReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut assembler = Assembler::new(variant);
    for line in lines {
        assembler.feed(line.as_ref());
    }
    assembler.finish()
}

/// Record assembly state machine.
///
/// Exactly one question is open at a time; a new serial line emits it and the
/// end of input flushes it.
pub struct Assembler<'a> {
    variant: &'a Variant,
    open: Option<Question>,
    attach: Attach,
    out: Vec<Question>,
    seen: HashSet<String>,
    duplicates: Vec<String>,
    orphans: usize,
    lines: usize,
    after_serial: bool,
}

impl<'a> Assembler<'a> {
    /// Creates an assembler with no open question.
    pub fn new(variant: &'a Variant) -> Self {
        Self {
            variant,
            open: None,
            attach: Attach::Body,
            out: Vec::new(),
            seen: HashSet::new(),
            duplicates: Vec::new(),
            orphans: 0,
            lines: 0,
            after_serial: false,
        }
    }

    /// Consumes one line.
    pub fn feed(&mut self, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        self.lines += 1;

        // A whole-line tag is metadata only right after the serial line in the
        // trailing-tag scope; later it is ordinary text.
        let after_serial = std::mem::take(&mut self.after_serial);
        let (text, pending) = match self.variant.tag_scope {
            TagScope::Anywhere => match tags::extract(raw, self.variant.bracket_style) {
                (text, _) if text.is_empty() => (raw.to_string(), Vec::new()),
                extracted => extracted,
            },
            TagScope::AfterSerial => (raw.to_string(), Vec::new()),
        };

        let line = match classify(&text, self.variant) {
            Line::Tags(_) if self.variant.tag_scope == TagScope::AfterSerial && !after_serial => {
                Line::Continuation(text.clone())
            }
            line => line,
        };
        debug!(kind = ?line.kind(), line = %text, "classified line");
        self.dispatch(line);
        self.apply_tags(pending);
    }

    /// Flushes the open question and returns the report.
    pub fn finish(mut self) -> ParseReport {
        self.emit();
        info!(
            questions = self.out.len(),
            duplicates = self.duplicates.len(),
            orphans = self.orphans,
            lines = self.lines,
            variant = %self.variant.name,
            "parse complete"
        );
        ParseReport {
            questions: self.out,
            duplicate_serials: self.duplicates,
            orphan_lines: self.orphans,
            line_count: self.lines,
        }
    }

    fn dispatch(&mut self, line: Line) {
        let line = match line {
            Line::Serial { serial, rest } => {
                self.open_question(serial, &rest);
                return;
            }
            other => other,
        };

        if self.open.is_none() {
            debug!(kind = ?line.kind(), "dropping line outside any question");
            self.orphans += 1;
            return;
        }

        match line {
            Line::Serial { .. } => {}
            Line::Options { lead, entries } => {
                if !lead.is_empty() {
                    self.append(self.attach, &lead);
                }
                for (label, text) in entries {
                    self.set(Attach::Option(label), &text);
                    self.attach = Attach::Option(label);
                }
            }
            Line::SubOption { label, text } => {
                let cleaned = self.clean(&text);
                self.route_images(Attach::Body, &cleaned.images);
                if let Some(q) = self.open.as_mut() {
                    push_text(&mut q.body, &format!("{label}. {}", cleaned.text));
                }
                self.attach = Attach::Body;
            }
            Line::Answer(text) => {
                self.set(Attach::Answer, &text);
                if self.variant.multiline_answers {
                    self.attach = Attach::Answer;
                }
            }
            Line::PartAnswer { label, text } => {
                self.set(Attach::PartAnswer(label), &text);
                self.attach = Attach::PartAnswer(label);
            }
            Line::Explanation(text) => {
                self.set(Attach::Explanation, &text);
                self.attach = Attach::Explanation;
            }
            Line::Tags(tags) => self.apply_tags(tags),
            Line::Continuation(text) => self.append(self.attach, &text),
        }
    }

    fn open_question(&mut self, serial: String, rest: &str) {
        self.emit();

        if !self.seen.insert(serial.clone()) {
            warn!(serial = %serial, "duplicate serial");
            self.duplicates.push(serial.clone());
        }

        self.open = Some(Question::new(serial));
        self.attach = Attach::Body;
        self.after_serial = true;

        let (rest, trailing) = match self.variant.tag_scope {
            TagScope::AfterSerial => tags::extract_trailing(rest, self.variant.bracket_style),
            TagScope::Anywhere => (rest.to_string(), Vec::new()),
        };
        self.append(Attach::Body, &rest);
        self.apply_tags(trailing);
    }

    fn emit(&mut self) {
        if let Some(q) = self.open.take() {
            let options = q.options.iter().filter(|(_, t)| !t.is_empty()).count();
            debug!(serial = %q.serial, options, "emitted question");
            self.out.push(q);
        }
    }

    fn clean(&self, text: &str) -> Cleaned {
        cleanup(text, &self.variant.cleanup)
    }

    /// Replaces the text at `target`.
    fn set(&mut self, target: Attach, text: &str) {
        let cleaned = self.clean(text);
        self.route_images(target, &cleaned.images);

        let value = match target {
            Attach::Answer => self.dereference(cleaned.text),
            _ => cleaned.text,
        };
        if let Some(slot) = self.slot(target) {
            *slot = value;
        }
    }

    /// Appends continuation text at `target`.
    fn append(&mut self, target: Attach, text: &str) {
        let cleaned = self.clean(text);
        self.route_images(target, &cleaned.images);
        if let Some(slot) = self.slot(target) {
            push_text(slot, &cleaned.text);
        }
    }

    /// An answer that is exactly one label of a filled option becomes that option's text.
    fn dereference(&self, answer: String) -> String {
        let (Some(label), Some(q)) = (Label::parse(&answer), self.open.as_ref()) else {
            return answer;
        };
        let option = q.option(label);
        if option.is_empty() {
            warn!(serial = %q.serial, label = %label, "answer names an empty option");
            answer
        } else {
            option.to_string()
        }
    }

    fn slot(&mut self, target: Attach) -> Option<&mut String> {
        let q = self.open.as_mut()?;
        Some(match target {
            Attach::Body => &mut q.body,
            Attach::Option(l) => q.options.get_mut(l),
            Attach::Answer => &mut q.answer,
            Attach::PartAnswer(l) => q.part_answers.get_mut(l),
            Attach::Explanation => &mut q.explanation,
        })
    }

    fn route_images(&mut self, target: Attach, images: &[String]) {
        let (Some(key), Some(q)) = (images.last(), self.open.as_mut()) else {
            return;
        };
        let slot = match target {
            Attach::Body | Attach::Answer | Attach::PartAnswer(_) => &mut q.question_image,
            Attach::Option(l) => q.option_images.get_mut(l),
            Attach::Explanation => &mut q.explanation_image,
        };
        *slot = key.clone();
    }

    fn apply_tags(&mut self, tags: Vec<Tag>) {
        let Some(q) = self.open.as_mut() else {
            return;
        };
        for tag in tags {
            match tag {
                Tag::Topic(text) => q.topic = cleanup(&text, &self.variant.cleanup).text,
                Tag::Board(text) => q.board_institute = cleanup(&text, &self.variant.cleanup).text,
            }
        }
    }
}
