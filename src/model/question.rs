//! Question records and their fixed four-slot label set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the four option labels: ক, খ, গ, ঘ.
///
/// Creative questions reuse the same labels for their four sub-questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    /// ক
    Ka,
    /// খ
    Kha,
    /// গ
    Ga,
    /// ঘ
    Gha,
}

impl Label {
    /// All labels in slot order.
    pub const ALL: [Label; 4] = [Label::Ka, Label::Kha, Label::Ga, Label::Gha];

    /// Slot index (0-3).
    pub fn index(self) -> usize {
        match self {
            Label::Ka => 0,
            Label::Kha => 1,
            Label::Ga => 2,
            Label::Gha => 3,
        }
    }

    /// Label for a slot index.
    pub fn from_index(index: usize) -> Option<Label> {
        Self::ALL.get(index).copied()
    }

    /// The Bengali letter for this label.
    pub fn as_char(self) -> char {
        match self {
            Label::Ka => 'ক',
            Label::Kha => 'খ',
            Label::Ga => 'গ',
            Label::Gha => 'ঘ',
        }
    }

    /// Maps a Bengali letter to its label.
    pub fn from_char(c: char) -> Option<Label> {
        match c {
            'ক' => Some(Label::Ka),
            'খ' => Some(Label::Kha),
            'গ' => Some(Label::Ga),
            'ঘ' => Some(Label::Gha),
            _ => None,
        }
    }

    /// Parses text that consists of exactly one label.
    ///
    /// Surrounding whitespace, one pair of parentheses and a trailing `.` or `)`
    /// are tolerated, so `"ক"`, `"(ক)"` and `"ক)"` all resolve to [`Label::Ka`].
    pub fn parse(text: &str) -> Option<Label> {
        let mut s = text.trim();
        if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            s = inner.trim();
        }
        let s = s.trim_end_matches(['.', ')']).trim();

        let mut chars = s.chars();
        let first = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(first)
    }

    /// 1-based position, used for creative-question column names.
    pub fn number(self) -> usize {
        self.index() + 1
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Fixed four-slot storage addressed by [`Label`].
///
/// Every slot always exists; unset text slots are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots<T>([T; 4]);

impl<T> Slots<T> {
    /// Creates slots from an array in label order.
    pub fn new(values: [T; 4]) -> Self {
        Self(values)
    }

    /// Returns the slot for a label.
    pub fn get(&self, label: Label) -> &T {
        &self.0[label.index()]
    }

    /// Returns the mutable slot for a label.
    pub fn get_mut(&mut self, label: Label) -> &mut T {
        &mut self.0[label.index()]
    }

    /// Replaces the slot for a label.
    pub fn set(&mut self, label: Label, value: T) {
        self.0[label.index()] = value;
    }

    /// Iterates `(label, value)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &T)> {
        Label::ALL.into_iter().zip(self.0.iter())
    }
}

impl Slots<String> {
    /// Returns true if every slot is empty.
    pub fn all_empty(&self) -> bool {
        self.0.iter().all(|s| s.is_empty())
    }

    /// Appends continuation text to a slot.
    pub fn append(&mut self, label: Label, text: &str) {
        push_text(self.get_mut(label), text);
    }
}

impl<T> Index<Label> for Slots<T> {
    type Output = T;

    fn index(&self, label: Label) -> &T {
        self.get(label)
    }
}

impl<T> IndexMut<Label> for Slots<T> {
    fn index_mut(&mut self, label: Label) -> &mut T {
        self.get_mut(label)
    }
}

/// A parsed question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Serial token ("১২", "12" or "প্রশ্ন ৩").
    pub serial: String,
    /// Question stem or creative-question passage.
    pub body: String,
    /// Option texts (sub-questions for creative questions).
    pub options: Slots<String>,
    /// MCQ answer, resolved to option text when it names a filled option.
    pub answer: String,
    /// Creative-question answers, one per sub-question.
    pub part_answers: Slots<String>,
    /// Board or institute attribution.
    pub board_institute: String,
    /// Topic tag.
    pub topic: String,
    /// Explanation text.
    pub explanation: String,
    /// Image key attached to the stem.
    pub question_image: String,
    /// Image key attached to the explanation.
    pub explanation_image: String,
    /// Image keys attached to options.
    pub option_images: Slots<String>,
}

impl Question {
    /// Creates an empty question with the given serial.
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            ..Default::default()
        }
    }

    /// Returns the text of an option.
    pub fn option(&self, label: Label) -> &str {
        self.options.get(label)
    }

    /// Returns true if at least one option has text.
    pub fn has_options(&self) -> bool {
        !self.options.all_empty()
    }
}

/// Appends `text` to `target`, joined by a single space.
pub(crate) fn push_text(target: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}
