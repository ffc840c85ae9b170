//! Parser variants.
//!
//! A [`Variant`] describes one family of question documents: how serials are
//! written, which bracket spelling carries metadata tags, where tags may
//! appear, and how answers are laid out. One parser is driven by it instead of
//! keeping a copy of the parser per document family.

use crate::cleanup::CleanupOptions;
use crate::error::{Error, Result};
use crate::model::SchemaKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How question-start lines are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerialStyle {
    /// Bengali digits (০-৯) followed by a separator.
    BengaliDigits,
    /// Western digits (0-9) followed by a separator.
    WesternDigits,
    /// Either digit set followed by a separator.
    #[default]
    AnyDigits,
    /// `প্রশ্ন` + digits + `.` or `)`; the serial becomes `প্রশ্ন <n>`.
    Keyword,
}

/// Bracket spelling of metadata tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BracketStyle {
    /// `[ঢাকা বোর্ড ২০২৩]` as typed in Word.
    #[default]
    Square,
    /// `{[}ঢাকা বোর্ড ২০২৩{]}` as emitted by pandoc's LaTeX writer.
    PandocEscaped,
}

/// Where metadata tags are honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagScope {
    /// Trailing tags on the question-start line and whole-line tag lines.
    #[default]
    AfterSerial,
    /// Tags are excised from any line while a question is open.
    Anywhere,
}

/// How answer lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerStyle {
    /// `উত্তর: <text>`, one answer per question.
    #[default]
    Plain,
    /// `উত্তর (ক). <text>`, one answer per sub-question; plain answers still accepted.
    PerPart,
}

/// Parser configuration for one family of question documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    /// Display name.
    pub name: String,
    /// Question-start spelling.
    pub serial_style: SerialStyle,
    /// Tag bracket spelling.
    pub bracket_style: BracketStyle,
    /// Where tags are honored.
    pub tag_scope: TagScope,
    /// Answer layout.
    pub answer_style: AnswerStyle,
    /// Recognize `i.`, `ii.`, `iii.` lines and fold them into the body.
    pub sub_options: bool,
    /// Continuation lines after an answer extend the answer.
    pub multiline_answers: bool,
    /// Recognize `ব্যাখ্যা:` lines.
    pub explanations: bool,
    /// Output column layout.
    pub schema: SchemaKind,
    /// Text cleanup applied to every stored fragment.
    pub cleanup: CleanupOptions,
}

impl Default for Variant {
    fn default() -> Self {
        Self::mcq()
    }
}

impl Variant {
    /// Names accepted by [`Variant::by_name`].
    pub const PRESETS: [&'static str; 3] = ["mcq", "creative", "latex"];

    /// Word documents of multiple-choice questions.
    pub fn mcq() -> Self {
        Self {
            name: "mcq".to_string(),
            serial_style: SerialStyle::AnyDigits,
            bracket_style: BracketStyle::Square,
            tag_scope: TagScope::AfterSerial,
            answer_style: AnswerStyle::Plain,
            sub_options: true,
            multiline_answers: false,
            explanations: false,
            schema: SchemaKind::Mcq,
            cleanup: CleanupOptions::default(),
        }
    }

    /// Word documents of creative (passage + four sub-question) questions.
    pub fn creative() -> Self {
        Self {
            name: "creative".to_string(),
            serial_style: SerialStyle::Keyword,
            answer_style: AnswerStyle::PerPart,
            multiline_answers: true,
            schema: SchemaKind::Creative,
            ..Self::mcq()
        }
    }

    /// Pandoc LaTeX exports of multiple-choice questions with explanations.
    pub fn latex_mcq() -> Self {
        Self {
            name: "latex".to_string(),
            bracket_style: BracketStyle::PandocEscaped,
            tag_scope: TagScope::Anywhere,
            sub_options: false,
            explanations: true,
            schema: SchemaKind::Extended,
            ..Self::mcq()
        }
    }

    /// Looks up a preset by name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mcq" | "docx" => Ok(Self::mcq()),
            "creative" | "cq" => Ok(Self::creative()),
            "latex" | "latex-mcq" | "tex" => Ok(Self::latex_mcq()),
            other => Err(Error::Config(format!(
                "unknown variant '{}', expected one of {}",
                other,
                Self::PRESETS.join(", ")
            ))),
        }
    }

    /// Parses a variant from TOML.
    ///
    /// A `base` key picks the preset the remaining keys override.
    ///
    /// ```
    /// use proshno::Variant;
    ///
    /// let v = Variant::from_toml_str("base = \"creative\"\nexplanations = true").unwrap();
    /// assert!(v.explanations);
    /// assert!(v.multiline_answers);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(source)?;

        let base = match table.remove("base") {
            Some(toml::Value::String(name)) => Self::by_name(&name)?,
            Some(other) => {
                return Err(Error::Config(format!("'base' must be a string, got {}", other)))
            }
            None => Self::default(),
        };

        let mut merged = match toml::Value::try_from(&base) {
            Ok(toml::Value::Table(t)) => t,
            Ok(_) => return Err(Error::Config("variant did not serialize to a table".into())),
            Err(e) => return Err(Error::Config(e.to_string())),
        };
        for (key, value) in table {
            match (merged.get_mut(&key), value) {
                (Some(toml::Value::Table(existing)), toml::Value::Table(overrides)) => {
                    existing.extend(overrides);
                }
                (_, value) => {
                    merged.insert(key, value);
                }
            }
        }

        Ok(toml::Value::Table(merged).try_into()?)
    }

    /// Loads a variant from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the serial style.
    pub fn with_serial_style(mut self, style: SerialStyle) -> Self {
        self.serial_style = style;
        self
    }

    /// Sets the tag bracket style.
    pub fn with_bracket_style(mut self, style: BracketStyle) -> Self {
        self.bracket_style = style;
        self
    }

    /// Sets the tag scope.
    pub fn with_tag_scope(mut self, scope: TagScope) -> Self {
        self.tag_scope = scope;
        self
    }

    /// Enables or disables explanation lines.
    pub fn with_explanations(mut self, enabled: bool) -> Self {
        self.explanations = enabled;
        self
    }

    /// Enables or disables multi-line answers.
    pub fn with_multiline_answers(mut self, enabled: bool) -> Self {
        self.multiline_answers = enabled;
        self
    }

    /// Replaces the cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let mcq = Variant::mcq();
        assert_eq!(mcq.answer_style, AnswerStyle::Plain);
        assert!(!mcq.multiline_answers);

        let creative = Variant::creative();
        assert_eq!(creative.serial_style, SerialStyle::Keyword);
        assert_eq!(creative.schema, SchemaKind::Creative);

        let latex = Variant::latex_mcq();
        assert_eq!(latex.bracket_style, BracketStyle::PandocEscaped);
        assert_eq!(latex.tag_scope, TagScope::Anywhere);
        assert!(latex.explanations);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Variant::by_name("LaTeX").unwrap().name, "latex");
        assert!(matches!(Variant::by_name("slides"), Err(Error::Config(_))));
    }

    #[test]
    fn test_toml_overrides() {
        let source = r#"
            base = "mcq"
            name = "board-book"
            serial_style = "bengali-digits"

            [cleanup]
            convert_math = false
        "#;
        let v = Variant::from_toml_str(source).unwrap();
        assert_eq!(v.name, "board-book");
        assert_eq!(v.serial_style, SerialStyle::BengaliDigits);
        assert!(!v.cleanup.convert_math);
        assert!(v.cleanup.strip_markup);
    }

    #[test]
    fn test_toml_without_base() {
        let v = Variant::from_toml_str("tag_scope = \"anywhere\"").unwrap();
        assert_eq!(v.tag_scope, TagScope::Anywhere);
        assert_eq!(v.schema, SchemaKind::Mcq);
    }

    #[test]
    fn test_toml_bad_value() {
        let err = Variant::from_toml_str("serial_style = \"roman\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("variant.toml");
        std::fs::write(&path, "base = \"latex\"\nsub_options = true\n").unwrap();
        let v = Variant::load(&path).unwrap();
        assert!(v.sub_options);
        assert!(v.explanations);
    }
}
