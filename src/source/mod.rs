//! Document line sources.
//!
//! A source turns a file into the ordered, trimmed, non-empty lines the
//! parser consumes, plus any media the file embeds.

#[cfg(feature = "docx")]
pub mod docx;
pub mod latex;

use crate::cleanup::normalize_string;
use crate::detect::{detect_format_from_bytes, FormatType};
use crate::error::Result;
use crate::model::Resource;
use std::path::Path;
use tracing::debug;

/// Lines and media read from one input file.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Detected input format.
    pub format: FormatType,
    /// Normalized, non-empty lines in reading order.
    pub lines: Vec<String>,
    /// Embedded media (DOCX only).
    pub resources: Vec<Resource>,
}

impl SourceDocument {
    /// Reads a file, detecting its format.
    ///
    /// A `.tex` extension forces LaTeX handling for text input.
    pub fn read_file(path: impl AsRef<Path>, with_media: bool) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut format = detect_format_from_bytes(&data)?;

        let is_tex = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tex"));
        if is_tex && format == FormatType::PlainText {
            format = FormatType::Latex;
        }

        Self::decode(format, data, with_media)
    }

    /// Reads a document from bytes, detecting its format.
    pub fn read_bytes(data: Vec<u8>, with_media: bool) -> Result<Self> {
        let format = detect_format_from_bytes(&data)?;
        Self::decode(format, data, with_media)
    }

    /// Builds a source from text already in memory.
    pub fn from_text(text: &str, format: FormatType) -> Self {
        let raw = match format {
            FormatType::Latex => latex::lines(text),
            _ => text.lines().map(str::to_string).collect(),
        };
        Self {
            format,
            lines: normalize_lines(raw),
            resources: Vec::new(),
        }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn decode(format: FormatType, data: Vec<u8>, with_media: bool) -> Result<Self> {
        let source = match format {
            #[cfg(feature = "docx")]
            FormatType::Docx => {
                let content = docx::DocxReader::from_bytes(data)?.read(with_media)?;
                Self {
                    format,
                    lines: normalize_lines(content.lines),
                    resources: content.resources,
                }
            }
            #[cfg(not(feature = "docx"))]
            FormatType::Docx => {
                let _ = with_media;
                return Err(crate::error::Error::UnsupportedFormat(
                    "DOCX support requires the 'docx' feature".into(),
                ));
            }
            FormatType::Latex | FormatType::PlainText => {
                let text = String::from_utf8(data)?;
                let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
                Self::from_text(text, format)
            }
        };

        debug!(
            format = %source.format,
            lines = source.lines.len(),
            resources = source.resources.len(),
            "read source"
        );
        Ok(source)
    }
}

/// Normalizes raw lines: NFC, control characters removed, trimmed, empty lines dropped.
pub fn normalize_lines<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|line| normalize_string(line.as_ref()).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lines() {
        let lines = normalize_lines(["  ১. প্রশ্ন\u{00A0} ", "", "\u{200B}", "ক)\tএক"]);
        assert_eq!(lines, vec!["১. প্রশ্ন", "ক) এক"]);
    }

    #[test]
    fn test_plain_text_bytes() {
        let data = "\u{FEFF}১. প্রশ্ন\r\n\r\nক) এক\n".as_bytes().to_vec();
        let source = SourceDocument::read_bytes(data, false).unwrap();
        assert_eq!(source.format, FormatType::PlainText);
        assert_eq!(source.lines, vec!["১. প্রশ্ন", "ক) এক"]);
    }

    #[test]
    fn test_latex_bytes() {
        let data = "\\begin{enumerate}\n\\item ১. প্রশ্ন\n\\end{enumerate}"
            .as_bytes()
            .to_vec();
        let source = SourceDocument::read_bytes(data, false).unwrap();
        assert_eq!(source.format, FormatType::Latex);
        assert_eq!(source.lines, vec!["১. প্রশ্ন"]);
    }

    #[cfg(feature = "docx")]
    #[test]
    fn test_docx_bytes() {
        let data = docx::fixture::build_docx(&["১. প্রশ্ন", "  ", "ক) এক"], &[]);
        let source = SourceDocument::read_bytes(data, true).unwrap();
        assert_eq!(source.format, FormatType::Docx);
        assert_eq!(source.lines, vec!["১. প্রশ্ন", "ক) এক"]);
    }

    #[test]
    fn test_blank_text_has_no_lines() {
        let source = SourceDocument::from_text("\n  \n", FormatType::PlainText);
        assert_eq!(source.line_count(), 0);
    }

    #[test]
    fn test_tex_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.tex");
        std::fs::write(&path, "\\item ১. প্রশ্ন").unwrap();
        let source = SourceDocument::read_file(&path, false).unwrap();
        assert_eq!(source.format, FormatType::Latex);
        assert_eq!(source.lines, vec!["১. প্রশ্ন"]);
    }
}
