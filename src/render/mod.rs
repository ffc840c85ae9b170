//! Rendering of question records into documents.
//!
//! Records become paragraph lines through a fixed layout; the lines are
//! written as plain text or as a `.docx` document. Rows read back from a
//! table can be filtered by a selection column first.

mod docx;
mod images;
mod layout;
mod options;
mod text;

pub use self::docx::{render_docx, write_docx};
pub use images::ImageMap;
pub use layout::{question_lines, to_bengali_digits};
pub use options::{Layout, RenderOptions};
pub use text::render_text;

use crate::error::Result;
use crate::model::{Question, Selection, SheetRow};
use std::io::Write;
use std::path::Path;

/// Output kind chosen from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Word document (`.docx`)
    Docx,
    /// Plain text (anything else)
    Text,
}

impl OutputKind {
    /// `.docx` (any case) selects DOCX; everything else is text.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_docx = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
        if is_docx {
            OutputKind::Docx
        } else {
            OutputKind::Text
        }
    }
}

/// Questions of the rows checked for `selection`, or of all rows when `None`.
pub fn select_questions(rows: &[SheetRow], selection: Option<Selection>) -> Vec<Question> {
    rows.iter()
        .filter(|row| selection.map_or(true, |s| row.is_selected(s)))
        .map(|row| row.question.clone())
        .collect()
}

/// Renders questions to a file; the extension picks DOCX or text.
pub fn render_to_file(
    questions: &[Question],
    path: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<()> {
    let path = path.as_ref();
    match OutputKind::from_path(path) {
        OutputKind::Docx => {
            let file = std::fs::File::create(path)?;
            write_docx(questions, options, file)
        }
        OutputKind::Text => {
            std::fs::write(path, render_text(questions, options))?;
            Ok(())
        }
    }
}

/// Renders questions as text to a writer.
pub fn render_to_writer<W: Write>(
    questions: &[Question],
    writer: &mut W,
    options: &RenderOptions,
) -> Result<()> {
    writer.write_all(render_text(questions, options).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(serial: &str, selected: Vec<Selection>) -> SheetRow {
        SheetRow {
            question: Question::new(serial),
            selected,
        }
    }

    #[test]
    fn test_select_questions() {
        let rows = vec![
            row("১", vec![Selection::ClassSlide, Selection::QuizDaily]),
            row("২", vec![Selection::LectureSheet]),
            row("৩", vec![]),
        ];

        let all = select_questions(&rows, None);
        assert_eq!(all.len(), 3);

        let slides = select_questions(&rows, Some(Selection::ClassSlide));
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].serial, "১");

        assert!(select_questions(&rows, Some(Selection::QuizWeekly)).is_empty());
    }

    #[test]
    fn test_output_kind() {
        assert_eq!(OutputKind::from_path("out.DOCX"), OutputKind::Docx);
        assert_eq!(OutputKind::from_path("out.txt"), OutputKind::Text);
        assert_eq!(OutputKind::from_path("out"), OutputKind::Text);
    }

    #[test]
    fn test_render_to_file_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut q = Question::new("১");
        q.body = "প্রশ্ন".into();
        render_to_file(&[q], &path, &RenderOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "১. প্রশ্ন\n\n");
    }

    #[test]
    fn test_render_to_file_docx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        render_to_file(&[Question::new("১")], &path, &RenderOptions::default()).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[..2], b"PK");
    }
}
