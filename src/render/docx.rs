//! DOCX rendering.

use super::layout::question_lines;
use super::RenderOptions;
use crate::error::{Error, Result};
use crate::model::Question;
use docx_rs::{Docx, Paragraph, Run, RunFonts};
use std::io::{Cursor, Seek, Write};

/// Renders questions into a Word document, one paragraph per line.
pub fn write_docx<W: Write + Seek>(
    questions: &[Question],
    options: &RenderOptions,
    writer: W,
) -> Result<()> {
    let mut docx = Docx::new();

    for q in questions {
        for line in question_lines(q, options) {
            docx = docx.add_paragraph(paragraph(&line, options));
        }
        if options.paragraph_spacing {
            docx = docx.add_paragraph(Paragraph::new());
        }
    }

    docx.build()
        .pack(writer)
        .map_err(|e| Error::Render(e.to_string()))
}

/// Renders questions into DOCX bytes.
pub fn render_docx(questions: &[Question], options: &RenderOptions) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_docx(questions, options, &mut cursor)?;
    Ok(cursor.into_inner())
}

fn paragraph(text: &str, options: &RenderOptions) -> Paragraph {
    let mut run = Run::new().add_text(text);
    if let Some(font) = &options.font {
        run = run.fonts(
            RunFonts::new()
                .ascii(font)
                .hi_ansi(font)
                .cs(font),
        );
    }
    if let Some(points) = options.font_size {
        // Half-points
        run = run.size(points * 2);
    }
    Paragraph::new().add_run(run)
}
