//! # proshno
//!
//! Parses Bengali question documents (MCQ and creative questions) into
//! fixed-shape question records, and writes those records to tables or
//! renders them back into documents.
//!
//! ## Supported Inputs
//!
//! - **DOCX**: Word documents (ZIP + WordprocessingML), including Office math
//!   and embedded pictures
//! - **LaTeX**: pandoc-style exports (`{[}..{]}` tags, `\includegraphics`)
//! - **Plain text**: one paragraph per line
//!
//! ## Quick Start
//!
//! ```no_run
//! use proshno::{parse_file, Schema, Variant};
//!
//! fn main() -> proshno::Result<()> {
//!     let variant = Variant::mcq();
//!     let report = parse_file("questions.docx", &variant)?;
//!
//!     let table = Schema::for_kind(variant.schema).to_table(&report.questions);
//!     println!("{} questions, {} columns", table.len(), table.headers().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `docx` (default): DOCX line source
//! - `async`: Async I/O support with Tokio

pub mod cleanup;
pub mod detect;
pub mod equation;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod source;
pub mod store;
pub mod variant;

#[cfg(feature = "async")]
pub mod async_api;

// Re-exports
pub use cleanup::{cleanup, CleanupOptions};
pub use detect::{detect_format, detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use model::{Label, Question, Resource, Schema, SchemaKind, Selection, SheetRow};
pub use parser::{parse_lines, ParseReport};
pub use render::{ImageMap, Layout, RenderOptions};
pub use source::SourceDocument;
pub use store::{CsvStore, Table, TabularStore};
pub use variant::Variant;

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads a document into lines (and media, if requested).
pub fn read_source(path: impl AsRef<Path>, with_media: bool) -> Result<SourceDocument> {
    SourceDocument::read_file(path, with_media)
}

/// Parses a document file into questions.
///
/// The format is detected from the content; a `.tex` extension selects
/// LaTeX handling for text files.
///
/// # Example
///
/// ```no_run
/// use proshno::{parse_file, Variant};
///
/// let report = parse_file("mcq.docx", &Variant::mcq())?;
/// for q in &report.questions {
///     println!("{}: {}", q.serial, q.body);
/// }
/// # Ok::<(), proshno::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>, variant: &Variant) -> Result<ParseReport> {
    let source = read_source(path, false)?;
    Ok(parse_lines(&source.lines, variant))
}

/// Parses a document from bytes.
pub fn parse_bytes(data: &[u8], variant: &Variant) -> Result<ParseReport> {
    let source = SourceDocument::read_bytes(data.to_vec(), false)?;
    Ok(parse_lines(&source.lines, variant))
}

/// Parses text already in memory (plain text, or LaTeX when `format` says so).
pub fn parse_text(text: &str, format: FormatType, variant: &Variant) -> ParseReport {
    let source = SourceDocument::from_text(text, format);
    parse_lines(&source.lines, variant)
}

/// Parses several files in parallel. Results keep the input order.
pub fn parse_files<P>(paths: &[P], variant: &Variant) -> Vec<(PathBuf, Result<ParseReport>)>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|p| {
            let path = p.as_ref().to_path_buf();
            let result = parse_file(&path, variant);
            (path, result)
        })
        .collect()
}

/// Reads questions back from a tabular store.
///
/// With a selection, only rows checked in that column are returned.
pub fn questions_from_store<S: TabularStore + ?Sized>(
    store: &S,
    schema: &Schema,
    selection: Option<Selection>,
) -> Result<Vec<Question>> {
    let table = store.read_table()?;
    let rows = schema.read_table(&table)?;
    Ok(render::select_questions(&rows, selection))
}

/// Builder for parsing a document and writing its questions.
///
/// # Example
///
/// ```no_run
/// use proshno::{Proshno, Variant};
///
/// let bank = Proshno::new()
///     .with_variant(Variant::latex_mcq())
///     .with_images(true)
///     .with_image_prefix("https://cdn.example.com/q")
///     .parse("export.tex")?;
/// bank.write_csv("questions.csv")?;
/// # Ok::<(), proshno::Error>(())
/// ```
pub struct Proshno {
    variant: Variant,
    render_options: Option<RenderOptions>,
    extract_images: bool,
    image_prefix: Option<String>,
    image_formula: bool,
}

impl Default for Proshno {
    fn default() -> Self {
        Self::new()
    }
}

impl Proshno {
    /// Creates a builder with the MCQ variant.
    pub fn new() -> Self {
        Self {
            variant: Variant::mcq(),
            render_options: None,
            extract_images: false,
            image_prefix: None,
            image_formula: false,
        }
    }

    /// Sets the parser variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets render options (defaults follow the variant's schema).
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = Some(options);
        self
    }

    /// Reads embedded media along with the text.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Resolves image keys to `prefix/<file name>` in image columns.
    /// Without a prefix, media read from the document become data URIs.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = Some(prefix.into());
        self
    }

    /// Writes image columns as `=IMAGE("..")` formulas.
    pub fn with_image_formula(mut self) -> Self {
        self.image_formula = true;
        self
    }

    /// Parses a document from a file path.
    pub fn parse(self, path: impl AsRef<Path>) -> Result<ParsedBank> {
        let source = read_source(path, self.extract_images)?;
        Ok(self.finish(source))
    }

    /// Parses a document from bytes.
    pub fn parse_bytes(self, data: Vec<u8>) -> Result<ParsedBank> {
        let source = SourceDocument::read_bytes(data, self.extract_images)?;
        Ok(self.finish(source))
    }

    fn finish(self, source: SourceDocument) -> ParsedBank {
        let report = parse_lines(&source.lines, &self.variant);

        let images = match &self.image_prefix {
            Some(prefix) => ImageMap::with_prefix(&source.resources, prefix),
            None => ImageMap::from_resources(&source.resources),
        }
        .with_image_formula(self.image_formula);

        let render_options = self
            .render_options
            .unwrap_or_else(|| RenderOptions::for_kind(self.variant.schema));

        info!(
            questions = report.questions.len(),
            resources = source.resources.len(),
            variant = %self.variant.name,
            "parsed document"
        );

        ParsedBank {
            schema: Schema::for_kind(self.variant.schema),
            report,
            resources: source.resources,
            images,
            render_options,
        }
    }
}

/// Questions parsed from one document, ready to be written.
pub struct ParsedBank {
    schema: Schema,
    report: ParseReport,
    resources: Vec<Resource>,
    images: ImageMap,
    render_options: RenderOptions,
}

impl ParsedBank {
    /// Parsed questions in document order.
    pub fn questions(&self) -> &[Question] {
        &self.report.questions
    }

    /// The full parse report (duplicates, orphan lines, line count).
    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    /// Media read from the document.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Column layout used for tables.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Builds the table, image keys resolved through the image map.
    pub fn to_table(&self) -> Table {
        self.schema
            .to_table_with(&self.report.questions, |key| self.images.resolve(key))
    }

    /// Serializes the questions as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.report.questions)
            .map_err(|e| Error::InvalidData(e.to_string()))
    }

    /// Renders the questions as text.
    pub fn to_text(&self) -> String {
        render::render_text(&self.report.questions, &self.render_options)
    }

    /// Replaces the contents of `store` with the question table.
    pub fn write_table<S: TabularStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.write_table(&self.to_table())
    }

    /// Writes the question table to a CSV file.
    pub fn write_csv(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.write_table(&mut CsvStore::new(path))
    }

    /// Writes the question table as CSV to any writer.
    pub fn write_csv_to<W: std::io::Write>(&self, writer: W) -> Result<()> {
        store::write_csv(&self.to_table(), writer)
    }

    /// Renders the questions into a Word document.
    pub fn write_docx(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        render::write_docx(&self.report.questions, &self.render_options, file)
    }

    /// Renders the questions to a `.docx` or text file.
    pub fn write_document(&self, path: impl AsRef<Path>) -> Result<()> {
        render::render_to_file(&self.report.questions, path, &self.render_options)
    }

    /// Writes media into `dir`; image columns then point at the written files.
    pub fn extract_images(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let map = ImageMap::extract_to_dir(&self.resources, dir)?;
        let count = map.len();
        self.images = map.with_image_formula(self.images.uses_formula());
        Ok(count)
    }

    /// Consumes self and returns the parse report.
    pub fn into_report(self) -> ParseReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "১. বেগের একক কী? [ঢাকা বোর্ড ২০২৩]\nক) m/s খ) m\nগ) s ঘ) kg\nউত্তর: ক\n২. $x^2$ এর মান\nক) ৪\n";

    #[test]
    fn test_parse_bytes_plain_text() {
        let report = parse_bytes(SAMPLE.as_bytes(), &Variant::mcq()).unwrap();
        assert_eq!(report.questions.len(), 2);
        assert_eq!(report.questions[0].answer, "m/s");
        assert_eq!(report.questions[1].body, "x² এর মান");
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let report = parse_bytes(&[], &Variant::mcq()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.line_count, 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        std::fs::write(&path, b"").unwrap();
        assert!(parse_file(&path, &Variant::mcq()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_bytes_rejects_legacy_doc() {
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00, 0x00];
        assert!(matches!(
            parse_bytes(&data, &Variant::mcq()),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_files_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, SAMPLE).unwrap();
        std::fs::write(&b, "১. একটি\n").unwrap();
        let missing = dir.path().join("missing.txt");

        let results = parse_files(&[&a, &b, &missing], &Variant::mcq());
        assert_eq!(results[0].0, a);
        assert_eq!(results[0].1.as_ref().unwrap().questions.len(), 2);
        assert_eq!(results[1].1.as_ref().unwrap().questions.len(), 1);
        assert!(results[2].1.is_err());
    }

    #[test]
    fn test_builder_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("bank.csv");

        let bank = Proshno::new().parse_bytes(SAMPLE.as_bytes().to_vec()).unwrap();
        bank.write_csv(&csv).unwrap();

        let questions = questions_from_store(&CsvStore::new(&csv), bank.schema(), None).unwrap();
        assert_eq!(questions, bank.questions());
    }

    #[test]
    fn test_builder_json_and_text() {
        let bank = Proshno::new().parse_bytes(SAMPLE.as_bytes().to_vec()).unwrap();
        let json = bank.to_json().unwrap();
        assert!(json.contains("\"serial\": \"১\""));
        assert!(bank.to_text().starts_with("১. বেগের একক কী?\n[ঢাকা বোর্ড ২০২৩]\n"));
    }

    #[cfg(feature = "docx")]
    #[test]
    fn test_builder_resolves_images() {
        let data = source::docx::fixture::build_docx(
            &["১. চিত্রটি দেখ \\includegraphics{media/image1.png}", "ক) এক"],
            &[("image1.png", &b"png"[..])],
        );
        let bank = Proshno::new()
            .with_variant(Variant::latex_mcq())
            .with_images(true)
            .with_image_prefix("https://cdn/q")
            .with_image_formula()
            .parse_bytes(data)
            .unwrap();

        assert_eq!(bank.resources().len(), 1);
        assert_eq!(bank.questions()[0].question_image, "media/image1.png");
        let table = bank.to_table();
        assert_eq!(
            table.cell(0, "QuestionIMG"),
            "=IMAGE(\"https://cdn/q/image1.png\")"
        );
    }

    #[test]
    fn test_questions_from_store_selection() {
        let table = Table::from_values(vec![
            vec!["Serial".into(), "For Lecture sheet".into(), "Question".into()],
            vec!["1".into(), "yes".into(), "এক".into()],
            vec!["2".into(), "no".into(), "দুই".into()],
        ]);
        let store = store::MemoryStore::new(table);
        let questions =
            questions_from_store(&store, &Schema::extended(), Some(Selection::LectureSheet))
                .unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].body, "এক");
    }
}
