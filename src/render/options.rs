//! Rendering options for question documents.

use crate::model::{SchemaKind, Selection};

/// Paragraph layout for one question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// `serial. stem`, tags, `ক) option` lines, `উত্তরঃ answer`.
    #[default]
    Mcq,
    /// `serial. passage`, tags, then `ক. question` / `উত্তর (ক). answer` per part.
    Creative,
}

impl Layout {
    /// Layout matching a schema preset.
    pub fn for_kind(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Creative => Layout::Creative,
            SchemaKind::Mcq | SchemaKind::Extended => Layout::Mcq,
        }
    }
}

/// Options for text and DOCX rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Question layout.
    pub layout: Layout,

    /// Only rows checked in this selection column are rendered
    /// (applies when rendering rows read back from a table).
    pub selection: Option<Selection>,

    /// Whether to write the board/institute line.
    pub include_board: bool,

    /// Whether to write the topic line.
    pub include_topic: bool,

    /// Whether to write answer lines.
    pub include_answers: bool,

    /// Whether to write the explanation line.
    pub include_explanations: bool,

    /// Writes serials with Bengali digits (`12` becomes `১২`).
    pub bengali_serials: bool,

    /// Whether to add a blank paragraph after each question.
    pub paragraph_spacing: bool,

    /// Font family for DOCX runs (ASCII and complex script).
    pub font: Option<String>,

    /// Font size in points for DOCX runs.
    pub font_size: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Mcq,
            selection: None,
            include_board: true,
            include_topic: true,
            include_answers: true,
            include_explanations: true,
            bengali_serials: false,
            paragraph_spacing: true,
            font: None,
            font_size: None,
        }
    }
}

impl RenderOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a schema preset.
    pub fn for_kind(kind: SchemaKind) -> Self {
        Self::default().with_layout(Layout::for_kind(kind))
    }

    /// Sets the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Restricts rendering to rows checked for `selection`.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Omits answer lines (question papers).
    pub fn without_answers(mut self) -> Self {
        self.include_answers = false;
        self
    }

    /// Omits board and topic lines.
    pub fn without_tags(mut self) -> Self {
        self.include_board = false;
        self.include_topic = false;
        self
    }

    /// Converts serial digits to Bengali.
    pub fn with_bengali_serials(mut self) -> Self {
        self.bengali_serials = true;
        self
    }

    /// Disables the blank paragraph between questions.
    pub fn without_paragraph_spacing(mut self) -> Self {
        self.paragraph_spacing = false;
        self
    }

    /// Sets the DOCX font family.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Sets the DOCX font size in points.
    pub fn with_font_size(mut self, points: usize) -> Self {
        self.font_size = Some(points.max(1));
        self
    }
}
