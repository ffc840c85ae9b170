//! Column schemas mapping questions onto spreadsheet rows.
//!
//! Each schema is an ordered column list; a question maps 1:1 onto it so
//! rows can be written and read back positionally.

use super::question::{Label, Question};
use crate::error::{Error, Result};
use crate::store::{is_checked, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which preset column layout a variant writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    /// Serial, question, board, four options, answer.
    #[default]
    Mcq,
    /// Serial, passage, board, four (question, answer) pairs.
    Creative,
    /// MCQ plus selection flags, topic, explanation and image columns.
    Extended,
}

/// Checkbox columns used to pick rows for a given output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selection {
    /// For Class Slide
    ClassSlide,
    /// For Lecture sheet
    LectureSheet,
    /// For Quiz (Daily)
    QuizDaily,
    /// For Quiz (Weekly)
    QuizWeekly,
}

impl Selection {
    /// All selection columns in sheet order.
    pub const ALL: [Selection; 4] = [
        Selection::ClassSlide,
        Selection::LectureSheet,
        Selection::QuizDaily,
        Selection::QuizWeekly,
    ];

    /// Canonical column header.
    pub fn header(self) -> &'static str {
        match self {
            Selection::ClassSlide => "For Class Slide",
            Selection::LectureSheet => "For Lecture sheet",
            Selection::QuizDaily => "For Quiz (Daily)",
            Selection::QuizWeekly => "For Quiz (Weekly)",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Selection::QuizDaily => &["For Quiz"],
            _ => &[],
        }
    }

    /// Parses a short name (`class-slide`) or a column header.
    pub fn from_name(name: &str) -> Option<Selection> {
        let name = name.trim();
        Self::ALL.into_iter().find(|s| {
            let short = short_name(*s);
            short.eq_ignore_ascii_case(name)
                || s.header().eq_ignore_ascii_case(name)
                || s.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }
}

fn short_name(selection: Selection) -> &'static str {
    match selection {
        Selection::ClassSlide => "class-slide",
        Selection::LectureSheet => "lecture-sheet",
        Selection::QuizDaily => "quiz-daily",
        Selection::QuizWeekly => "quiz-weekly",
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(short_name(*self))
    }
}

/// The question field a column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Serial number.
    Serial,
    /// Question text or passage.
    Body,
    /// Board or institute tag.
    BoardInstitute,
    /// Topic tag.
    Topic,
    /// Option (or creative sub-question) text.
    Option(Label),
    /// MCQ answer.
    Answer,
    /// Creative sub-question answer.
    PartAnswer(Label),
    /// Explanation.
    Explanation,
    /// Question image.
    QuestionImage,
    /// Explanation image.
    ExplanationImage,
    /// Option image.
    OptionImage(Label),
    /// Selection checkbox; always written unchecked.
    Selection(Selection),
}

impl Field {
    /// Whether the column holds an image key.
    pub fn is_image(self) -> bool {
        matches!(
            self,
            Field::QuestionImage | Field::ExplanationImage | Field::OptionImage(_)
        )
    }

    /// Reads the field from a question.
    pub fn value(self, q: &Question) -> &str {
        match self {
            Field::Serial => &q.serial,
            Field::Body => &q.body,
            Field::BoardInstitute => &q.board_institute,
            Field::Topic => &q.topic,
            Field::Option(l) => q.options.get(l),
            Field::Answer => &q.answer,
            Field::PartAnswer(l) => q.part_answers.get(l),
            Field::Explanation => &q.explanation,
            Field::QuestionImage => &q.question_image,
            Field::ExplanationImage => &q.explanation_image,
            Field::OptionImage(l) => q.option_images.get(l),
            Field::Selection(_) => "",
        }
    }

    /// Writes the field on a question. Selection fields are ignored.
    pub fn set(self, q: &mut Question, value: String) {
        match self {
            Field::Serial => q.serial = value,
            Field::Body => q.body = value,
            Field::BoardInstitute => q.board_institute = value,
            Field::Topic => q.topic = value,
            Field::Option(l) => q.options.set(l, value),
            Field::Answer => q.answer = value,
            Field::PartAnswer(l) => q.part_answers.set(l, value),
            Field::Explanation => q.explanation = value,
            Field::QuestionImage => q.question_image = value,
            Field::ExplanationImage => q.explanation_image = value,
            Field::OptionImage(l) => q.option_images.set(l, value),
            Field::Selection(_) => {}
        }
    }

    /// Alternative header spellings seen in existing sheets.
    fn aliases(self) -> Vec<String> {
        match self {
            Field::Serial => vec!["Serial Number".into(), "Serial".into(), "SL".into()],
            Field::Body => vec!["Question".into(), "Passage".into()],
            Field::BoardInstitute => {
                vec!["Board/Institute".into(), "Board/Inst".into(), "Board".into()]
            }
            Field::Topic => vec!["Topic".into()],
            Field::Option(l) => vec![format!("Option {l}"), format!("Option_{l}")],
            Field::Answer => vec!["Answer".into()],
            Field::PartAnswer(l) => vec![format!("Answer {}", l.number())],
            Field::Explanation => vec!["Explanation".into()],
            Field::QuestionImage => vec!["QuestionIMG".into(), "Question Image".into()],
            Field::ExplanationImage => {
                vec!["ExplanationIMG".into(), "Explanation Image".into()]
            }
            Field::OptionImage(l) => vec![format!("Option {l} IMG")],
            Field::Selection(s) => std::iter::once(s.header())
                .chain(s.aliases().iter().copied())
                .map(String::from)
                .collect(),
        }
    }
}

/// One column: the field it carries and the header it is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field carried by the column.
    pub field: Field,
    /// Header written to the first row.
    pub header: String,
}

impl Column {
    fn new(field: Field, header: impl Into<String>) -> Self {
        Self {
            field,
            header: header.into(),
        }
    }
}

/// A row read back from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// The question stored in the row.
    pub question: Question,
    /// Selection columns that are checked.
    pub selected: Vec<Selection>,
}

impl SheetRow {
    /// Returns true if the row is checked for `selection`.
    pub fn is_selected(&self, selection: Selection) -> bool {
        self.selected.contains(&selection)
    }
}

/// Ordered column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    kind: SchemaKind,
    columns: Vec<Column>,
}

impl Schema {
    /// Schema for a preset kind.
    pub fn for_kind(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Mcq => Self::mcq(),
            SchemaKind::Creative => Self::creative(),
            SchemaKind::Extended => Self::extended(),
        }
    }

    /// `Serial Number, Question, Board/Institute, Option ক..ঘ, Answer`
    pub fn mcq() -> Self {
        let mut columns = vec![
            Column::new(Field::Serial, "Serial Number"),
            Column::new(Field::Body, "Question"),
            Column::new(Field::BoardInstitute, "Board/Institute"),
        ];
        columns.extend(option_columns());
        columns.push(Column::new(Field::Answer, "Answer"));

        Self {
            kind: SchemaKind::Mcq,
            columns,
        }
    }

    /// `Serial Number, Passage, Board/Institute, Question 1, Answer 1, ..`
    pub fn creative() -> Self {
        let mut columns = vec![
            Column::new(Field::Serial, "Serial Number"),
            Column::new(Field::Body, "Passage"),
            Column::new(Field::BoardInstitute, "Board/Institute"),
        ];
        for label in Label::ALL {
            let n = label.number();
            columns.push(Column::new(Field::Option(label), format!("Question {n}")));
            columns.push(Column::new(Field::PartAnswer(label), format!("Answer {n}")));
        }

        Self {
            kind: SchemaKind::Creative,
            columns,
        }
    }

    /// Serial, selection flags, question, topic, board, options, answer,
    /// explanation, then question, explanation and option image columns.
    pub fn extended() -> Self {
        let mut columns = vec![Column::new(Field::Serial, "Serial")];
        columns.extend(
            Selection::ALL
                .into_iter()
                .map(|s| Column::new(Field::Selection(s), s.header())),
        );
        columns.push(Column::new(Field::Body, "Question"));
        columns.push(Column::new(Field::Topic, "Topic"));
        columns.push(Column::new(Field::BoardInstitute, "Board/Inst"));
        columns.extend(option_columns());
        columns.push(Column::new(Field::Answer, "Answer"));
        columns.push(Column::new(Field::Explanation, "Explanation"));
        columns.push(Column::new(Field::QuestionImage, "QuestionIMG"));
        columns.push(Column::new(Field::ExplanationImage, "ExplanationIMG"));
        columns.extend(
            Label::ALL
                .into_iter()
                .map(|l| Column::new(Field::OptionImage(l), format!("Option {l} IMG"))),
        );

        Self {
            kind: SchemaKind::Extended,
            columns,
        }
    }

    /// The preset this schema was built from.
    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Header row.
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    /// Maps a question onto a row, image keys written as-is.
    pub fn row(&self, q: &Question) -> Vec<String> {
        self.row_with(q, |key| key.to_string())
    }

    /// Maps a question onto a row, passing non-empty image keys through `resolve`.
    pub fn row_with(&self, q: &Question, resolve: impl Fn(&str) -> String) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| {
                let value = c.field.value(q);
                if c.field.is_image() && !value.is_empty() {
                    resolve(value)
                } else {
                    value.to_string()
                }
            })
            .collect()
    }

    /// Builds a table (header + one row per question).
    pub fn to_table(&self, questions: &[Question]) -> Table {
        self.to_table_with(questions, |key| key.to_string())
    }

    /// Builds a table, resolving image keys through `resolve`.
    pub fn to_table_with(&self, questions: &[Question], resolve: impl Fn(&str) -> String) -> Table {
        let mut table = Table::new(self.headers());
        for q in questions {
            table.push_row(self.row_with(q, &resolve));
        }
        table
    }

    /// Reads questions back from a table.
    ///
    /// Columns are matched by header, so reordered or partial sheets work;
    /// a column the table lacks reads as empty. Fails only when neither a
    /// serial nor a question column exists. Fully blank rows are skipped.
    pub fn read_table(&self, table: &Table) -> Result<Vec<SheetRow>> {
        let located: Vec<(Field, Option<usize>)> = self
            .columns
            .iter()
            .map(|c| {
                let mut names = vec![c.header.clone()];
                names.extend(c.field.aliases());
                (c.field, table.column_index_any(&names))
            })
            .collect();

        let has = |field: Field| located.iter().any(|(f, idx)| *f == field && idx.is_some());
        if !has(Field::Serial) && !has(Field::Body) {
            return Err(Error::MissingColumn(format!(
                "{} / {}",
                self.columns[0].header,
                self.header_of(Field::Body).unwrap_or("Question")
            )));
        }

        let mut rows = Vec::new();
        for row in table.rows() {
            let mut question = Question::default();
            let mut selected = Vec::new();

            for (field, idx) in &located {
                let Some(idx) = idx else { continue };
                let cell = Table::cell_of(row, *idx);
                match field {
                    Field::Selection(s) => {
                        if is_checked(cell) {
                            selected.push(*s);
                        }
                    }
                    f => f.set(&mut question, cell.trim().to_string()),
                }
            }

            if question == Question::default() {
                continue;
            }
            rows.push(SheetRow { question, selected });
        }

        Ok(rows)
    }

    fn header_of(&self, field: Field) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.header.as_str())
    }
}

fn option_columns() -> impl Iterator<Item = Column> {
    Label::ALL
        .into_iter()
        .map(|l| Column::new(Field::Option(l), format!("Option {l}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        let mut q = Question::new("১");
        q.body = "২ + ২ = ?".into();
        q.board_institute = "ঢাকা বোর্ড ২০২৩".into();
        q.options.set(Label::Ka, "৪".into());
        q.options.set(Label::Kha, "৫".into());
        q.answer = "৪".into();
        q
    }

    #[test]
    fn test_mcq_headers() {
        assert_eq!(
            Schema::mcq().headers(),
            vec![
                "Serial Number",
                "Question",
                "Board/Institute",
                "Option ক",
                "Option খ",
                "Option গ",
                "Option ঘ",
                "Answer"
            ]
        );
    }

    #[test]
    fn test_extended_headers() {
        let headers = Schema::extended().headers();
        assert_eq!(headers.len(), 20);
        assert_eq!(headers[0], "Serial");
        assert_eq!(headers[1], "For Class Slide");
        assert_eq!(headers[5], "Question");
        assert_eq!(headers[7], "Board/Inst");
        assert_eq!(headers[15], "ExplanationIMG");
        assert_eq!(headers[16], "Option ক IMG");
        assert_eq!(headers[19], "Option ঘ IMG");
    }

    #[test]
    fn test_creative_headers() {
        let headers = Schema::creative().headers();
        assert_eq!(headers[1], "Passage");
        assert_eq!(headers[3], "Question 1");
        assert_eq!(headers[4], "Answer 1");
        assert_eq!(headers[10], "Answer 4");
    }

    #[test]
    fn test_row_positional() {
        let row = Schema::mcq().row(&sample());
        assert_eq!(row[0], "১");
        assert_eq!(row[2], "ঢাকা বোর্ড ২০২৩");
        assert_eq!(row[3], "৪");
        assert_eq!(row[5], "");
        assert_eq!(row[7], "৪");
    }

    #[test]
    fn test_row_resolves_images() {
        let mut q = sample();
        q.question_image = "media/image1.png".into();
        let row = Schema::extended().row_with(&q, |k| format!("https://img/{k}"));
        assert_eq!(row[14], "https://img/media/image1.png");
        assert_eq!(row[15], "");
    }

    #[test]
    fn test_option_images_written_and_read_back() {
        let mut q = sample();
        q.option_images.set(Label::Kha, "media/image4.png".into());
        let schema = Schema::extended();

        let table = schema.to_table(std::slice::from_ref(&q));
        assert_eq!(table.cell(0, "Option খ IMG"), "media/image4.png");

        let rows = schema.read_table(&table).unwrap();
        assert_eq!(rows[0].question.option_images.get(Label::Kha), "media/image4.png");
    }

    #[test]
    fn test_table_roundtrip_reordered() {
        let table = Schema::mcq().to_table(&[sample()]);
        let reordered = Table::from_values(vec![
            vec!["Answer".into(), "Question".into(), "Serial Number".into()],
            vec![table.rows()[0][7].clone(), table.rows()[0][1].clone(), "১".into()],
        ]);
        let rows = Schema::mcq().read_table(&reordered).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question.answer, "৪");
        assert_eq!(rows[0].question.options.get(Label::Ka), "");
    }

    #[test]
    fn test_read_selection_flags() {
        let table = Table::from_values(vec![
            vec!["Serial".into(), "For Quiz".into(), "Question".into()],
            vec!["1".into(), "TRUE".into(), "প্রশ্ন".into()],
            vec!["2".into(), "".into(), "আরেকটি".into()],
            vec!["".into(), "".into(), "".into()],
        ]);
        let rows = Schema::extended().read_table(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_selected(Selection::QuizDaily));
        assert!(!rows[1].is_selected(Selection::QuizDaily));
    }

    #[test]
    fn test_read_missing_columns() {
        let table = Table::from_values(vec![vec!["Answer".into()], vec!["x".into()]]);
        assert!(matches!(
            Schema::mcq().read_table(&table),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_selection_from_name() {
        assert_eq!(Selection::from_name("quiz-weekly"), Some(Selection::QuizWeekly));
        assert_eq!(Selection::from_name("For Class Slide"), Some(Selection::ClassSlide));
        assert_eq!(Selection::from_name("for quiz"), Some(Selection::QuizDaily));
        assert_eq!(Selection::from_name("slides"), None);
    }
}
