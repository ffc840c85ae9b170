//! Tabular stores.
//!
//! A store is anything that can hand back rows of text cells and accept a
//! full replacement of them. The first row of a table is its header.

mod csv;

pub use self::csv::{write_csv, CsvStore};

use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;

/// A header row plus data rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given header.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Builds a table from raw values; the first row is the header.
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut values = values.into_iter();
        let headers = values.next().unwrap_or_default();
        Self {
            headers,
            rows: values.collect(),
        }
    }

    /// Header cells.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows (header excluded).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a data row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Index of the column whose trimmed header equals `name`, ignoring case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Index of the first column matching any of `names`, in order of preference.
    pub fn column_index_any(&self, names: &[String]) -> Option<usize> {
        names.iter().find_map(|n| self.column_index(n))
    }

    /// Cell at `idx`, or empty if the row is short.
    pub fn cell_of(row: &[String], idx: usize) -> &str {
        row.get(idx).map(String::as_str).unwrap_or("")
    }

    /// Cell of `row` under header `name`; a missing column or short row yields "".
    pub fn cell(&self, row: usize, name: &str) -> &str {
        match (self.rows.get(row), self.column_index(name)) {
            (Some(r), Some(idx)) => Self::cell_of(r, idx),
            _ => "",
        }
    }

    /// All cells of the column `name`, empty strings for short rows.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| Self::cell_of(r, idx)).collect())
    }

    /// Header and rows as one value grid.
    pub fn to_values(&self) -> Vec<Vec<String>> {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        values.push(self.headers.clone());
        values.extend(self.rows.iter().cloned());
        values
    }
}

/// Bulk row access to a tabular store.
pub trait TabularStore {
    /// Fetches all rows, header first.
    fn read_table(&self) -> Result<Table>;

    /// Replaces the stored rows with `table` in one submission.
    fn write_table(&mut self, table: &Table) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Table,
}

impl MemoryStore {
    /// Creates a store holding `table`.
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    /// The stored table.
    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl TabularStore for MemoryStore {
    fn read_table(&self) -> Result<Table> {
        Ok(self.table.clone())
    }

    fn write_table(&mut self, table: &Table) -> Result<()> {
        self.table = table.clone();
        Ok(())
    }
}

/// Returns true for checkbox-like cells: `true`, `1`, `yes`, `checked`.
pub fn is_checked(cell: &str) -> bool {
    matches!(
        cell.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "checked"
    )
}

static RE_SHEET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/spreadsheets/d/([^/]+)").unwrap());

/// Extracts the ID from a spreadsheet URL; anything else is returned as-is.
pub fn parse_sheet_id_from_url(url: &str) -> &str {
    RE_SHEET_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map_or(url, |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_values(vec![
            vec!["Serial".into(), " Question ".into(), "Answer".into()],
            vec!["1".into(), "এক".into(), "ক".into()],
            vec!["2".into()],
        ])
    }

    #[test]
    fn test_safe_cell_lookup() {
        let t = table();
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(0, "question"), "এক");
        assert_eq!(t.cell(1, "Answer"), "");
        assert_eq!(t.cell(0, "Topic"), "");
        assert_eq!(t.cell(5, "Serial"), "");
    }

    #[test]
    fn test_column() {
        let t = table();
        assert_eq!(t.column("Answer"), Some(vec!["ক", ""]));
        assert_eq!(t.column("Missing"), None);
    }

    #[test]
    fn test_column_index_any_prefers_order() {
        let t = table();
        let names = vec!["Board".to_string(), "Answer".to_string(), "Serial".to_string()];
        assert_eq!(t.column_index_any(&names), Some(2));
    }

    #[test]
    fn test_from_values_empty() {
        let t = Table::from_values(Vec::new());
        assert!(t.headers().is_empty());
        assert!(t.is_empty());
        assert_eq!(t.to_values(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        store.write_table(&table()).unwrap();
        assert_eq!(store.read_table().unwrap(), table());
    }

    #[test]
    fn test_is_checked() {
        for cell in ["TRUE", " yes ", "1", "Checked"] {
            assert!(is_checked(cell), "{cell}");
        }
        for cell in ["", "false", "0", "no", "x"] {
            assert!(!is_checked(cell), "{cell}");
        }
    }

    #[test]
    fn test_parse_sheet_id_from_url() {
        assert_eq!(
            parse_sheet_id_from_url("https://docs.google.com/spreadsheets/d/1AbC-xyz_9/edit#gid=0"),
            "1AbC-xyz_9"
        );
        assert_eq!(parse_sheet_id_from_url("1AbC-xyz_9"), "1AbC-xyz_9");
    }
}
