//! CSV file store.

use super::{Table, TabularStore};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A CSV file holding one table (header row first).
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Creates a store backed by `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularStore for CsvStore {
    fn read_table(&self) -> Result<Table> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut values: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            values.push(record.iter().map(str::to_string).collect());
        }

        // Header cells may carry a BOM from spreadsheet exports
        if let Some(first) = values.first_mut().and_then(|h| h.first_mut()) {
            if let Some(stripped) = first.strip_prefix('\u{FEFF}') {
                *first = stripped.to_string();
            }
        }

        debug!(path = %self.path.display(), rows = values.len(), "read csv");
        Ok(Table::from_values(values))
    }

    fn write_table(&mut self, table: &Table) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;

        write_csv(table, tmp.as_file())?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        debug!(path = %self.path.display(), rows = table.len(), "wrote csv");
        Ok(())
    }
}

/// Writes a table as CSV (header row first) to any writer.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut writer = ::csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
