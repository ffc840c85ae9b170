//! Async API for non-blocking document processing.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! proshno = { version = "0.1", features = ["async"] }
//! ```

use crate::error::{Error, Result};
use crate::parser::ParseReport;
use crate::variant::Variant;
use crate::FormatType;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Io(std::io::Error::other(e.to_string()))
}

/// Asynchronously parses a document from a file path.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> proshno::Result<()> {
/// let report = proshno::async_api::parse_file("mcq.docx", &proshno::Variant::mcq()).await?;
/// println!("Questions: {}", report.questions.len());
/// # Ok(())
/// # }
/// ```
pub async fn parse_file(path: impl AsRef<Path>, variant: &Variant) -> Result<ParseReport> {
    let path = path.as_ref().to_path_buf();
    let variant = variant.clone();

    // Parsing is CPU-bound; run it on the blocking pool
    tokio::task::spawn_blocking(move || crate::parse_file(&path, &variant))
        .await
        .map_err(join_error)?
}

/// Asynchronously parses a document from bytes.
pub async fn parse_bytes(data: Vec<u8>, variant: &Variant) -> Result<ParseReport> {
    let variant = variant.clone();
    tokio::task::spawn_blocking(move || crate::parse_bytes(&data, &variant))
        .await
        .map_err(join_error)?
}

/// Asynchronously parses a document from an async reader.
pub async fn parse_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    variant: &Variant,
) -> Result<ParseReport> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).await?;
    parse_bytes(data, variant).await
}

/// Asynchronously detects the format of a file.
pub async fn detect_format(path: impl AsRef<Path>) -> Result<FormatType> {
    let data = fs::read(path).await?;
    crate::detect_format_from_bytes(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_reader() {
        let text = "১. প্রশ্ন\nক) এক\nউত্তর: ক\n";
        let report = parse_reader(text.as_bytes(), &Variant::mcq()).await.unwrap();
        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].answer, "এক");
    }

    #[tokio::test]
    async fn test_parse_file_tex_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.tex");
        std::fs::write(&path, "১. প্রশ্ন {[}ঢাকা বোর্ড{]}\nক. এক").unwrap();

        let report = parse_file(&path, &Variant::latex_mcq()).await.unwrap();
        assert_eq!(report.questions[0].board_institute, "ঢাকা বোর্ড");
    }
}
