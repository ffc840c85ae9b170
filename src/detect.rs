//! Format detection for question documents.

use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Magic bytes for OLE Compound File (legacy Word `.doc`)
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Magic bytes for ZIP archive (DOCX)
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// UTF-8 byte order mark
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Bytes inspected when sniffing text.
const SNIFF_LEN: usize = 8192;

/// Markers that identify a LaTeX export.
const LATEX_MARKERS: &[&str] = &[
    "\\begin{",
    "\\documentclass",
    "\\includegraphics",
    "\\textbf{",
    "\\item",
    "{[}",
];

/// Supported document format types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Word document (ZIP container with WordprocessingML)
    Docx,
    /// LaTeX export, typically produced by pandoc
    Latex,
    /// Plain UTF-8 text, one paragraph per line
    PlainText,
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Docx => write!(f, "DOCX"),
            FormatType::Latex => write!(f, "LaTeX"),
            FormatType::PlainText => write!(f, "Plain text"),
        }
    }
}

/// Detect document format from a file path.
///
/// A `.tex` extension forces LaTeX for text files.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path)?;
    let format = detect_format(&mut file)?;

    let is_tex = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tex"));
    if is_tex && format == FormatType::PlainText {
        return Ok(FormatType::Latex);
    }
    Ok(format)
}

/// Detect document format from a reader.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<FormatType> {
    let mut buffer = Vec::with_capacity(SNIFF_LEN);

    reader.seek(SeekFrom::Start(0))?;
    reader.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut buffer)?;
    reader.seek(SeekFrom::Start(0))?;

    detect_format_from_bytes(&buffer)
}

/// Detect document format from bytes.
///
/// Empty input is plain text with no lines.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if data.is_empty() {
        return Ok(FormatType::PlainText);
    }

    if data.len() >= 8 && data[..8] == OLE_MAGIC {
        return Err(Error::UnsupportedFormat(
            "legacy Word .doc; save the file as .docx".into(),
        ));
    }

    if data.len() >= 4 && data[..4] == ZIP_MAGIC {
        return Ok(FormatType::Docx);
    }

    let head = &data[..data.len().min(SNIFF_LEN)];
    let head = head.strip_prefix(&UTF8_BOM[..]).unwrap_or(head);
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        // A multi-byte character cut off by the sniff window is fine
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&head[..e.valid_up_to()]).map_err(|_| Error::UnknownFormat)?
        }
        Err(_) => return Err(Error::UnknownFormat),
    };

    if LATEX_MARKERS.iter().any(|m| text.contains(m)) {
        Ok(FormatType::Latex)
    } else {
        Ok(FormatType::PlainText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_detect_ole_magic() {
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00, 0x00];
        assert!(matches!(
            detect_format_from_bytes(&data),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_detect_zip_magic() {
        let data = [0x50, 0x4B, 0x03, 0x04, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::Docx);
    }

    #[test]
    fn test_detect_latex() {
        let data = "\\begin{enumerate}\n১. প্রশ্ন {[}ঢাকা বোর্ড{]}".as_bytes();
        assert_eq!(detect_format_from_bytes(data).unwrap(), FormatType::Latex);
    }

    #[test]
    fn test_detect_plain_text_with_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice("১. প্রশ্ন\nক) উত্তর".as_bytes());
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::PlainText);
    }

    #[test]
    fn test_truncated_multibyte_is_text() {
        let mut data = vec![b'a'; SNIFF_LEN - 1];
        data.extend_from_slice("ক".as_bytes());
        let mut cursor = Cursor::new(data);
        assert_eq!(detect_format(&mut cursor).unwrap(), FormatType::PlainText);
    }

    #[test]
    fn test_detect_unknown() {
        let data = [0xFF, 0xFE, 0x00, 0xD8, 0x01, 0x02, 0x03, 0x04];
        assert!(matches!(
            detect_format_from_bytes(&data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_empty() {
        assert_eq!(detect_format_from_bytes(&[]).unwrap(), FormatType::PlainText);
    }

    #[test]
    fn test_tex_extension_forces_latex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.tex");
        std::fs::write(&path, "১. প্রশ্ন").unwrap();
        assert_eq!(detect_format_from_path(&path).unwrap(), FormatType::Latex);
    }
}
