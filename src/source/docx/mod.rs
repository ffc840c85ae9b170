//! DOCX (WordprocessingML) line source.
//!
//! DOCX files are ZIP archives; the text lives in `word/document.xml` and
//! pictures under `word/media/`, linked through
//! `word/_rels/document.xml.rels`.

mod body;
mod container;

pub use container::DocxContainer;

use crate::error::{Error, Result};
use crate::model::Resource;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

/// Lines and media read from a DOCX file.
#[derive(Debug, Default)]
pub struct DocxContent {
    /// Paragraph lines in document order (raw, not yet normalized).
    pub lines: Vec<String>,
    /// Files under `word/media/`, keyed relative to `word/`.
    pub resources: Vec<Resource>,
}

/// DOCX document reader.
pub struct DocxReader {
    container: DocxContainer,
}

impl DocxReader {
    /// Opens a DOCX document from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = DocxContainer::open(path)?;
        Ok(Self { container })
    }

    /// Opens a DOCX document from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let container = DocxContainer::from_reader(reader)?;
        Ok(Self { container })
    }

    /// Opens a DOCX document from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = DocxContainer::from_bytes(data)?;
        Ok(Self { container })
    }

    /// Reads paragraph lines and, if requested, embedded media.
    pub fn read(&mut self, with_media: bool) -> Result<DocxContent> {
        if !self.container.verify_content_types()? {
            return Err(Error::UnsupportedFormat(
                "ZIP archive is not a Word document".into(),
            ));
        }

        let rels = self.container.read_relationships()?;
        let xml = self.container.read_document()?;
        let lines = body::parse_body(&xml, &rels)?;
        debug!(paragraphs = lines.len(), relationships = rels.len(), "read document.xml");

        let resources = if with_media {
            self.read_media()
        } else {
            Vec::new()
        };

        Ok(DocxContent { lines, resources })
    }

    fn read_media(&mut self) -> Vec<Resource> {
        let mut resources = Vec::new();

        for path in self.container.list_media() {
            match self.container.read_binary(&path) {
                Ok(data) => {
                    let key = path.strip_prefix("word/").unwrap_or(&path);
                    resources.push(Resource::new(key, data));
                }
                Err(e) => debug!(path = %path, error = %e, "skipping unreadable media"),
            }
        }

        resources
    }
}


#[cfg(test)]
mod tests {
    use super::fixture::build_docx;
    use super::*;

    #[test]
    fn test_read_lines_and_media() {
        let data = build_docx(
            &["১. প্রশ্ন", "ক) উত্তর"],
            &[("image1.png", &[0x89u8, 0x50, 0x4E, 0x47][..])],
        );
        let content = DocxReader::from_bytes(data).unwrap().read(true).unwrap();
        assert_eq!(content.lines, vec!["১. প্রশ্ন", "ক) উত্তর"]);
        assert_eq!(content.resources.len(), 1);
        assert_eq!(content.resources[0].key, "media/image1.png");
        assert_eq!(content.resources[0].mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_media_skipped_when_not_requested() {
        let data = build_docx(&["১. প্রশ্ন"], &[("image1.png", &b"x"[..])]);
        let content = DocxReader::from_bytes(data).unwrap().read(false).unwrap();
        assert!(content.resources.is_empty());
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            DocxReader::from_bytes(b"plain text".to_vec()),
            Err(Error::ZipArchive(_))
        ));
    }

    #[test]
    fn test_zip_without_document() {
        use std::io::{Cursor, Write};
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hello").unwrap();
        let data = zip.finish().unwrap().into_inner();

        let err = DocxReader::from_bytes(data).unwrap().read(false).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
