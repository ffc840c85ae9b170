//! ZIP container wrapper for DOCX documents.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// DOCX container paths.
mod paths {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const DOCUMENT_XML: &str = "word/document.xml";
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    pub const MEDIA_DIR: &str = "word/media/";
}

/// ZIP container wrapper for DOCX files.
pub struct DocxContainer {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl DocxContainer {
    /// Opens a DOCX container from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Opens a DOCX container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Opens a DOCX container from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = ZipArchive::new(cursor)?;
        Ok(Self { archive })
    }

    /// Checks that the archive declares a WordprocessingML main part.
    pub fn verify_content_types(&mut self) -> Result<bool> {
        match self.read_file(paths::CONTENT_TYPES) {
            Ok(content) => Ok(content.contains("wordprocessingml")),
            // Some generators omit it; fall back to the part itself
            Err(_) => Ok(self.file_exists(paths::DOCUMENT_XML)),
        }
    }

    /// Reads a file from the archive as UTF-8 string.
    pub fn read_file(&mut self, path: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Reads a binary file from the archive.
    pub fn read_binary(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Reads the main document part.
    pub fn read_document(&mut self) -> Result<String> {
        self.read_file(paths::DOCUMENT_XML)
    }

    /// Reads the document relationships as `id -> target` (targets relative to `word/`).
    ///
    /// A missing relationships part yields an empty map.
    pub fn read_relationships(&mut self) -> Result<HashMap<String, String>> {
        match self.read_file(paths::DOCUMENT_RELS) {
            Ok(xml) => parse_relationships(&xml),
            Err(Error::MissingComponent(_)) => Ok(HashMap::new()),
            Err(e) => Err(e),
        }
    }

    /// Lists all files in the media directory.
    pub fn list_media(&mut self) -> Vec<String> {
        let mut media = Vec::new();

        for i in 0..self.archive.len() {
            if let Ok(file) = self.archive.by_index(i) {
                let name = file.name().to_string();
                if name.starts_with(paths::MEDIA_DIR) && !name.ends_with('/') {
                    media.push(name);
                }
            }
        }

        media.sort();
        media
    }

    /// Checks if a file exists in the archive.
    pub fn file_exists(&mut self, path: &str) -> bool {
        self.archive.by_name(path).is_ok()
    }
}

/// Parses `Relationship` elements into an `Id -> Target` map.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let id = super::body::get_attr_string(&e, "Id");
                    let target = super::body::get_attr_string(&e, "Target");
                    if let (Some(id), Some(target)) = (id, target) {
                        let target = target.trim_start_matches('/');
                        let target = target.strip_prefix("word/").unwrap_or(target);
                        rels.insert(id, target.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type=".../styles" Target="styles.xml"/>
            <Relationship Id="rId5" Type=".../image" Target="media/image1.png"/>
        </Relationships>
        "#;

        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels["rId5"], "media/image1.png");
    }
}
