//! Error types for proshno library.

use std::io;
use thiserror::Error;

/// Result type alias for proshno operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for proshno library.
///
/// The question parser itself never fails; these errors come from the
/// boundaries around it (reading sources, stores, variant files, renderers).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input format is not recognized.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The input format is recognized but not supported (e.g., legacy `.doc`).
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive parsing error.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// XML parsing error in a DOCX part.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Required part of a container is missing.
    #[error("Missing required component: {0}")]
    MissingComponent(String),

    /// Text encoding error.
    #[error("Text encoding error: {0}")]
    Encoding(String),

    /// Tabular store read/write error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// A required column is absent from a table header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Variant or other configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document rendering error.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
