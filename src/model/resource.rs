//! Binary resources carried alongside the lines of a source document.

use serde::Serialize;

/// An embedded media file (usually an image under `word/media/`).
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Key used in `\includegraphics{..}` placeholders, e.g. `media/image1.png`.
    pub key: String,
    /// MIME type (if known)
    pub mime_type: Option<String>,
    /// Binary data
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Resource {
    /// Creates a resource, guessing the MIME type from the key.
    pub fn new(key: impl Into<String>, data: Vec<u8>) -> Self {
        let key = key.into();
        let mime_type = guess_mime_type(&key);
        Self {
            key,
            mime_type,
            data,
        }
    }

    /// The last path segment of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }

    /// Returns the file extension based on MIME type.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_deref() {
            Some("image/png") => "png",
            Some("image/jpeg") => "jpg",
            Some("image/gif") => "gif",
            Some("image/bmp") => "bmp",
            Some("image/webp") => "webp",
            Some("image/svg+xml") => "svg",
            Some("image/x-emf") => "emf",
            Some("image/x-wmf") => "wmf",
            _ => "bin",
        }
    }
}

/// Guesses MIME type from filename extension.
pub fn guess_mime_type(filename: &str) -> Option<String> {
    let ext = filename.rsplit('.').next()?.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "wmf" => "image/x-wmf",
        "emf" => "image/x-emf",
        _ => return None,
    };
    Some(mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_names() {
        let r = Resource::new("media/image3.JPEG", vec![1, 2, 3]);
        assert_eq!(r.file_name(), "image3.JPEG");
        assert_eq!(r.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(r.extension(), "jpg");
    }

    #[test]
    fn test_unknown_extension() {
        let r = Resource::new("media/blob", vec![]);
        assert_eq!(r.mime_type, None);
        assert_eq!(r.extension(), "bin");
    }
}
