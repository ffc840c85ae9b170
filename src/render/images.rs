//! Image key resolution for image columns.
//!
//! Records carry image keys such as `media/image1.png`. Before rows are
//! written, a key can be swapped for a value the store understands: a URL,
//! a data URI, or a spreadsheet `=IMAGE("..")` formula.

use crate::error::Result;
use crate::model::Resource;
use base64::Engine;
use std::collections::HashMap;
use std::path::Path;

/// Lookup table from image key to replacement value.
#[derive(Debug, Clone, Default)]
pub struct ImageMap {
    entries: HashMap<String, String>,
    formula: bool,
}

impl ImageMap {
    /// Creates an empty map; every key resolves to itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps each resource to a base64 data URI.
    pub fn from_resources(resources: &[Resource]) -> Self {
        let mut map = Self::new();
        for r in resources {
            let mime = r.mime_type.as_deref().unwrap_or("application/octet-stream");
            let data = base64::engine::general_purpose::STANDARD.encode(&r.data);
            map.insert(r.key.clone(), format!("data:{};base64,{}", mime, data));
        }
        map
    }

    /// Maps each resource to `prefix` joined with its file name.
    ///
    /// Pairs with resources written to a directory that is served or
    /// uploaded under `prefix`.
    pub fn with_prefix(resources: &[Resource], prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        let mut map = Self::new();
        for r in resources {
            map.insert(r.key.clone(), format!("{}/{}", prefix, r.file_name()));
        }
        map
    }

    /// Writes resources into `dir` (by file name) and maps their keys to the written paths.
    pub fn extract_to_dir(resources: &[Resource], dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut map = Self::new();
        for r in resources {
            let path = dir.join(r.file_name());
            std::fs::write(&path, &r.data)?;
            map.insert(r.key.clone(), path.to_string_lossy().into_owned());
        }
        Ok(map)
    }

    /// Wraps resolved values in `=IMAGE("..")` formulas.
    pub fn with_image_formula(mut self, enabled: bool) -> Self {
        self.formula = enabled;
        self
    }

    /// Returns true if resolved values are wrapped in formulas.
    pub fn uses_formula(&self) -> bool {
        self.formula
    }

    /// Adds or replaces one entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a key by full key, then by file name. Unknown keys stay as they are.
    pub fn resolve(&self, key: &str) -> String {
        let name = file_name(key);
        let found = self
            .entries
            .get(key)
            .or_else(|| self.entries.get(name))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(k, _)| file_name(k) == name)
                    .map(|(_, v)| v)
            });

        match found {
            Some(value) if self.formula => format!("=IMAGE(\"{}\")", value),
            Some(value) => value.clone(),
            None => key.to_string(),
        }
    }
}

fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
