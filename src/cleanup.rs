//! # Cleanup Pipeline
//!
//! A staged pipeline applied to every text fragment before it is stored on a
//! question record.
//!
//! ## Pipeline Stages
//!
//! 1. **Images** - `\includegraphics[..]{key}` becomes `{{image:key}}`, key recorded
//! 2. **Math delimiters** - `\( .. \)` and `\[ .. \]` become `$ .. $` / `$$ .. $$`
//! 3. **Math** - inline math spans rewritten to Unicode (see [`crate::equation`])
//! 4. **Markup** - formatting commands unwrapped or removed, pandoc escapes undone
//! 5. **Whitespace** - runs collapsed to one space, trimmed

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Cleanup configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Stage 1: replace include-graphics commands with placeholders
    pub extract_images: bool,
    /// Stage 2: normalize `\( \)` and `\[ \]` math delimiters
    pub normalize_math_delimiters: bool,
    /// Stage 3: convert inline math to Unicode
    pub convert_math: bool,
    /// Stage 4: strip formatting commands
    pub strip_markup: bool,
    /// Stage 5: collapse whitespace
    pub collapse_whitespace: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            extract_images: true,
            normalize_math_delimiters: true,
            convert_math: true,
            strip_markup: true,
            collapse_whitespace: true,
        }
    }
}

impl CleanupOptions {
    /// Creates options for minimal cleanup (whitespace only)
    pub fn minimal() -> Self {
        Self {
            extract_images: false,
            normalize_math_delimiters: false,
            convert_math: false,
            strip_markup: false,
            collapse_whitespace: true,
        }
    }

    /// Keeps math spans as typed.
    pub fn without_math(mut self) -> Self {
        self.normalize_math_delimiters = false;
        self.convert_math = false;
        self
    }

    /// Keeps formatting commands as typed.
    pub fn without_markup_stripping(mut self) -> Self {
        self.strip_markup = false;
        self
    }
}

/// Output of [`cleanup`]: the cleaned text plus any image keys found in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cleaned {
    /// Text ready to store.
    pub text: String,
    /// Image keys in order of appearance.
    pub images: Vec<String>,
}

// ============================================================================
// String normalization (used by line sources)
// ============================================================================

/// Normalizes a raw string: NFC, control characters removed, odd spaces made plain.
pub fn normalize_string(input: &str) -> String {
    let mut result = String::with_capacity(input.len());

    for c in input.nfc() {
        if is_control_char(c) {
            continue;
        }
        match c {
            '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{3000}' | '\t' => result.push(' '),
            _ => result.push(c),
        }
    }

    result
}

/// Check if character is a control character that should be removed
fn is_control_char(c: char) -> bool {
    matches!(
        c,
        '\0'        // Null
        | '\x0B'    // Vertical Tab
        | '\x0C'    // Form Feed
        | '\u{FEFF}' // BOM
        | '\u{FFFD}' // Replacement character
        | '\u{00AD}' // Soft hyphen
        | '\u{200B}' // Zero width space
    )
}

// ============================================================================
// Regex patterns (compiled once using LazyLock)
// ============================================================================

static RE_INCLUDE_GRAPHICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\includegraphics\s*(?:\[[^\]]*\])?\s*\{([^{}]*)\}").unwrap()
});

static RE_PAREN_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\((.*?)\\\)").unwrap());

static RE_BRACKET_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\[(.*?)\\\]").unwrap());

static RE_ONE_ARG_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[A-Za-z]+\*?\s*\{([^{}]*)\}").unwrap());

static RE_BARE_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[A-Za-z]+\*?").unwrap());

static RE_ESCAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\([%&_#$])").unwrap());

static RE_MULTIPLE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Placeholder written in place of an include-graphics command.
pub fn image_placeholder(key: &str) -> String {
    format!("{{{{image:{key}}}}}")
}

// ============================================================================
// Stages
// ============================================================================

/// Stage 1: Replace include-graphics commands with placeholders
///
/// Returns the rewritten text and the keys in order of appearance.
pub fn stage1_extract_images(input: &str) -> (String, Vec<String>) {
    if !input.contains("\\includegraphics") {
        return (input.to_string(), Vec::new());
    }

    let mut images = Vec::new();
    let text = RE_INCLUDE_GRAPHICS
        .replace_all(input, |caps: &Captures| {
            let key = caps[1].trim().to_string();
            let placeholder = image_placeholder(&key);
            images.push(key);
            placeholder
        })
        .into_owned();

    (text, images)
}

/// Stage 2: Normalize math delimiters to dollar form
pub fn stage2_normalize_math_delimiters(input: &str) -> String {
    let result = RE_PAREN_MATH.replace_all(input, |caps: &Captures| {
        format!("${}$", caps[1].trim())
    });
    RE_BRACKET_MATH
        .replace_all(&result, |caps: &Captures| format!("$${}$$", caps[1].trim()))
        .into_owned()
}

/// Stage 4: Strip formatting markup
///
/// Non-recursive: one pass unwraps single-argument commands, a second pass
/// drops whatever bare commands remain.
pub fn stage4_strip_markup(input: &str) -> String {
    if !input.contains('\\') && !input.contains('{') {
        return input.to_string();
    }

    let mut result = input.replace("\\textquotesingle", "");
    result = result.replace("\\\\", " ");
    result = RE_ONE_ARG_COMMAND.replace_all(&result, "$1").into_owned();
    result = RE_BARE_COMMAND.replace_all(&result, "").into_owned();
    result = RE_ESCAPE.replace_all(&result, "$1").into_owned();

    result
        .replace("{[}", "[")
        .replace("{]}", "]")
        .replace("{}", "")
}

/// Stage 5: Collapse whitespace runs and trim
pub fn stage5_collapse_whitespace(input: &str) -> String {
    RE_MULTIPLE_SPACES.replace_all(input, " ").trim().to_string()
}

// ============================================================================
// Main Pipeline
// ============================================================================

/// Run the cleanup pipeline on one text fragment
///
/// # Example
///
/// ```
/// use proshno::cleanup::{cleanup, CleanupOptions};
///
/// let cleaned = cleanup(r"\textbf{বল}  $F=ma$", &CleanupOptions::default());
/// assert_eq!(cleaned.text, "বল F = ma");
/// ```
pub fn cleanup(input: &str, options: &CleanupOptions) -> Cleaned {
    let mut images = Vec::new();
    let mut result = input.to_string();

    if options.extract_images {
        let (text, found) = stage1_extract_images(&result);
        result = text;
        images = found;
    }

    if options.normalize_math_delimiters {
        result = stage2_normalize_math_delimiters(&result);
    }

    if options.convert_math {
        result = crate::equation::convert_inline_math(&result);
    }

    if options.strip_markup {
        result = stage4_strip_markup(&result);
    }

    if options.collapse_whitespace {
        result = stage5_collapse_whitespace(&result);
    }

    Cleaned {
        text: result,
        images,
    }
}

/// Run cleanup with default options, discarding image keys
pub fn cleanup_default(input: &str) -> String {
    cleanup(input, &CleanupOptions::default()).text
}
