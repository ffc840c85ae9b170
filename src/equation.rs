//! Inline math to Unicode conversion.
//!
//! Question authors type formulas as LaTeX-ish inline spans (`$x^2$`,
//! `$$\alpha + \beta$$`). Spreadsheets and plain documents cannot render
//! those, so the spans are rewritten into their closest Unicode spelling.
//! This is a cosmetic substitution table, not a math renderer: nested or
//! malformed spans are left as they are.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_DISPLAY_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$([^$]+)\$\$").unwrap());

static RE_INLINE_MATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$([^$]+)\$").unwrap());

static RE_COMMAND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\([A-Za-z]+)").unwrap());

static RE_FRAC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\frac\s*\{([^{}]*)\}\s*\{([^{}]*)\}").unwrap());

static RE_SQRT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\sqrt\s*\{([^{}]*)\}").unwrap());

static RE_SUPERSCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\p{L}\p{N})\]])\^(?:\{([^{}]*)\}|([^\s{}\\]))").unwrap()
});

static RE_SUBSCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\p{L}\p{N})\]])_(?:\{([^{}]*)\}|([^\s{}\\]))").unwrap()
});

static RE_EQUALS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*=\s*").unwrap());

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Stand-in for `\$` while spans are matched (private use code point).
const ESCAPED_DOLLAR: &str = "\u{E000}";

/// Greek letter commands.
const GREEK: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("theta", "θ"),
    ("mu", "μ"),
    ("pi", "π"),
    ("sigma", "σ"),
    ("phi", "φ"),
    ("omega", "ω"),
    ("lambda", "λ"),
    ("Delta", "Δ"),
    ("Omega", "Ω"),
];

/// Operator commands.
const OPERATORS: &[(&str, &str)] = &[
    ("times", "×"),
    ("cdot", "·"),
    ("pm", "±"),
    ("approx", "≈"),
    ("neq", "≠"),
    ("ne", "≠"),
    ("div", "÷"),
    ("leq", "≤"),
    ("geq", "≥"),
    ("infty", "∞"),
    ("degree", "°"),
    ("circ", "°"),
];

/// Replaces every `$$...$$` span, then every `$...$` span, with its Unicode rendering.
///
/// The delimiters are dropped. A lone `$` matches nothing and stays in the text.
pub fn convert_inline_math(text: &str) -> String {
    if !text.contains('$') {
        return text.to_string();
    }

    // An escaped `\$` is a literal dollar, never a delimiter
    let masked = text.replace("\\$", ESCAPED_DOLLAR);
    let display = RE_DISPLAY_MATH.replace_all(&masked, |caps: &Captures| to_unicode(&caps[1]));
    RE_INLINE_MATH
        .replace_all(&display, |caps: &Captures| to_unicode(&caps[1]))
        .replace(ESCAPED_DOLLAR, "\\$")
}

/// Converts the body of one math span to Unicode.
///
/// ```
/// use proshno::equation::to_unicode;
///
/// assert_eq!(to_unicode("x^2"), "x²");
/// assert_eq!(to_unicode("x^k"), "x^k");
/// assert_eq!(to_unicode(r"2\pi r"), "2π r");
/// ```
pub fn to_unicode(math: &str) -> String {
    let mut result = RE_FRAC.replace_all(math, "$1/$2").into_owned();
    result = RE_SQRT.replace_all(&result, "√$1").into_owned();

    result = RE_COMMAND
        .replace_all(&result, |caps: &Captures| {
            let name = &caps[1];
            lookup(GREEK, name)
                .or_else(|| lookup(OPERATORS, name))
                .map(str::to_string)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    result = RE_SUPERSCRIPT
        .replace_all(&result, |caps: &Captures| script(caps, '^', superscript))
        .into_owned();
    result = RE_SUBSCRIPT
        .replace_all(&result, |caps: &Captures| script(caps, '_', subscript))
        .into_owned();

    result = RE_EQUALS.replace_all(&result, " = ").into_owned();
    RE_SPACES.replace_all(&result, " ").trim().to_string()
}

fn lookup(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
}

/// Renders `base^x` / `base_{xy}` matches.
///
/// A braced group is converted only when every character has a glyph; otherwise
/// the whole group is kept literally so the exponent stays readable.
fn script(caps: &Captures, marker: char, map: fn(char) -> Option<char>) -> String {
    let base = &caps[1];

    if let Some(single) = caps.get(3) {
        let c = single.as_str().chars().next().unwrap_or_default();
        return match map(c) {
            Some(glyph) => format!("{base}{glyph}"),
            None => format!("{base}{marker}{c}"),
        };
    }

    let group = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    let glyphs: Option<String> = group.chars().map(map).collect();
    match glyphs {
        Some(g) if !g.is_empty() => format!("{base}{g}"),
        _ if group.chars().count() == 1 => format!("{base}{marker}{group}"),
        _ => format!("{base}{marker}{{{group}}}"),
    }
}

/// Unicode superscript glyph for a character, if one exists.
pub fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        '+' => '⁺',
        '-' => '⁻',
        _ => return None,
    })
}

/// Unicode subscript glyph for a character, if one exists.
pub fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        _ => return None,
    })
}
