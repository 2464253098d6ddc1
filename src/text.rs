//! Text helpers shared by the normalizer, search, renderer and link builders.
//!
//! Everything here is total: no helper fails or panics on odd input. Search
//! normalization and slugs share the same accent stripping (canonical
//! decomposition, then dropping the U+0300..=U+036F combining range) so a
//! query typed without accents matches data stored with them.

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Coerce a loosely-typed JSON value into trimmed text.
///
/// `None` and `null` become `""`. Strings are trimmed and booleans use their
/// JSON spelling. Whole-number floats drop the fraction (`1.0` reads as
/// `"1"`), other numbers keep their JSON spelling. Arrays are joined with
/// `", "` and objects fall back to compact JSON.
pub fn safe_text(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(value) => coerce(value).trim().to_string(),
    }
}

fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
                (float as i128).to_string()
            }
            _ => number.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| coerce(item).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&ch)
}

/// Lowercase and strip accents without touching whitespace.
pub fn fold_accents(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect()
}

/// Normalize text for substring search.
///
/// Lowercases, strips accents, collapses whitespace runs to one space and
/// trims. Idempotent.
pub fn normalize_for_search(text: &str) -> String {
    let folded = fold_accents(text);
    let mut normalized = String::with_capacity(folded.len());
    let mut seen_space = false;
    for ch in folded.chars() {
        if ch.is_whitespace() {
            if !seen_space {
                normalized.push(' ');
                seen_space = true;
            }
        } else {
            normalized.push(ch);
            seen_space = false;
        }
    }
    normalized.trim().to_string()
}

/// Keep only ASCII digits and `+` so the result is usable in a `tel:` URI.
pub fn clean_phone_for_dialing(phone: &str) -> String {
    phone
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '+')
        .collect()
}

/// Split a field holding several values (`"600 / 700; 800"`) into its parts.
///
/// Separators are runs of `/`, `,`, `;` and newlines. Parts are trimmed and
/// blanks dropped; order is preserved.
pub fn split_multi_value(raw: &str) -> Vec<String> {
    raw.split(|ch: char| matches!(ch, '/' | ',' | ';' | '\n'))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Prefix `https://` unless the URL already starts with an http(s) scheme.
pub fn normalize_web_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    });
    if has_scheme {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Escape text for HTML body or attribute context.
///
/// Each of `& < > " '` maps to its own entity in a single pass, so entities
/// produced here are never escaped twice.
pub fn escape_markup_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Lowercase ASCII identifier: accents stripped, every other run of
/// characters outside `[a-z0-9]` collapsed to `_`, no leading/trailing `_`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in fold_accents(text).chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }
    slug
}
