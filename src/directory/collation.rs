//! Spanish-aware ordering for category names.
//!
//! Comparison is multi-level: base letters first (accents ignored, `ñ` is its
//! own letter between `n` and `o`), then accents, then case (lowercase
//! first), then raw bytes as a final tie-break so ordering is total.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

const COMBINING_TILDE: char = '\u{0303}';

fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&ch)
}

/// Primary weight classes: separators sort before digits, digits before letters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Weight {
    Separator(u32),
    Digit(u32),
    Latin(u32),
    Other(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
/// Precomputed sort key; field order defines comparison priority.
pub struct CollationKey {
    primary: Vec<Weight>,
    secondary: Vec<u32>,
    tertiary: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(text: &str) -> Self {
        let mut primary = Vec::new();
        let mut secondary = Vec::new();
        let mut tertiary = Vec::new();

        let mut chars = text.nfd().peekable();
        while let Some(ch) = chars.next() {
            if is_combining_mark(ch) {
                // Stray mark with no base character.
                secondary.push(ch as u32);
                continue;
            }
            let lower = ch.to_lowercase().next().unwrap_or(ch);
            let mut tilde_n = false;
            let mut accent = 0u32;
            while let Some(mark) = chars.next_if(|next| is_combining_mark(*next)) {
                if lower == 'n' && mark == COMBINING_TILDE && !tilde_n {
                    tilde_n = true;
                } else {
                    accent += mark as u32;
                }
            }
            primary.push(primary_weight(lower, tilde_n));
            secondary.push(accent);
            tertiary.push(ch.is_uppercase());
        }

        Self {
            primary,
            secondary,
            tertiary,
            raw: text.to_string(),
        }
    }
}

fn primary_weight(lower: char, tilde_n: bool) -> Weight {
    if lower.is_ascii_lowercase() {
        // Leave a gap after each letter so `ñ` lands between `n` and `o`.
        Weight::Latin(lower as u32 * 2 + u32::from(tilde_n))
    } else if let Some(digit) = lower.to_digit(10) {
        Weight::Digit(digit)
    } else if lower.is_alphanumeric() {
        Weight::Other(lower as u32)
    } else {
        Weight::Separator(lower as u32)
    }
}

/// Compare two strings with Spanish collation rules.
pub fn compare_es(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

/// Sort in place with Spanish collation.
pub fn sort_es(values: &mut [String]) {
    values.sort_by_cached_key(|value| CollationKey::new(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_sort_by_base_letter() {
        let mut values: Vec<String> = ["Zapatería", "Óptica", "agua", "Mecánica", "Álamo", "Ñu", "Notaría"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_es(&mut values);
        assert_eq!(
            values,
            vec!["agua", "Álamo", "Mecánica", "Notaría", "Ñu", "Óptica", "Zapatería"]
        );
    }

    #[test]
    fn ties_break_on_accent_then_case() {
        assert_eq!(compare_es("a", "á"), Ordering::Less);
        assert_eq!(compare_es("a", "A"), Ordering::Less);
        assert_eq!(compare_es("Salud", "salud"), Ordering::Greater);
        assert_eq!(compare_es("Salud", "Salud"), Ordering::Equal);
    }

    #[test]
    fn separators_and_digits_sort_before_letters() {
        assert_eq!(compare_es("24 horas", "Agua"), Ordering::Less);
        assert_eq!(compare_es("Taller B", "TallerA"), Ordering::Less);
    }
}
