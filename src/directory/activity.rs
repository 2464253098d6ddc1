//! Activity filter applied to raw records before normalization.
//!
//! The rule is a closed-list positive match on the `activo` field: absent,
//! `null` or blank means active; otherwise the trimmed, lowercased text must
//! be one of the accepted values. Anything else (`"false"`, `"no"`, `"0"`,
//! an unexpected word) excludes the record.

use crate::directory::model::keys;
use crate::text::safe_text;
use serde_json::Value;
use std::collections::BTreeSet;

/// Values accepted as "active" unless configuration says otherwise.
pub const DEFAULT_ACTIVE_VALUES: &[&str] = &["true", "1", "si", "sí"];

#[derive(Clone, Debug, PartialEq, Eq)]
/// Accepted spellings of an active flag.
pub struct ActivityRule {
    accepted: BTreeSet<String>,
}

impl Default for ActivityRule {
    fn default() -> Self {
        Self::from_values(DEFAULT_ACTIVE_VALUES.iter().copied())
    }
}

impl ActivityRule {
    /// Build a rule from a configured list; values are trimmed and lowercased.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted = values
            .into_iter()
            .map(|value| value.as_ref().trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .collect();
        Self { accepted }
    }

    /// Only the literal `true` counts as active.
    pub fn strict() -> Self {
        Self::from_values(["true"])
    }

    pub fn accepted_values(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }

    /// Whether a raw record should be kept.
    pub fn is_active(&self, raw: &Value) -> bool {
        let flag = safe_text(raw.get(keys::ACTIVE)).to_lowercase();
        flag.is_empty() || self.accepted.contains(&flag)
    }
}
