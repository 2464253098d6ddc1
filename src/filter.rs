//! Category and free-text filtering over a snapshot.
//!
//! Filtering never reorders: results keep snapshot order.

use crate::directory::DirectoryRecord;
use crate::text::normalize_for_search;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text form of [`CategoryFilter::All`] used by selects and CLI flags.
pub const ALL_CATEGORIES: &str = "__all__";

/// Category selection: everything, or one exact (case-sensitive) category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    /// Parse a select/flag value; `__all__` and blank mean every category.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | ALL_CATEGORIES => CategoryFilter::All,
            _ => CategoryFilter::Exact(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Exact(category) => category.as_str(),
        }
    }

    pub fn accepts(&self, record: &DirectoryRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(category) => record.category() == category,
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Records passing the category stage and containing the normalized query.
pub fn filter_records<'a>(
    snapshot: &'a [DirectoryRecord],
    category: &CategoryFilter,
    query: &str,
) -> Vec<&'a DirectoryRecord> {
    let needle = normalize_for_search(query);
    snapshot
        .iter()
        .filter(|record| category.accepts(record))
        .filter(|record| needle.is_empty() || record.matches_normalized(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::RecordFields;

    fn sample() -> Vec<DirectoryRecord> {
        [
            ("Taller B", "Mecánica", "Grúa 24h"),
            ("Clínica Norte", "Salud", "Urgencias"),
            ("Café Central", "", "Terraza"),
            ("Taller Sur", "mecánica", ""),
        ]
        .into_iter()
        .map(|(name, category, notes)| {
            DirectoryRecord::from_fields(RecordFields {
                name: name.into(),
                category: category.into(),
                notes: notes.into(),
                ..RecordFields::default()
            })
        })
        .collect()
    }

    fn names(records: &[&DirectoryRecord]) -> Vec<String> {
        records.iter().map(|r| r.name().to_string()).collect()
    }

    #[test]
    fn empty_query_and_all_returns_everything_in_order() {
        let snapshot = sample();
        let result = filter_records(&snapshot, &CategoryFilter::All, "   ");
        assert_eq!(
            names(&result),
            vec!["Taller B", "Clínica Norte", "Café Central", "Taller Sur"]
        );
    }

    #[test]
    fn category_match_is_exact_and_case_sensitive() {
        let snapshot = sample();
        let result = filter_records(&snapshot, &CategoryFilter::parse("Mecánica"), "");
        assert_eq!(names(&result), vec!["Taller B"]);
    }

    #[test]
    fn query_is_accent_and_case_insensitive() {
        let snapshot = sample();
        assert_eq!(
            names(&filter_records(&snapshot, &CategoryFilter::All, "CAFE")),
            vec!["Café Central"]
        );
        assert_eq!(
            names(&filter_records(&snapshot, &CategoryFilter::All, "clinica   norte")),
            vec!["Clínica Norte"]
        );
        assert_eq!(
            names(&filter_records(&snapshot, &CategoryFilter::All, "mecanica")),
            vec!["Taller B", "Taller Sur"]
        );
    }

    #[test]
    fn longer_queries_only_narrow_results() {
        let snapshot = sample();
        let short = names(&filter_records(&snapshot, &CategoryFilter::All, "tall"));
        let long = names(&filter_records(&snapshot, &CategoryFilter::All, "taller s"));
        assert!(long.iter().all(|name| short.contains(name)));
        assert_eq!(long, vec!["Taller Sur"]);
    }

    #[test]
    fn parse_recognizes_all_sentinels() {
        assert_eq!(CategoryFilter::parse("__all__"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" "), CategoryFilter::All);
        assert_eq!(CategoryFilter::All.as_str(), ALL_CATEGORIES);
        let parsed: CategoryFilter = serde_json::from_str("\"Salud\"").expect("parse filter");
        assert_eq!(parsed, CategoryFilter::Exact("Salud".into()));
    }

    #[test]
    fn category_literally_named_all_is_selectable() {
        let snapshot = vec![
            DirectoryRecord::from_fields(RecordFields {
                name: "Todo en uno".into(),
                category: "all".into(),
                ..RecordFields::default()
            }),
            DirectoryRecord::from_fields(RecordFields {
                name: "Clínica Norte".into(),
                category: "Salud".into(),
                ..RecordFields::default()
            }),
        ];
        let filter = CategoryFilter::parse("all");
        assert_eq!(filter, CategoryFilter::Exact("all".into()));
        assert_eq!(names(&filter_records(&snapshot, &filter, "")), vec!["Todo en uno"]);
    }
}
