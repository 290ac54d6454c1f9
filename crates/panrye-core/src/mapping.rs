//! Known case-number → sequence-number shortcut table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Built-in entries covering records the search tier is known to miss.
///
/// The upstream tables disagreed on `2023다318857`; this table carries the
/// value the conversion path used. Deployments override the whole table
/// with configuration data when corrected mappings are available.
const BUILTIN: &[(&str, &str)] = &[
    ("2005두2261", "68257"),
    ("2014다51015", "228541"),
    ("2018두42559", "204337"),
    ("2020다296604", "606191"),
    ("2024다317332", "606173"),
    ("2023다283401", "605333"),
    ("2023다318857", "606200"),
];

/// First-tier shortcut mapping from human case numbers to registry
/// sequence numbers.
///
/// Constant for the process lifetime once constructed; resolution reads it,
/// nothing writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownMapping {
    entries: HashMap<String, String>,
}

impl Default for KnownMapping {
    fn default() -> Self {
        Self::from_pairs(BUILTIN.iter().map(|&(k, v)| (k, v)))
    }
}

impl KnownMapping {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Mapped sequence number for a case number, when one is known.
    pub fn lookup(&self, case_number: &str) -> Option<&str> {
        self.entries.get(case_number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_entries_resolve() {
        let mapping = KnownMapping::default();
        assert_eq!(mapping.lookup("2018두42559"), Some("204337"));
        assert_eq!(mapping.lookup("2005두2261"), Some("68257"));
    }

    #[test]
    fn unknown_case_number_misses() {
        let mapping = KnownMapping::default();
        assert_eq!(mapping.lookup("9999두9999"), None);
        assert_eq!(mapping.lookup(""), None);
    }

    #[test]
    fn builtin_table_is_unambiguous() {
        // One entry per case number; the upstream discrepancy must not be
        // replicated here.
        let mapping = KnownMapping::default();
        assert_eq!(mapping.len(), BUILTIN.len());
        assert_eq!(mapping.lookup("2023다318857"), Some("606200"));
    }

    #[test]
    fn deserializes_from_plain_object() {
        let mapping: KnownMapping =
            serde_json::from_str(r#"{"2018두42559": "204337", "99누1992": "12345"}"#).unwrap();
        assert_eq!(mapping.lookup("99누1992"), Some("12345"));
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn empty_table_never_matches() {
        assert!(KnownMapping::empty().is_empty());
        assert_eq!(KnownMapping::empty().lookup("2018두42559"), None);
    }
}
