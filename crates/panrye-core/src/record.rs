//! Shared resolution types for the precedent lookup chain.

use serde::{Deserialize, Serialize};

/// A precedent record as served by the national legal-information registry.
///
/// String fields follow the registry's convention: empty means unknown.
/// The long-form sections (headnote through full text) are independently
/// optional and a record with only identity fields is still valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrecedentRecord {
    /// The registry's canonical numeric identifier for the ruling.
    pub sequence_number: String,
    /// Display title of the case.
    pub case_name: String,
    /// Human-readable docket identifier, e.g. `2018두42559`.
    pub case_number: String,
    pub court: String,
    pub decision_date: String,
    pub ruling_type: String,
    pub headnote: String,
    pub summary: String,
    pub cited_statutes: String,
    pub cited_precedents: String,
    pub full_text: String,
    /// Unprocessed payload retained for debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_source: Option<String>,
}

/// Provenance attached to a successful resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionMeta {
    /// The sequence number the record was resolved to.
    pub sequence_number: String,
    /// The identifier the caller supplied, kept for display.
    pub original_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub source: String,
    /// Registry page for the resolved record, opened rather than fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_link: Option<String>,
    /// ISO 8601 timestamp string.
    pub resolved_at: String,
}

/// Structured failure carried back to the presenter when every tier of the
/// fallback chain is exhausted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionFailure {
    /// Generic error label.
    pub error: String,
    /// Multi-line diagnostic enumerating plausible causes.
    pub message: String,
    /// Registry search URL carrying the URL-encoded original identifier.
    pub external_link: String,
    pub suggested_action: String,
}

/// Outcome of a resolution attempt.
///
/// Exactly one variant is active; there is no partial state. Resolvers
/// always return an outcome and never let errors cross their boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Success {
        record: PrecedentRecord,
        meta: ResolutionMeta,
    },
    Failure(ResolutionFailure),
}

impl ResolutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionOutcome::Success { .. })
    }

    pub fn failure(&self) -> Option<&ResolutionFailure> {
        match self {
            ResolutionOutcome::Failure(f) => Some(f),
            ResolutionOutcome::Success { .. } => None,
        }
    }

    /// The registry page to open for this outcome, when one is known.
    ///
    /// Success carries the resolved direct link, failure carries the search
    /// hint. Callers fall back to a default search URL when this is `None`
    /// or empty.
    pub fn external_link(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Success { meta, .. } => meta.direct_link.as_deref(),
            ResolutionOutcome::Failure(f) if !f.external_link.is_empty() => {
                Some(f.external_link.as_str())
            }
            ResolutionOutcome::Failure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meta() -> ResolutionMeta {
        ResolutionMeta {
            sequence_number: "204337".into(),
            original_identifier: "2018두42559".into(),
            display_name: None,
            source: "law.go.kr".into(),
            direct_link: Some("https://www.law.go.kr/precSc.do?precSeq=204337".into()),
            resolved_at: "2026-08-06T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn outcome_json_roundtrip() {
        let outcome = ResolutionOutcome::Success {
            record: PrecedentRecord {
                sequence_number: "204337".into(),
                case_number: "2018두42559".into(),
                ..Default::default()
            },
            meta: sample_meta(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: ResolutionOutcome = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_success());
        assert_eq!(
            parsed.external_link(),
            Some("https://www.law.go.kr/precSc.do?precSeq=204337")
        );
    }

    #[test]
    fn failure_json_carries_tag() {
        let outcome = ResolutionOutcome::Failure(ResolutionFailure {
            error: "lookup failed".into(),
            message: "no match".into(),
            external_link: "https://www.law.go.kr/precSc.do?query=x".into(),
            suggested_action: "search the registry directly".into(),
        });
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains(r#""outcome":"failure""#));
        let parsed: ResolutionOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.failure().unwrap().message, "no match");
    }

    #[test]
    fn empty_failure_link_is_none() {
        let outcome = ResolutionOutcome::Failure(ResolutionFailure {
            error: String::new(),
            message: String::new(),
            external_link: String::new(),
            suggested_action: String::new(),
        });
        assert_eq!(outcome.external_link(), None);
    }
}
