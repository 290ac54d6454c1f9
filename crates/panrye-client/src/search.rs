//! Keyword search client for the external precedent search service.
//!
//! The service returns candidate records under `precedentList`, keyed in
//! Korean as served by the registry. Identifier fields arrive as JSON
//! strings or numbers, and some candidates carry their fields only inside
//! the nested raw-data object, so every accessor probes both levels.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_SEARCH_ENDPOINT: &str =
    "https://wouwaifqgzlwnkvpnndg.supabase.co/functions/v1/advanced-precedent-search";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The search seam: the resolver talks to whatever implements this.
#[async_trait]
pub trait KeywordSearch: Send + Sync {
    /// Search candidate precedent records by keyword, bounded by `limit`.
    async fn search(&self, keyword: &str, limit: u32) -> Result<Vec<SearchCandidate>, SearchError>;
}

/// HTTP client for the keyword search endpoint.
pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
}

impl SearchClient {
    /// Create a client for the given endpoint URL (no trailing slash).
    pub fn new(endpoint: String, bearer_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    pub async fn search(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        let url = format!(
            "{}?keyword={}&display={}&type=JSON",
            self.endpoint,
            urlencoding::encode(keyword),
            limit
        );

        info!(url = %url, "searching precedents by keyword");
        let mut request = self.client.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        info!(count = parsed.precedent_list.len(), "search returned candidates");
        Ok(parsed.precedent_list)
    }
}

#[async_trait]
impl KeywordSearch for SearchClient {
    async fn search(&self, keyword: &str, limit: u32) -> Result<Vec<SearchCandidate>, SearchError> {
        SearchClient::search(self, keyword, limit).await
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default, rename = "precedentList")]
    precedent_list: Vec<SearchCandidate>,
}

/// One candidate record from the search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchCandidate {
    #[serde(default, rename = "사건번호", deserialize_with = "de_opt_id")]
    case_number: Option<String>,
    #[serde(default, rename = "판례정보일련번호", deserialize_with = "de_opt_id")]
    info_serial: Option<String>,
    #[serde(default, rename = "판례일련번호", deserialize_with = "de_opt_id")]
    serial: Option<String>,
    #[serde(default, rename = "원본데이터")]
    raw_data: Option<RawCandidate>,
}

/// Fields some candidates only expose under the raw-data key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidate {
    #[serde(default, rename = "사건번호", deserialize_with = "de_opt_id")]
    case_number: Option<String>,
    #[serde(default, rename = "판례일련번호", deserialize_with = "de_opt_id")]
    serial: Option<String>,
    #[serde(default, rename = "판례정보일련번호", deserialize_with = "de_opt_id")]
    info_serial: Option<String>,
}

impl SearchCandidate {
    /// Case number, falling back to the nested raw-data key.
    pub fn case_number(&self) -> Option<&str> {
        self.case_number
            .as_deref()
            .or_else(|| self.raw_data.as_ref().and_then(|r| r.case_number.as_deref()))
    }

    /// Possible sequence-number fields, most specific first.
    pub fn sequence_candidates(&self) -> impl Iterator<Item = &str> {
        [
            self.info_serial.as_deref(),
            self.serial.as_deref(),
            self.raw_data.as_ref().and_then(|r| r.serial.as_deref()),
            self.raw_data.as_ref().and_then(|r| r.info_serial.as_deref()),
        ]
        .into_iter()
        .flatten()
    }
}

/// Accept identifier fields as JSON strings or numbers; empty strings and
/// other shapes count as absent.
fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(json: serde_json::Value) -> SearchCandidate {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn response_parses_korean_keys() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"precedentList": [
                {"사건번호": "2018두42559", "판례정보일련번호": "204337"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(parsed.precedent_list.len(), 1);
        assert_eq!(parsed.precedent_list[0].case_number(), Some("2018두42559"));
    }

    #[test]
    fn missing_list_parses_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.precedent_list.is_empty());
    }

    #[test]
    fn numeric_id_fields_become_strings() {
        let cand = candidate(serde_json::json!({
            "사건번호": "2018두42559",
            "판례일련번호": 204337
        }));
        assert_eq!(cand.sequence_candidates().collect::<Vec<_>>(), ["204337"]);
    }

    #[test]
    fn case_number_falls_back_to_raw_data() {
        let cand = candidate(serde_json::json!({
            "원본데이터": {"사건번호": "2018두42559", "판례일련번호": "204337"}
        }));
        assert_eq!(cand.case_number(), Some("2018두42559"));
        assert_eq!(cand.sequence_candidates().collect::<Vec<_>>(), ["204337"]);
    }

    #[test]
    fn sequence_candidates_most_specific_first() {
        let cand = candidate(serde_json::json!({
            "판례정보일련번호": "111",
            "판례일련번호": "222",
            "원본데이터": {"판례일련번호": "333", "판례정보일련번호": "444"}
        }));
        assert_eq!(
            cand.sequence_candidates().collect::<Vec<_>>(),
            ["111", "222", "333", "444"]
        );
    }

    #[test]
    fn empty_string_ids_are_absent() {
        let cand = candidate(serde_json::json!({
            "판례정보일련번호": "",
            "판례일련번호": "222"
        }));
        assert_eq!(cand.sequence_candidates().collect::<Vec<_>>(), ["222"]);
    }

    #[test]
    fn unexpected_shapes_are_absent() {
        let cand = candidate(serde_json::json!({
            "판례정보일련번호": {"nested": true},
            "사건번호": null
        }));
        assert_eq!(cand.case_number(), None);
        assert_eq!(cand.sequence_candidates().count(), 0);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = SearchClient::new("https://search.test/fn/".into(), None);
        assert_eq!(client.endpoint, "https://search.test/fn");
    }
}
