//! Legacy direct-call strategy against the registry's `DRF` service.
//!
//! The service answers in an envelope named after a caller-supplied
//! callback token: `token({...})`. Tokens are one-time: each call registers
//! its token in a process-wide pending table, and the entry is removed
//! exactly once whichever way the call exits (payload delivered, deadline
//! elapsed, transport failure). Removal rides on an RAII guard rather than
//! per-path cleanup calls.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use panrye_core::{
    KnownMapping, PrecedentRecord, RegistryConfig, ResolutionFailure, ResolutionMeta,
    ResolutionOutcome, is_sequence_number, registry::SOURCE_NAME,
};
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::resolver::{ResolveStrategy, unresolved_outcome};

/// Deadline for one direct call, covering connect through body read.
pub const DIRECT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// Operator code the service expects on every request.
pub const DEFAULT_OPERATOR: &str = "bahnntf";

const TOKEN_PREFIX: &str = "lawApiCallback";
const TOKEN_SUFFIX_LEN: usize = 9;
const TOKEN_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Error, Debug)]
pub enum DirectApiError {
    #[error("direct call exceeded the {}s deadline", DIRECT_API_TIMEOUT.as_secs())]
    Timeout,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("payload is not a callback envelope or JSON object")]
    InvalidPayload,
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Pending-callback table ──

/// Process-wide table of callback tokens with a call in flight.
///
/// Shared by cloning; all clones see the same entries.
#[derive(Clone, Default)]
pub struct PendingCallbacks {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl PendingCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a unique token and register it. Collisions (same
    /// millisecond, same random suffix) regenerate until insertion wins.
    pub fn register(&self) -> CallbackGuard {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            let token = generate_token();
            if table.insert(token.clone()) {
                return CallbackGuard {
                    token,
                    table: Arc::clone(&self.inner),
                };
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(token)
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Holds one pending-table entry; dropping it removes the entry.
pub struct CallbackGuard {
    token: String,
    table: Arc<Mutex<HashSet<String>>>,
}

impl CallbackGuard {
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl Drop for CallbackGuard {
    fn drop(&mut self) {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.token);
    }
}

/// `lawApiCallback_<unix millis>_<9 random base-36 chars>`.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TOKEN_SUFFIX_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect();
    format!("{TOKEN_PREFIX}_{}_{suffix}", Utc::now().timestamp_millis())
}

// ── Payload handling ──

/// Record fields as delivered inside the callback envelope.
#[derive(Debug, Default, Deserialize)]
struct DirectPayload {
    #[serde(default, rename = "사건명")]
    case_name: String,
    #[serde(default, rename = "사건번호")]
    case_number: String,
    #[serde(default, rename = "선고일자")]
    decision_date: String,
    #[serde(default, rename = "법원명")]
    court: String,
    #[serde(default, rename = "판결유형")]
    ruling_type: String,
    #[serde(default, rename = "판시사항")]
    headnote: String,
    #[serde(default, rename = "판결요지")]
    summary: String,
    #[serde(default, rename = "참조조문")]
    cited_statutes: String,
    #[serde(default, rename = "참조판례")]
    cited_precedents: String,
    #[serde(default, rename = "판례내용")]
    full_text: String,
}

/// Strip the `token( ... )` envelope; bare JSON objects pass through.
fn unwrap_envelope<'a>(token: &str, body: &'a str) -> Result<&'a str, DirectApiError> {
    let trimmed = body.trim();
    if let Some(rest) = trimmed.strip_prefix(token) {
        let rest = rest.trim_start();
        if let Some(inner) = rest
            .strip_prefix('(')
            .map(|r| r.trim_end().trim_end_matches(';').trim_end())
            .and_then(|r| r.strip_suffix(')'))
        {
            return Ok(inner.trim());
        }
        return Err(DirectApiError::InvalidPayload);
    }
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }
    Err(DirectApiError::InvalidPayload)
}

/// Parse the unwrapped payload, requiring a JSON object.
fn parse_payload(payload: &str) -> Result<DirectPayload, DirectApiError> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    if !value.is_object() {
        return Err(DirectApiError::InvalidPayload);
    }
    Ok(serde_json::from_value(value)?)
}

fn build_record(
    sequence: &str,
    display_name: Option<&str>,
    fields: DirectPayload,
    raw: &str,
) -> PrecedentRecord {
    let case_name = match display_name {
        Some(name) => name.to_string(),
        None => fields.case_name,
    };
    let full_text = if fields.full_text.is_empty() {
        "판례 내용을 불러올 수 없습니다.".to_string()
    } else {
        fields.full_text
    };
    PrecedentRecord {
        sequence_number: sequence.to_string(),
        case_name,
        case_number: fields.case_number,
        court: fields.court,
        decision_date: fields.decision_date,
        ruling_type: fields.ruling_type,
        headnote: fields.headnote,
        summary: fields.summary,
        cited_statutes: fields.cited_statutes,
        cited_precedents: fields.cited_precedents,
        full_text,
        raw_source: Some(raw.to_string()),
    }
}

// ── Client ──

/// Direct-call client for the `DRF` precedent service.
///
/// Needs a numeric sequence number up front, so non-numeric identifiers
/// only go through the shortcut table; this strategy never falls back to
/// keyword search.
pub struct DirectApiClient {
    client: reqwest::Client,
    registry: RegistryConfig,
    mapping: KnownMapping,
    operator: String,
    pending: PendingCallbacks,
}

impl DirectApiClient {
    pub fn new(registry: RegistryConfig, mapping: KnownMapping, operator: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            registry,
            mapping,
            operator: operator.to_string(),
            pending: PendingCallbacks::new(),
        }
    }

    /// The pending table, exposed for callers that monitor in-flight calls.
    pub fn pending(&self) -> &PendingCallbacks {
        &self.pending
    }

    async fn fetch_record(
        &self,
        sequence: &str,
        display_name: Option<&str>,
    ) -> Result<PrecedentRecord, DirectApiError> {
        let guard = self.pending.register();
        let mut url = format!(
            "{}?OC={}&target=prec&ID={}&type=JSON&callback={}",
            self.registry.direct_api_endpoint(),
            self.operator,
            sequence,
            guard.token(),
        );
        if let Some(name) = display_name {
            url.push_str(&format!("&LM={}", urlencoding::encode(name)));
        }

        info!(url = %url, "calling direct precedent service");
        let request = async {
            let resp = self.client.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(DirectApiError::Server {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(resp.text().await?)
        };
        let body = match tokio::time::timeout(DIRECT_API_TIMEOUT, request).await {
            Ok(result) => result?,
            Err(_) => return Err(DirectApiError::Timeout),
        };

        let payload = unwrap_envelope(guard.token(), &body)?;
        let fields = parse_payload(payload)?;
        Ok(build_record(sequence, display_name, fields, payload))
        // guard drops here; the table entry is released on every exit path
    }

    fn failed_outcome(&self, identifier: &str, err: &DirectApiError) -> ResolutionOutcome {
        let message = match err {
            DirectApiError::Timeout => "법제처 API 호출 시간 초과".to_string(),
            DirectApiError::Transport(_) | DirectApiError::Server { .. } => {
                "법제처 API 요청에 실패했습니다".to_string()
            }
            DirectApiError::InvalidPayload | DirectApiError::Json(_) => {
                "법제처 API에서 유효하지 않은 응답을 받았습니다".to_string()
            }
        };
        ResolutionOutcome::Failure(ResolutionFailure {
            error: "법제처 API 호출 중 오류가 발생했습니다".to_string(),
            message,
            external_link: self.registry.search_link(identifier),
            suggested_action: "법제처 국가법령정보센터에서 직접 조회해보세요".to_string(),
        })
    }
}

#[async_trait]
impl ResolveStrategy for DirectApiClient {
    async fn resolve(&self, identifier: &str, display_name: Option<&str>) -> ResolutionOutcome {
        let identifier = identifier.trim();
        let sequence = if is_sequence_number(identifier) {
            Some(identifier.to_string())
        } else {
            self.mapping.lookup(identifier).map(str::to_string)
        };
        let Some(sequence) = sequence else {
            return unresolved_outcome(&self.registry, identifier);
        };

        match self.fetch_record(&sequence, display_name).await {
            Ok(record) => {
                let meta = ResolutionMeta {
                    sequence_number: sequence.clone(),
                    original_identifier: identifier.to_string(),
                    display_name: display_name.map(str::to_string),
                    source: SOURCE_NAME.to_string(),
                    direct_link: Some(self.registry.direct_link(&sequence)),
                    resolved_at: Utc::now().to_rfc3339(),
                };
                ResolutionOutcome::Success { record, meta }
            }
            Err(err) => {
                warn!(sequence = %sequence, error = %err, "direct call failed");
                self.failed_outcome(identifier, &err)
            }
        }
    }
}
