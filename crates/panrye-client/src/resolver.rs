//! Ordered fallback chain from case identifier to precedent record.
//!
//! First success wins: numeric identifiers resolve immediately, known case
//! numbers go through the static shortcut table, everything else is pushed
//! through the keyword search tier. The registry's record pages cannot be
//! fetched directly, so a successful resolution carries templated guidance
//! plus the direct link rather than the ruling text itself.

use async_trait::async_trait;
use chrono::Utc;
use panrye_core::{
    KnownMapping, PrecedentRecord, RegistryConfig, ResolutionFailure, ResolutionMeta,
    ResolutionOutcome, is_sequence_number, looks_like_case_number, registry::SOURCE_NAME,
};
use tracing::{info, warn};

use crate::search::{KeywordSearch, SearchClient, SearchError};

/// Bounded result count requested from the keyword search tier.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// A resolution mechanism producing the shared outcome contract.
///
/// The fallback chain and the legacy direct-call path both implement this;
/// callers pick a strategy without caring which tiers run underneath. An
/// implementation never returns `Err`; failures are data.
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    async fn resolve(&self, identifier: &str, display_name: Option<&str>) -> ResolutionOutcome;
}

/// The primary resolver.
pub struct Resolver<S = SearchClient> {
    search: S,
    mapping: KnownMapping,
    registry: RegistryConfig,
    search_limit: u32,
}

impl<S: KeywordSearch> Resolver<S> {
    pub fn new(search: S, mapping: KnownMapping, registry: RegistryConfig) -> Self {
        Self {
            search,
            mapping,
            registry,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit;
        self
    }

    /// Resolve an identifier to an outcome. Never fails past this boundary.
    pub async fn resolve(
        &self,
        identifier: &str,
        display_name: Option<&str>,
    ) -> ResolutionOutcome {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            warn!("resolution requested without an identifier");
            return unresolved_outcome(&self.registry, identifier);
        }

        if is_sequence_number(identifier) {
            return self.resolve_with_sequence(identifier, identifier, display_name);
        }

        if let Some(sequence) = self.mapping.lookup(identifier) {
            info!(case_number = %identifier, sequence = %sequence, "known mapping hit");
            return self.resolve_with_sequence(sequence, identifier, display_name);
        }

        if !looks_like_case_number(identifier) {
            warn!(identifier = %identifier, "identifier matches neither known form");
        }

        match self.search_sequence(identifier).await {
            Ok(Some(sequence)) => self.resolve_with_sequence(&sequence, identifier, display_name),
            Ok(None) => {
                info!(case_number = %identifier, "keyword search found no exact match");
                unresolved_outcome(&self.registry, identifier)
            }
            Err(err) => {
                // Search failures are demoted to unresolved; the outcome
                // still carries the external fallback link.
                warn!(error = %err, "keyword search failed");
                unresolved_outcome(&self.registry, identifier)
            }
        }
    }

    /// Scan search candidates for an exact case-number match and probe its
    /// id fields for a usable sequence number. First match wins.
    async fn search_sequence(&self, case_number: &str) -> Result<Option<String>, SearchError> {
        let candidates = self.search.search(case_number, self.search_limit).await?;
        for candidate in &candidates {
            if candidate.case_number() != Some(case_number) {
                continue;
            }
            if let Some(sequence) = candidate
                .sequence_candidates()
                .find(|id| is_sequence_number(id))
            {
                info!(case_number = %case_number, sequence = %sequence, "resolved via keyword search");
                return Ok(Some(sequence.to_string()));
            }
        }
        Ok(None)
    }

    /// Terminal construction step for an already-resolved sequence number.
    ///
    /// `original` stays what the caller typed; a search- or mapping-resolved
    /// sequence arrives here as its own parameter.
    fn resolve_with_sequence(
        &self,
        sequence: &str,
        original: &str,
        display_name: Option<&str>,
    ) -> ResolutionOutcome {
        let direct_link = self.registry.direct_link(sequence);
        let case_name = display_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("사건번호: {original}"));

        let full_text = format!(
            "⚖️ 판례 정보\n\n\
             • 판례일련번호: {sequence}\n\
             • 사건번호: {original}\n\
             • 사건명: {name}\n\n\
             📋 안내사항\n\n\
             법제처 API의 기술적 제약으로 인해 판례 전문을 직접 표시할 수 없습니다.\n\
             \"법제처에서 보기\"를 선택하시면 법제처 국가법령정보센터에서\n\
             해당 판례의 전체 내용을 확인하실 수 있습니다.\n\n\
             🔗 직접 링크\n{direct_link}",
            name = display_name.unwrap_or("")
        );

        let record = PrecedentRecord {
            sequence_number: sequence.to_string(),
            case_name,
            case_number: original.to_string(),
            headnote: "판례 상세 내용은 법제처 국가법령정보센터에서 확인하실 수 있습니다."
                .to_string(),
            summary: "\"법제처에서 보기\"를 통해 전체 판례 내용을 확인해보세요.".to_string(),
            full_text,
            ..Default::default()
        };
        let meta = ResolutionMeta {
            sequence_number: sequence.to_string(),
            original_identifier: original.to_string(),
            display_name: display_name.map(str::to_string),
            source: SOURCE_NAME.to_string(),
            direct_link: Some(direct_link),
            resolved_at: Utc::now().to_rfc3339(),
        };
        ResolutionOutcome::Success { record, meta }
    }
}

#[async_trait]
impl<S: KeywordSearch> ResolveStrategy for Resolver<S> {
    async fn resolve(&self, identifier: &str, display_name: Option<&str>) -> ResolutionOutcome {
        Resolver::resolve(self, identifier, display_name).await
    }
}

/// Failure outcome for an identifier no tier could resolve.
pub(crate) fn unresolved_outcome(registry: &RegistryConfig, identifier: &str) -> ResolutionOutcome {
    ResolutionOutcome::Failure(ResolutionFailure {
        error: "판례 상세 조회 중 오류가 발생했습니다".to_string(),
        message: format!(
            "해당 사건번호({identifier})에 대한 판례를 찾을 수 없습니다.\n\n\
             가능한 원인:\n\
             • 사건번호가 정확하지 않을 수 있습니다\n\
             • 해당 판례가 아직 법제처 데이터베이스에 등록되지 않았을 수 있습니다\n\
             • 대법원 판례가 아닌 경우 검색되지 않을 수 있습니다\n\n\
             법제처 국가법령정보센터에서 직접 검색해보시기 바랍니다."
        ),
        external_link: registry.search_link(identifier),
        suggested_action: "법제처 국가법령정보센터에서 직접 조회해보세요".to_string(),
    })
}
