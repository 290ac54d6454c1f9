//! Registry endpoints and link construction.
//!
//! The national legal-information registry is consumed through URLs only:
//! a per-record page that is opened (never fetched), a search page used as
//! the fallback destination, and the legacy `DRF` service endpoint used by
//! the direct-call strategy.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.law.go.kr";
pub const DEFAULT_LEGACY_BASE_URL: &str = "http://www.law.go.kr";

/// Name recorded as the data source in resolution metadata.
pub const SOURCE_NAME: &str = "law.go.kr";

/// Registry locations.
///
/// `base_url` serves the public precedent pages; `legacy_base_url` serves
/// the `DRF` API, which is only reachable over the older scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_base", deserialize_with = "de_trimmed")]
    pub base_url: String,
    #[serde(default = "default_legacy_base", deserialize_with = "de_trimmed")]
    pub legacy_base_url: String,
}

fn default_base() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_legacy_base() -> String {
    DEFAULT_LEGACY_BASE_URL.to_string()
}

fn de_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim_end_matches('/').to_string())
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_LEGACY_BASE_URL)
    }
}

impl RegistryConfig {
    /// Create a config for the given bases. Trailing slashes are trimmed.
    pub fn new(base_url: &str, legacy_base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            legacy_base_url: legacy_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Page for a resolved record: `<base>/precSc.do?precSeq=<seq>`.
    pub fn direct_link(&self, sequence_number: &str) -> String {
        format!("{}/precSc.do?precSeq={}", self.base_url, sequence_number)
    }

    /// Search page pre-filled with the identifier, used when resolution
    /// fails or no direct link is known.
    pub fn search_link(&self, identifier: &str) -> String {
        format!(
            "{}/precSc.do?menuId=1&subMenuId=25&tabMenuId=117&query={}",
            self.base_url,
            urlencoding::encode(identifier)
        )
    }

    /// Legacy `DRF` service endpoint consumed by the direct-call strategy.
    pub fn direct_api_endpoint(&self) -> String {
        format!("{}/DRF/lawService.do", self.legacy_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_link_exact_value() {
        let registry = RegistryConfig::default();
        assert_eq!(
            registry.direct_link("204337"),
            "https://www.law.go.kr/precSc.do?precSeq=204337"
        );
    }

    #[test]
    fn search_link_encodes_identifier() {
        let registry = RegistryConfig::default();
        let link = registry.search_link("2018두42559");
        assert!(link.starts_with(
            "https://www.law.go.kr/precSc.do?menuId=1&subMenuId=25&tabMenuId=117&query="
        ));
        assert!(link.ends_with("query=2018%EB%91%9042559"));
    }

    #[test]
    fn search_link_passes_ascii_through() {
        let registry = RegistryConfig::default();
        assert!(
            registry
                .search_link("zz-not-a-case")
                .ends_with("query=zz-not-a-case")
        );
    }

    #[test]
    fn bases_trim_trailing_slash() {
        let registry = RegistryConfig::new("https://example.test/", "http://example.test/");
        assert_eq!(registry.direct_link("1"), "https://example.test/precSc.do?precSeq=1");
        assert_eq!(
            registry.direct_api_endpoint(),
            "http://example.test/DRF/lawService.do"
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let registry: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(registry.base_url, DEFAULT_BASE_URL);

        let registry: RegistryConfig =
            serde_json::from_str(r#"{"base_url": "https://mirror.test/"}"#).unwrap();
        assert_eq!(registry.base_url, "https://mirror.test");
        assert_eq!(registry.legacy_base_url, DEFAULT_LEGACY_BASE_URL);
    }
}
