//! Widget lifecycle: open/close transitions, fetch triggering, and
//! stale-result rejection.

use panrye_core::{RegistryConfig, ResolutionOutcome};

/// View state driving the presenter.
///
/// `Idle → Loading → Ready(outcome)`; retry returns to `Loading`. `Ready`
/// holds the outcome union, so the failure and success views both key off
/// the one variant.
#[derive(Debug, Clone)]
pub enum RequestState {
    Idle,
    Loading,
    Ready(ResolutionOutcome),
}

/// A fetch authorization handed to the driver.
///
/// Carries the generation the finished outcome must present to be applied.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub generation: u64,
    pub identifier: String,
    pub display_name: Option<String>,
}

/// Destination for the "open external" action. The widget itself never
/// opens anything.
pub trait UrlOpener {
    fn open_url(&self, url: &str);
}

/// One precedent lookup widget instance.
///
/// Owns its state exclusively. A widget is constructed per identifier, so
/// `Idle` is entered exactly once; closing keeps the resolved state and
/// only retry clears it.
pub struct PrecedentWidget {
    identifier: String,
    display_name: Option<String>,
    registry: RegistryConfig,
    open: bool,
    state: RequestState,
    generation: u64,
}

impl PrecedentWidget {
    pub fn new(identifier: &str, display_name: Option<&str>, registry: RegistryConfig) -> Self {
        Self {
            identifier: identifier.to_string(),
            display_name: display_name.map(str::to_string),
            registry,
            open: false,
            state: RequestState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the widget. A fetch starts only when nothing is cached and
    /// nothing is in flight; reopening over cached state renders as-is.
    pub fn handle_open(&mut self) -> Option<FetchTicket> {
        self.open = true;
        match self.state {
            RequestState::Idle => Some(self.begin_fetch()),
            RequestState::Loading | RequestState::Ready(_) => None,
        }
    }

    /// Close the dialog; resolved state is kept for the next open.
    pub fn handle_close(&mut self) {
        self.open = false;
    }

    /// Clear prior state and fetch again with the original identifier.
    pub fn retry(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = RequestState::Loading;
        FetchTicket {
            generation: self.generation,
            identifier: self.identifier.clone(),
            display_name: self.display_name.clone(),
        }
    }

    /// Apply a finished resolution. Outcomes from a superseded fetch are
    /// discarded. Returns whether the state changed.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: ResolutionOutcome) -> bool {
        if ticket.generation != self.generation || ticket.identifier != self.identifier {
            return false;
        }
        self.state = RequestState::Ready(outcome);
        true
    }

    /// URL for the "open external" action: the outcome's link when one is
    /// known, else the registry search pre-filled with the identifier.
    pub fn external_url(&self) -> String {
        if let RequestState::Ready(outcome) = &self.state
            && let Some(url) = outcome.external_link()
        {
            return url.to_string();
        }
        self.registry.search_link(&self.identifier)
    }

    pub fn open_external(&self, opener: &dyn UrlOpener) {
        opener.open_url(&self.external_url());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panrye_core::{PrecedentRecord, ResolutionFailure, ResolutionMeta};

    fn widget(identifier: &str) -> PrecedentWidget {
        PrecedentWidget::new(identifier, None, RegistryConfig::default())
    }

    fn success(sequence: &str, direct_link: Option<&str>) -> ResolutionOutcome {
        ResolutionOutcome::Success {
            record: PrecedentRecord {
                sequence_number: sequence.to_string(),
                ..Default::default()
            },
            meta: ResolutionMeta {
                sequence_number: sequence.to_string(),
                original_identifier: sequence.to_string(),
                display_name: None,
                source: "law.go.kr".into(),
                direct_link: direct_link.map(str::to_string),
                resolved_at: "2026-08-06T00:00:00+00:00".into(),
            },
        }
    }

    fn failure(external_link: &str) -> ResolutionOutcome {
        ResolutionOutcome::Failure(ResolutionFailure {
            error: "조회 실패".into(),
            message: "원인 불명".into(),
            external_link: external_link.to_string(),
            suggested_action: "직접 조회해보세요".into(),
        })
    }

    #[test]
    fn open_triggers_exactly_one_fetch() {
        let mut w = widget("2018두42559");
        let ticket = w.handle_open().expect("first open fetches");
        assert_eq!(ticket.generation, 1);
        assert!(matches!(w.state(), RequestState::Loading));
        // A second open while loading does not stack another fetch.
        assert!(w.handle_open().is_none());
    }

    #[test]
    fn reopen_with_cached_state_does_not_refetch() {
        let mut w = widget("204337");
        let ticket = w.handle_open().unwrap();
        assert!(w.apply(&ticket, success("204337", None)));
        w.handle_close();
        assert!(matches!(w.state(), RequestState::Ready(_)));
        assert!(w.handle_open().is_none());
    }

    #[test]
    fn retry_clears_prior_state() {
        let mut w = widget("204337");
        let ticket = w.handle_open().unwrap();
        w.apply(&ticket, failure("https://example.test/search"));
        let retry = w.retry();
        assert!(matches!(w.state(), RequestState::Loading));
        assert_eq!(retry.generation, 2);
        assert_eq!(retry.identifier, "204337");
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let mut w = widget("204337");
        let first = w.handle_open().unwrap();
        let second = w.retry();
        // The superseded fetch completes late.
        assert!(!w.apply(&first, failure("https://stale.test")));
        assert!(matches!(w.state(), RequestState::Loading));
        assert!(w.apply(&second, success("204337", None)));
        assert!(matches!(w.state(), RequestState::Ready(_)));
    }

    #[test]
    fn external_url_prefers_direct_link() {
        let mut w = widget("204337");
        let ticket = w.handle_open().unwrap();
        w.apply(
            &ticket,
            success("204337", Some("https://www.law.go.kr/precSc.do?precSeq=204337")),
        );
        assert_eq!(
            w.external_url(),
            "https://www.law.go.kr/precSc.do?precSeq=204337"
        );
    }

    #[test]
    fn external_url_uses_failure_hint() {
        let mut w = widget("zz-not-a-case");
        let ticket = w.handle_open().unwrap();
        w.apply(&ticket, failure("https://example.test/search?query=zz"));
        assert_eq!(w.external_url(), "https://example.test/search?query=zz");
    }

    #[test]
    fn external_url_falls_back_to_default_search() {
        let mut w = widget("2018두42559");
        // No outcome yet: default search link built from the identifier.
        assert!(w.external_url().ends_with("query=2018%EB%91%9042559"));

        // Success without a direct link falls back the same way.
        let ticket = w.handle_open().unwrap();
        w.apply(&ticket, success("204337", None));
        assert!(w.external_url().contains("query=2018%EB%91%9042559"));
    }

    #[test]
    fn open_external_goes_through_the_contract() {
        use std::cell::RefCell;

        struct Recorder(RefCell<Vec<String>>);
        impl UrlOpener for Recorder {
            fn open_url(&self, url: &str) {
                self.0.borrow_mut().push(url.to_string());
            }
        }

        let w = widget("204337");
        let recorder = Recorder(RefCell::new(Vec::new()));
        w.open_external(&recorder);
        assert_eq!(recorder.0.borrow().len(), 1);
        assert!(recorder.0.borrow()[0].contains("query=204337"));
    }

    #[test]
    fn close_keeps_open_flag_only() {
        let mut w = widget("204337");
        let ticket = w.handle_open().unwrap();
        assert!(w.is_open());
        w.apply(&ticket, success("204337", None));
        w.handle_close();
        assert!(!w.is_open());
        assert!(matches!(w.state(), RequestState::Ready(_)));
    }
}
