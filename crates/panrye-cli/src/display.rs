//! Plain-text views for the widget states.
//!
//! Renders to a `String` so the view rules stay testable; the binary
//! prints the result. Badges and content sections are skipped whenever the
//! record has nothing for them.

use panrye_core::{PrecedentRecord, ResolutionFailure, ResolutionMeta, ResolutionOutcome};

use crate::widget::RequestState;

// ── Card section labels ──

const SECTION_HEADNOTE: &str = "📋 판시사항";
const SECTION_SUMMARY: &str = "⚖️ 판결요지";
const SECTION_STATUTES: &str = "📖 참조조문";
const SECTION_PRECEDENTS: &str = "🔗 참조판례";
const SECTION_FULL_TEXT: &str = "📄 판례 전문";

/// Render the view for the current widget state. `Idle` renders nothing.
pub fn render_state(state: &RequestState) -> String {
    match state {
        RequestState::Idle => String::new(),
        RequestState::Loading => render_loading(),
        RequestState::Ready(outcome) => render_outcome(outcome),
    }
}

pub fn render_outcome(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::Success { record, meta } => render_card(record, meta),
        ResolutionOutcome::Failure(failure) => render_failure(failure),
    }
}

fn render_loading() -> String {
    "판례 내용을 불러오는 중...\n잠시만 기다려주세요\n".to_string()
}

// ── Failure view ──

fn render_failure(failure: &ResolutionFailure) -> String {
    let mut out = String::new();
    out.push_str("오류: ");
    out.push_str(&failure.error);
    out.push('\n');
    if !failure.message.is_empty() {
        out.push('\n');
        out.push_str(&failure.message);
        out.push('\n');
    }
    if !failure.suggested_action.is_empty() {
        out.push('\n');
        out.push_str("💡 ");
        out.push_str(&failure.suggested_action);
        out.push('\n');
    }
    out.push_str("\n[다시 시도]  [법제처에서 보기]\n");
    out
}

// ── Success card ──

fn render_card(record: &PrecedentRecord, meta: &ResolutionMeta) -> String {
    let mut out = String::new();

    let title = if record.case_name.is_empty() {
        "사건명 없음"
    } else {
        &record.case_name
    };
    out.push_str(&format!("=== {} ===\n", title));

    let badges: Vec<&str> = [
        record.court.as_str(),
        record.decision_date.as_str(),
        record.case_number.as_str(),
        record.ruling_type.as_str(),
    ]
    .into_iter()
    .filter(|v| !v.is_empty())
    .collect();
    if !badges.is_empty() {
        out.push_str(&format!("[{}]\n", badges.join("] [")));
    }
    out.push('\n');

    push_section(&mut out, SECTION_HEADNOTE, &record.headnote);
    push_section(&mut out, SECTION_SUMMARY, &record.summary);
    push_section(&mut out, SECTION_STATUTES, &record.cited_statutes);
    push_section(&mut out, SECTION_PRECEDENTS, &record.cited_precedents);
    push_section(&mut out, SECTION_FULL_TEXT, &record.full_text);

    out.push_str("💡 법제처 국가법령정보센터에서 제공하는 정보입니다.\n");
    if let Some(link) = &meta.direct_link {
        out.push_str(&format!("법제처에서 원문 보기: {link}\n"));
    }
    out
}

/// Append a labeled content section, skipping empty ones.
fn push_section(out: &mut String, label: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    out.push_str(label);
    out.push('\n');
    for line in body.lines() {
        out.push_str("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push('\n');
}
