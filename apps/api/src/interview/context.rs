//! Session context assembly: everything an interviewer sees for one turn.

use serde_json::Value;

use crate::interview::prompts::{NO_COMPANY, NO_HANDOFFS, NO_RESUME};
use crate::interview::stage::Stage;
use crate::llm_client::{Message, Role};
use crate::models::session::InterviewSessionRow;

/// A handoff note written by an earlier stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousSummary {
    pub stage: Stage,
    pub note: Value,
}

/// Snapshot of session state handed to the turn engine.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub current_stage: Stage,
    pub resume: Value,
    pub company_info: String,
    pub history: Vec<Message>,
    pub previous_summaries: Vec<PreviousSummary>,
}

impl SessionContext {
    pub fn from_session(session: &InterviewSessionRow) -> Self {
        let current_stage = session.current();
        Self {
            current_stage,
            resume: session.resume_snapshot.clone(),
            company_info: session.company_snapshot.clone(),
            history: session.history.0.clone(),
            previous_summaries: collect_previous_summaries(session, current_stage),
        }
    }

    /// True once the interviewer has said anything in this stage.
    pub fn has_ai_spoken(&self) -> bool {
        self.history.iter().any(|m| m.role == Role::Assistant)
    }
}

/// Handoff notes of every stage ordered before `current`, in stage order.
pub fn collect_previous_summaries(
    session: &InterviewSessionRow,
    current: Stage,
) -> Vec<PreviousSummary> {
    Stage::ALL
        .iter()
        .filter(|s| s.order() < current.order())
        .filter_map(|s| {
            session.summary_for(*s).map(|note| PreviousSummary {
                stage: *s,
                note: note.clone(),
            })
        })
        .collect()
}

/// Renders the resume snapshot for a prompt: structured JSON is pretty-printed,
/// plain strings pass through.
pub fn render_resume(resume: &Value) -> String {
    match resume {
        Value::Null => NO_RESUME.to_string(),
        Value::String(s) if s.trim().is_empty() => NO_RESUME.to_string(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Renders the company snapshot. Briefs stored as a JSON object with a
/// `summary` field use that field.
pub fn render_company(company: &str) -> String {
    let trimmed = company.trim();
    if trimmed.is_empty() {
        return NO_COMPANY.to_string();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("summary") {
            Some(Value::String(summary)) => summary.clone(),
            Some(other) => other.to_string(),
            None => serde_json::to_string_pretty(&Value::Object(map))
                .unwrap_or_else(|_| trimmed.to_string()),
        },
        _ => company.to_string(),
    }
}

/// Renders earlier handoff notes as labelled JSON blocks.
pub fn render_handoffs(summaries: &[PreviousSummary]) -> String {
    if summaries.is_empty() {
        return NO_HANDOFFS.to_string();
    }
    summaries
        .iter()
        .map(|s| {
            let body =
                serde_json::to_string_pretty(&s.note).unwrap_or_else(|_| s.note.to_string());
            format!("### {}\n{}", s.stage.label(), body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
