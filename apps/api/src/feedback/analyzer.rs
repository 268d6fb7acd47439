//! Feedback analyzers: candidate-facing reports for one stage or the whole interview.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::feedback::prompts::{
    ANALYSIS_USER_TEMPLATE, HR_ANALYZER_SYSTEM, MANAGER_ANALYZER_SYSTEM, OVERALL_ANALYZER_SYSTEM,
    PHONE_ANALYZER_SYSTEM, WHITEBOARD_ANALYZER_SYSTEM,
};
use crate::interview::context::{render_company, render_resume};
use crate::interview::stage::Stage;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{complete_json, ChatModel, ChatRequest, Message};

const ANALYSIS_TEMPERATURE: f32 = 0.7;

/// What an analysis covers: a single stage or the whole interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTarget {
    Stage(Stage),
    Overall,
}

impl AnalysisTarget {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_lowercase().as_str() {
            "overall" => Ok(AnalysisTarget::Overall),
            other => Stage::parse(other)
                .map(AnalysisTarget::Stage)
                .ok_or_else(|| AppError::Validation(format!("Unknown stage: {raw}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisTarget::Stage(stage) => stage.as_str(),
            AnalysisTarget::Overall => "overall",
        }
    }

    /// Stored in `feedback_reports.report_type`.
    pub fn report_type(&self) -> &'static str {
        match self {
            AnalysisTarget::Stage(_) => "single",
            AnalysisTarget::Overall => "overall",
        }
    }
}

/// Output of the overall analyzer together with its extracted score.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallReport {
    pub content: Value,
    pub total_score: i32,
}

pub fn analyzer_prompt(stage: Stage) -> &'static str {
    match stage {
        Stage::Phone => PHONE_ANALYZER_SYSTEM,
        Stage::Whiteboard => WHITEBOARD_ANALYZER_SYSTEM,
        Stage::Manager => MANAGER_ANALYZER_SYSTEM,
        Stage::Hr => HR_ANALYZER_SYSTEM,
    }
}

fn build_request(system: &str, transcript: String, resume: &Value, company: &str) -> ChatRequest {
    let user = ANALYSIS_USER_TEMPLATE
        .replace("{resume}", &render_resume(resume))
        .replace("{company}", &render_company(company))
        .replace("{transcript}", &transcript);

    ChatRequest::new(vec![
        Message::system(format!("{system}\n\n{JSON_ONLY_INSTRUCTION}")),
        Message::user(user),
    ])
    .with_temperature(ANALYSIS_TEMPERATURE)
    .json()
}

async fn run(model: &dyn ChatModel, request: ChatRequest, label: &str) -> Result<Value, AppError> {
    let content: Value = complete_json(model, &request)
        .await
        .map_err(|e| AppError::Llm(format!("{label} analysis failed: {e}")))?;

    if !content.is_object() {
        return Err(AppError::Llm(format!(
            "{label} analysis did not return a JSON object"
        )));
    }
    Ok(content)
}

/// Analyzes one stage's transcript.
pub async fn analyze_stage(
    model: &dyn ChatModel,
    stage: Stage,
    history: &[Message],
    resume: &Value,
    company: &str,
) -> Result<Value, AppError> {
    let transcript = serde_json::to_string(history).map_err(anyhow::Error::from)?;
    let request = build_request(analyzer_prompt(stage), transcript, resume, company);

    info!("Analyzing {} ({} messages)", stage.label(), history.len());
    run(model, request, stage.as_str()).await
}

/// Analyzes every archived stage at once and extracts the 0-100 total score.
pub async fn analyze_overall(
    model: &dyn ChatModel,
    transcripts: &BTreeMap<Stage, Vec<Message>>,
    resume: &Value,
    company: &str,
) -> Result<OverallReport, AppError> {
    let transcript = serde_json::to_string(transcripts).map_err(anyhow::Error::from)?;
    let request = build_request(OVERALL_ANALYZER_SYSTEM, transcript, resume, company);

    info!("Running overall analysis over {} stages", transcripts.len());
    let content = run(model, request, "overall").await?;
    let total_score = total_score(&content);
    Ok(OverallReport {
        content,
        total_score,
    })
}

/// `total_score` clamped to 0..=100; missing or non-numeric scores count as 0.
pub fn total_score(content: &Value) -> i32 {
    content
        .get("total_score")
        .and_then(|v| v.as_f64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok())))
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as i32)
        .unwrap_or(0)
}
