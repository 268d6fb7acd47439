use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::analyzer::{analyze_overall, analyze_stage, AnalysisTarget};
use crate::feedback::reports::{insert_report, list_reports};
use crate::interview::stage::Stage;
use crate::interview::store::{fetch_session, latest_stage_record, session_records};
use crate::models::session::FeedbackReportRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub session_id: Uuid,
    /// phone | whiteboard | manager | hr | overall
    pub stage: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub report_id: i64,
    pub content: Value,
    pub score: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    pub user_id: String,
    pub session_id: Option<Uuid>,
}

/// POST /interview/analyze
///
/// Runs the analyzer for one stage (archived transcript, else live history) or
/// for the whole interview, and stores the result as a feedback report.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let target = AnalysisTarget::parse(&req.stage)?;
    let session = fetch_session(&state.db, req.session_id).await?;
    let llm = state.llm.as_ref();

    let (content, score) = match target {
        AnalysisTarget::Stage(stage) => {
            let history = match latest_stage_record(&state.db, req.session_id, stage).await? {
                Some(record) => record.content.0,
                None => session.history.0.clone(),
            };
            let content = analyze_stage(
                llm,
                stage,
                &history,
                &session.resume_snapshot,
                &session.company_snapshot,
            )
            .await?;
            (content, None)
        }
        AnalysisTarget::Overall => {
            let mut transcripts: BTreeMap<Stage, _> = BTreeMap::new();
            // Ascending by creation, so a re-saved stage keeps its latest transcript.
            for record in session_records(&state.db, req.session_id).await? {
                if let Some(stage) = Stage::parse(&record.stage) {
                    transcripts.insert(stage, record.content.0);
                }
            }
            let report = analyze_overall(
                llm,
                &transcripts,
                &session.resume_snapshot,
                &session.company_snapshot,
            )
            .await?;
            (report.content, Some(report.total_score))
        }
    };

    let report = insert_report(&state.db, req.session_id, target, &content, score).await?;

    Ok(Json(AnalyzeResponse {
        report_id: report.id,
        content: report.content,
        score: report.score,
    }))
}

/// GET /interview/reports?user_id=&session_id=
pub async fn handle_list_reports(
    State(state): State<AppState>,
    Query(params): Query<ReportsQuery>,
) -> Result<Json<Vec<FeedbackReportRow>>, AppError> {
    Ok(Json(
        list_reports(&state.db, &params.user_id, params.session_id).await?,
    ))
}
