//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::context::SessionContext;
use crate::interview::engine::next_question;
use crate::interview::progression::{save_stage, Archive};
use crate::interview::stage::{sort_stages, Stage};
use crate::interview::store::{
    append_history, delete_user_records, fetch_session, insert_session, user_records, NewSession,
};
use crate::interview::prompts::NO_COMPANY;
use crate::models::session::StageRecordRow;
use crate::research::latest_company;
use crate::resumes::find_resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InitInterviewRequest {
    pub user_id: String,
    pub resume_filename: String,
    /// Company name of a stored research brief.
    pub company_filename: String,
    pub selected_stages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InitInterviewResponse {
    pub session_id: Uuid,
    pub stages_sorted: Vec<Stage>,
    pub message: String,
    pub loaded_resume: String,
    pub loaded_company: String,
}

#[derive(Debug, Deserialize)]
pub struct NextQuestionRequest {
    pub session_id: Uuid,
    pub user_answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NextQuestionResponse {
    pub stage: Stage,
    pub question: String,
    pub is_stage_finished: bool,
}

#[derive(Debug, Deserialize)]
pub struct SaveStageRequest {
    pub session_id: Uuid,
    pub stage: String,
}

#[derive(Debug, Serialize)]
pub struct SaveStageResponse {
    pub message: String,
    pub record_id: Uuid,
    pub next_stage: Option<Stage>,
    pub handoff_note: Value,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: Uuid,
    pub user_id: String,
    pub current_stage: Stage,
    pub stages: Vec<Stage>,
    pub is_completed: bool,
    pub history_len: usize,
    pub handoffs_available: Vec<Stage>,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRecordsRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteRecordsResponse {
    pub deleted: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /interview/init
///
/// Sorts the requested stages, snapshots the resume and company brief, and opens a session.
pub async fn handle_init(
    State(state): State<AppState>,
    Json(req): Json<InitInterviewRequest>,
) -> Result<Json<InitInterviewResponse>, AppError> {
    let stages = sort_stages(&req.selected_stages);
    if stages.is_empty() {
        return Err(AppError::Validation(
            "selected_stages must contain at least one of phone, whiteboard, manager, hr"
                .to_string(),
        ));
    }

    let resume = find_resume(&state.db, &req.user_id, &req.resume_filename)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Resume {} not found for user {}",
                req.resume_filename, req.user_id
            ))
        })?;

    let company = latest_company(&state.db, &req.company_filename).await?;
    let company_snapshot = company
        .as_ref()
        .map(|c| c.content.clone())
        .unwrap_or_else(|| NO_COMPANY.to_string());

    let session_id = Uuid::new_v4();
    insert_session(
        &state.db,
        NewSession {
            session_id,
            user_id: &req.user_id,
            plan: &stages,
            resume_snapshot: &resume.content,
            company_snapshot: &company_snapshot,
        },
    )
    .await?;

    Ok(Json(InitInterviewResponse {
        session_id,
        stages_sorted: stages,
        message: "Interview session initialized".to_string(),
        loaded_resume: resume.filename,
        loaded_company: company
            .map(|c| c.company_name)
            .unwrap_or_else(|| "None".to_string()),
    }))
}

/// POST /interview/next
///
/// Runs one interviewer turn with earlier handoff notes injected into the prompt.
pub async fn handle_next(
    State(state): State<AppState>,
    Json(req): Json<NextQuestionRequest>,
) -> Result<Json<NextQuestionResponse>, AppError> {
    let session = fetch_session(&state.db, req.session_id).await?;
    if session.is_completed {
        return Err(AppError::Conflict(format!(
            "Session {} is already completed",
            req.session_id
        )));
    }

    let ctx = SessionContext::from_session(&session);
    let outcome = next_question(state.llm.as_ref(), &ctx, req.user_answer.as_deref()).await?;

    append_history(&state.db, req.session_id, outcome.stage, &outcome.appended).await?;

    Ok(Json(NextQuestionResponse {
        stage: outcome.stage,
        question: outcome.question,
        is_stage_finished: outcome.is_stage_finished,
    }))
}

/// POST /interview/save
///
/// Generates the handoff note for the stage, archives its transcript and advances the session.
pub async fn handle_save(
    State(state): State<AppState>,
    Json(req): Json<SaveStageRequest>,
) -> Result<Json<SaveStageResponse>, AppError> {
    let stage: Stage = req.stage.parse()?;

    let outcome = save_stage(
        &state.db,
        state.llm.as_ref(),
        Archive {
            s3: &state.s3,
            bucket: &state.config.s3_bucket,
        },
        req.session_id,
        stage,
    )
    .await?;

    Ok(Json(SaveStageResponse {
        message: "Saved & handoff generated".to_string(),
        record_id: outcome.record_id,
        next_stage: outcome.next_stage,
        handoff_note: outcome.handoff_note,
    }))
}

/// GET /interview/sessions/:id
pub async fn handle_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionStatusResponse>, AppError> {
    let session = fetch_session(&state.db, session_id).await?;
    let handoffs_available = Stage::ALL
        .into_iter()
        .filter(|s| session.summary_for(*s).is_some())
        .collect();

    Ok(Json(SessionStatusResponse {
        session_id,
        current_stage: session.current(),
        stages: session.plan(),
        is_completed: session.is_completed,
        history_len: session.history.0.len(),
        handoffs_available,
        user_id: session.user_id,
    }))
}

/// GET /interview/records?user_id=
pub async fn handle_list_records(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<StageRecordRow>>, AppError> {
    Ok(Json(user_records(&state.db, &params.user_id).await?))
}

/// DELETE /interview/records
pub async fn handle_delete_records(
    State(state): State<AppState>,
    Json(req): Json<DeleteRecordsRequest>,
) -> Result<Json<DeleteRecordsResponse>, AppError> {
    let deleted = delete_user_records(&state.db, &req.user_id).await?;
    Ok(Json(DeleteRecordsResponse { deleted }))
}
