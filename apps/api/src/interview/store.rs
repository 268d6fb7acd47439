//! Session store: persistence for sessions and archived stage transcripts.

use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::progression::Transition;
use crate::interview::stage::Stage;
use crate::llm_client::Message;
use crate::models::session::{InterviewSessionRow, StageRecordRow};

/// Everything needed to open a new session.
pub struct NewSession<'a> {
    pub session_id: Uuid,
    pub user_id: &'a str,
    pub plan: &'a [Stage],
    pub resume_snapshot: &'a Value,
    pub company_snapshot: &'a str,
}

/// The outcome of saving a stage, applied atomically.
pub struct StageTransition<'a> {
    pub step: Transition,
    pub handoff_note: &'a Value,
    pub transcript: &'a [Message],
    pub archive_key: Option<&'a str>,
}

pub async fn insert_session(pool: &PgPool, new: NewSession<'_>) -> Result<(), AppError> {
    let first = new
        .plan
        .first()
        .ok_or_else(|| AppError::Validation("A session needs at least one stage".to_string()))?;
    let stages: Vec<&str> = new.plan.iter().map(|s| s.as_str()).collect();

    sqlx::query(
        r#"
        INSERT INTO interview_sessions
            (session_id, user_id, current_stage, stages_list, history,
             resume_snapshot, company_snapshot)
        VALUES ($1, $2, $3, $4, '[]'::jsonb, $5, $6)
        "#,
    )
    .bind(new.session_id)
    .bind(new.user_id)
    .bind(first.as_str())
    .bind(&stages)
    .bind(new.resume_snapshot)
    .bind(new.company_snapshot)
    .execute(pool)
    .await?;

    info!(
        "Created session {} for user {} with plan {:?}",
        new.session_id, new.user_id, stages
    );
    Ok(())
}

pub async fn fetch_session(pool: &PgPool, session_id: Uuid) -> Result<InterviewSessionRow, AppError> {
    sqlx::query_as::<_, InterviewSessionRow>(
        "SELECT * FROM interview_sessions WHERE session_id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

const APPEND_HISTORY_SQL: &str = r#"
    UPDATE interview_sessions
    SET history = history || $2
    WHERE session_id = $1 AND current_stage = $3 AND NOT is_completed
"#;

/// Maps the row count of a guarded update to a conflict when the guard missed.
fn ensure_single_row(rows_affected: u64, conflict: impl FnOnce() -> String) -> Result<(), AppError> {
    if rows_affected == 1 {
        Ok(())
    } else {
        Err(AppError::Conflict(conflict()))
    }
}

/// Appends messages to the session history in a single statement, so
/// concurrent turns never overwrite each other.
///
/// Only applies while the session is still on `stage`; a turn that raced a
/// save gets a conflict instead of leaking into the next stage's history.
pub async fn append_history(
    pool: &PgPool,
    session_id: Uuid,
    stage: Stage,
    messages: &[Message],
) -> Result<(), AppError> {
    let result = sqlx::query(APPEND_HISTORY_SQL)
        .bind(session_id)
        .bind(Json(messages))
        .bind(stage.as_str())
        .execute(pool)
        .await?;

    ensure_single_row(result.rows_affected(), || {
        format!("Session {session_id} is no longer on stage {stage}")
    })
}

fn summary_column(stage: Stage) -> &'static str {
    match stage {
        Stage::Phone => "summary_phone",
        Stage::Whiteboard => "summary_whiteboard",
        Stage::Manager => "summary_manager",
        Stage::Hr => "summary_hr",
    }
}

/// Archives the stage transcript, stores the handoff note and moves the
/// session pointer, all in one transaction. Returns the new record id.
///
/// The update only applies while the session is still on `transition.step.stage`;
/// a concurrent save of the same stage gets a conflict.
pub async fn apply_transition(
    pool: &PgPool,
    session: &InterviewSessionRow,
    transition: StageTransition<'_>,
) -> Result<Uuid, AppError> {
    let mut tx = pool.begin().await?;
    let record_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO interview_stage_records
            (record_id, user_id, session_id, stage, content, archive_key)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(record_id)
    .bind(&session.user_id)
    .bind(session.session_id)
    .bind(transition.step.stage.as_str())
    .bind(Json(transition.transcript))
    .bind(transition.archive_key)
    .execute(&mut *tx)
    .await?;

    let stage = transition.step.stage;
    let advance = transition.step.apply_flags();

    let update = format!(
        r#"
        UPDATE interview_sessions
        SET {column} = $2,
            current_stage = $3,
            history = CASE WHEN $4 THEN '[]'::jsonb ELSE history END,
            is_completed = $5
        WHERE session_id = $1 AND current_stage = $6 AND NOT is_completed
        "#,
        column = summary_column(stage)
    );

    let result = sqlx::query(&update)
        .bind(session.session_id)
        .bind(transition.handoff_note)
        .bind(advance.current.as_str())
        .bind(advance.clear_history)
        .bind(advance.completed)
        .bind(stage.as_str())
        .execute(&mut *tx)
        .await?;

    ensure_single_row(result.rows_affected(), || {
        format!("Session {} is no longer on stage {stage}", session.session_id)
    })?;

    tx.commit().await?;

    info!(
        "Session {} saved stage {} (record {record_id}); next: {}",
        session.session_id,
        stage,
        transition.step.next.map(|s| s.as_str()).unwrap_or("completed")
    );
    Ok(record_id)
}

/// The most recent archived transcript for one stage of a session.
pub async fn latest_stage_record(
    pool: &PgPool,
    session_id: Uuid,
    stage: Stage,
) -> Result<Option<StageRecordRow>, AppError> {
    Ok(sqlx::query_as::<_, StageRecordRow>(
        r#"
        SELECT * FROM interview_stage_records
        WHERE session_id = $1 AND stage = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(session_id)
    .bind(stage.as_str())
    .fetch_optional(pool)
    .await?)
}

/// All archived transcripts of a session, oldest first.
pub async fn session_records(pool: &PgPool, session_id: Uuid) -> Result<Vec<StageRecordRow>, AppError> {
    Ok(sqlx::query_as::<_, StageRecordRow>(
        "SELECT * FROM interview_stage_records WHERE session_id = $1 ORDER BY created_at ASC",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?)
}

pub async fn user_records(pool: &PgPool, user_id: &str) -> Result<Vec<StageRecordRow>, AppError> {
    Ok(sqlx::query_as::<_, StageRecordRow>(
        "SELECT * FROM interview_stage_records WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Deletes every archived transcript of a user. Returns the number removed.
pub async fn delete_user_records(pool: &PgPool, user_id: &str) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM interview_stage_records WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    info!("Deleted {} stage records for user {user_id}", result.rows_affected());
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_columns_are_distinct() {
        let mut columns: Vec<_> = Stage::ALL.iter().map(|s| summary_column(*s)).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), 4);
        assert_eq!(summary_column(Stage::Hr), "summary_hr");
    }

    #[test]
    fn test_history_append_is_guarded_on_stage() {
        assert!(APPEND_HISTORY_SQL.contains("current_stage = $3"));
        assert!(APPEND_HISTORY_SQL.contains("NOT is_completed"));
    }

    #[test]
    fn test_ensure_single_row() {
        assert!(ensure_single_row(1, || "unused".to_string()).is_ok());
        assert!(matches!(
            ensure_single_row(0, || "moved on".to_string()),
            Err(AppError::Conflict(msg)) if msg == "moved on"
        ));
    }
}
