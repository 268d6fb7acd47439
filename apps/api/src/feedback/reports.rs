use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::analyzer::AnalysisTarget;
use crate::models::session::FeedbackReportRow;

pub async fn insert_report(
    pool: &PgPool,
    session_id: Uuid,
    target: AnalysisTarget,
    content: &Value,
    score: Option<i32>,
) -> Result<FeedbackReportRow, AppError> {
    Ok(sqlx::query_as::<_, FeedbackReportRow>(
        r#"
        INSERT INTO feedback_reports (session_id, stage, report_type, content, score)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(session_id)
    .bind(target.as_str())
    .bind(target.report_type())
    .bind(content)
    .bind(score)
    .fetch_one(pool)
    .await?)
}

/// Reports for every session owned by `user_id`, newest first.
pub async fn list_reports(
    pool: &PgPool,
    user_id: &str,
    session_id: Option<Uuid>,
) -> Result<Vec<FeedbackReportRow>, AppError> {
    Ok(sqlx::query_as::<_, FeedbackReportRow>(
        r#"
        SELECT r.*
        FROM feedback_reports r
        JOIN interview_sessions s ON s.session_id = r.session_id
        WHERE s.user_id = $1
          AND ($2::uuid IS NULL OR r.session_id = $2)
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(user_id)
    .bind(session_id)
    .fetch_all(pool)
    .await?)
}
