use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resumes::{insert_resume, parse_resume_upload};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UploadQuery {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct UploadResumeResponse {
    pub resume_id: Uuid,
    pub filename: String,
    pub message: String,
}

/// POST /users/upload_resume?user_id=
///
/// Expects a multipart form with a `file` field holding a `.json` resume.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(params): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, body));
        break;
    }

    let (filename, body) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let content = parse_resume_upload(&filename, &body)?;
    let resume_id = insert_resume(&state.db, &params.user_id, &filename, &content).await?;

    Ok(Json(UploadResumeResponse {
        resume_id,
        filename,
        message: "Resume saved".to_string(),
    }))
}
