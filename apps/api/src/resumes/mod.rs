// Resume intake: candidates upload their resume as a JSON document.

pub mod handlers;

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;

/// Validates an uploaded resume file and parses its JSON body.
pub fn parse_resume_upload(filename: &str, body: &[u8]) -> Result<Value, AppError> {
    if !filename.to_lowercase().ends_with(".json") {
        return Err(AppError::Validation("Only JSON resumes are accepted".to_string()));
    }
    let text = std::str::from_utf8(body)
        .map_err(|_| AppError::Validation("Resume must be UTF-8 encoded".to_string()))?;
    serde_json::from_str(text)
        .map_err(|e| AppError::Validation(format!("Invalid JSON format: {e}")))
}

pub async fn insert_resume(
    pool: &PgPool,
    user_id: &str,
    filename: &str,
    content: &Value,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO resumes (id, user_id, filename, content) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(user_id)
        .bind(filename)
        .bind(content)
        .execute(pool)
        .await?;
    info!("Stored resume {filename} for user {user_id}");
    Ok(id)
}

/// The most recent upload of `filename` for a user.
pub async fn find_resume(
    pool: &PgPool,
    user_id: &str,
    filename: &str,
) -> Result<Option<ResumeRow>, AppError> {
    Ok(sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT * FROM resumes
        WHERE user_id = $1 AND filename = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(filename)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resume_upload_accepts_json() {
        let value = parse_resume_upload("resume_Sunny.JSON", br#"{"name": "Sunny"}"#).unwrap();
        assert_eq!(value["name"], "Sunny");
    }

    #[test]
    fn test_parse_resume_upload_rejects_other_extensions() {
        assert!(matches!(
            parse_resume_upload("resume.pdf", b"{}"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_resume_upload_rejects_invalid_json() {
        assert!(matches!(
            parse_resume_upload("resume.json", b"{not json"),
            Err(AppError::Validation(_))
        ));
        assert!(parse_resume_upload("resume.json", &[0xff, 0xfe]).is_err());
    }
}
