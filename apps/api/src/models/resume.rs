use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A resume uploaded by a candidate. `content` is the JSON document as uploaded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: String,
    pub filename: String,
    pub content: Value,
    pub created_at: DateTime<Utc>,
}
