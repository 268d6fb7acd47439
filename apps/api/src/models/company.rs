use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A company research brief produced by the crawler endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyRow {
    pub id: Uuid,
    pub company_name: String,
    pub position: String,
    pub content: String,
    pub source_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}
