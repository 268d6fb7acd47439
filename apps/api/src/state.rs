use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::research::CompanyResearcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Chat model used by interviewers, handoffs and analyzers.
    pub llm: Arc<dyn ChatModel>,
    /// HttpResearcher when CRAWLER_URL is set, OfflineResearcher otherwise.
    pub researcher: Arc<dyn CompanyResearcher>,
    pub config: Config,
}
