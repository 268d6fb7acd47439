use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::research::{backup_brief, insert_company, preview, DEFAULT_POSITION};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CrawlCompanyRequest {
    pub company: String,
    pub position: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CrawlCompanyResponse {
    pub message: String,
    /// Key to pass as `company_filename` when initializing an interview.
    pub company_filename: String,
    pub found: bool,
    pub source_url: Option<String>,
    pub backup_key: Option<String>,
    pub preview: String,
}

/// POST /tools/crawl
///
/// Researches a company/position, stores the brief and backs it up to object storage.
/// A failed backup does not fail the request; `backup_key` is then null.
pub async fn handle_crawl(
    State(state): State<AppState>,
    Json(req): Json<CrawlCompanyRequest>,
) -> Result<Json<CrawlCompanyResponse>, AppError> {
    let company = req.company.trim();
    if company.is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }
    let position = req
        .position
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_POSITION);

    let brief = state.researcher.research(company, position).await?;
    insert_company(&state.db, company, &brief).await?;

    // Only real crawls are worth a backup copy.
    let backup = if brief.found {
        backup_brief(&state.s3, &state.config.s3_bucket, company, &brief).await
    } else {
        None
    };

    info!("Crawl for {company} finished (found: {})", brief.found);

    Ok(Json(CrawlCompanyResponse {
        message: "Crawling successful".to_string(),
        company_filename: company.to_string(),
        found: brief.found,
        preview: preview(&brief.summary),
        source_url: brief.source_url,
        backup_key: backup,
    }))
}
