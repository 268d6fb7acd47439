//! Company research: turns a (company, position) query into a markdown brief.
//!
//! The crawling itself happens in an external service behind `CompanyResearcher`;
//! this module only normalizes its answer, stores it and backs it up.

pub mod crawler;
pub mod handlers;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::company::CompanyRow;
use crate::storage::{put_markdown, sanitize_key_segment};

pub const DEFAULT_POSITION: &str = "Software Engineer";
pub const NOT_FOUND_SUMMARY: &str =
    "No public job posting found; generic interview mode will be used.";
pub const ANALYSIS_FAILED_SUMMARY: &str = "Could not analyze the job posting.";

/// Job boards a page extractor sometimes mistakes for the hiring company.
const JOB_BOARD_NAMES: &[&str] = &["104", "1111", "人力銀行", "duckduckgo"];

const PREVIEW_CHARS: usize = 100;

/// Normalized result of one research run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchBrief {
    pub company: String,
    pub position: String,
    /// Markdown brief fed to the interviewers.
    pub summary: String,
    pub source_url: Option<String>,
    /// False when the crawler fell back to a generic summary.
    pub found: bool,
    pub crawled_at: DateTime<Utc>,
}

impl ResearchBrief {
    pub fn fallback(company: &str, position: &str, summary: &str) -> Self {
        Self {
            company: company.to_string(),
            position: position.to_string(),
            summary: summary.to_string(),
            source_url: None,
            found: false,
            crawled_at: Utc::now(),
        }
    }
}

/// A source of company research briefs.
#[async_trait]
pub trait CompanyResearcher: Send + Sync {
    async fn research(&self, company: &str, position: &str) -> Result<ResearchBrief, AppError>;
}

/// Keeps the user's company name when the extracted one is a job board.
pub fn resolve_company_name(extracted: Option<&str>, hint: &str) -> String {
    match extracted.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name)
            if !JOB_BOARD_NAMES
                .iter()
                .any(|b| name.to_lowercase().contains(b)) =>
        {
            name.to_string()
        }
        _ => hint.to_string(),
    }
}

/// First characters of a brief followed by an ellipsis.
pub fn preview(summary: &str) -> String {
    let head: String = summary.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// Backup document written next to each successful crawl.
pub fn render_backup(brief: &ResearchBrief) -> String {
    format!(
        "URL: {}\nCompany: {}\nPosition: {}\n{}\n{}",
        brief.source_url.as_deref().unwrap_or("-"),
        brief.company,
        brief.position,
        "=".repeat(30),
        brief.summary
    )
}

/// Backups are named after the company the user searched for.
pub fn backup_key(company_name: &str, brief: &ResearchBrief) -> String {
    format!(
        "companies/{}_{}.md",
        sanitize_key_segment(company_name),
        brief.crawled_at.format("%Y%m%d_%H%M")
    )
}

/// Uploads the backup copy of a brief. The backup is a convenience log, so a
/// failed upload is only reported and yields `None`.
pub async fn backup_brief(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    company_name: &str,
    brief: &ResearchBrief,
) -> Option<String> {
    let key = backup_key(company_name, brief);
    match put_markdown(s3, bucket, &key, render_backup(brief)).await {
        Ok(()) => Some(key),
        Err(e) => {
            warn!("Backup of research brief for {company_name} failed: {e}");
            None
        }
    }
}

/// Stores a brief under the name the user searched for, so init can find it.
pub async fn insert_company(
    pool: &PgPool,
    company_name: &str,
    brief: &ResearchBrief,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO companies (id, company_name, position, content, source_url)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(company_name)
    .bind(&brief.position)
    .bind(&brief.summary)
    .bind(brief.source_url.as_deref())
    .execute(pool)
    .await?;
    info!("Stored research brief for {company_name} ({})", brief.position);
    Ok(id)
}

/// The most recent brief stored under `company_name`.
pub async fn latest_company(pool: &PgPool, company_name: &str) -> Result<Option<CompanyRow>, AppError> {
    Ok(sqlx::query_as::<_, CompanyRow>(
        r#"
        SELECT * FROM companies
        WHERE company_name = $1
        ORDER BY updated_at DESC
        LIMIT 1
        "#,
    )
    .bind(company_name)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_resolve_company_name_rejects_job_boards() {
        assert_eq!(resolve_company_name(Some("104人力銀行"), "Acme"), "Acme");
        assert_eq!(resolve_company_name(Some("DuckDuckGo"), "Acme"), "Acme");
        assert_eq!(resolve_company_name(Some("  "), "Acme"), "Acme");
        assert_eq!(resolve_company_name(None, "Acme"), "Acme");
        assert_eq!(
            resolve_company_name(Some("Acme Robotics Ltd."), "Acme"),
            "Acme Robotics Ltd."
        );
    }

    #[test]
    fn test_preview_is_char_safe() {
        let long = "公".repeat(150);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short...");
    }

    #[test]
    fn test_backup_rendering_and_key() {
        let brief = ResearchBrief {
            company: "Acme Corp".to_string(),
            position: "SRE".to_string(),
            summary: "# 1. Company".to_string(),
            source_url: Some("https://jobs.example/1".to_string()),
            found: true,
            crawled_at: Utc.with_ymd_and_hms(2025, 12, 14, 9, 30, 0).unwrap(),
        };
        let doc = render_backup(&brief);
        assert!(doc.starts_with("URL: https://jobs.example/1\nCompany: Acme Corp\nPosition: SRE\n"));
        assert!(doc.ends_with("==============================\n# 1. Company"));
        assert_eq!(
            backup_key("Acme Corp", &brief),
            "companies/Acme_Corp_20251214_0930.md"
        );
    }

    #[test]
    fn test_backup_key_uses_searched_name() {
        let mut brief = ResearchBrief::fallback("Acme", "SRE", "report");
        brief.company = "Acme Robotics Ltd.".to_string();
        assert!(backup_key("Acme", &brief).starts_with("companies/Acme_2"));
    }

    /// S3 client pointed at a closed local port with retries disabled.
    fn unreachable_s3() -> aws_sdk_s3::Client {
        use aws_sdk_s3::config::retry::RetryConfig;
        use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }

    #[tokio::test]
    async fn test_backup_failure_is_not_fatal() {
        let brief = ResearchBrief::fallback("Acme", "SRE", "report");
        let key = backup_brief(&unreachable_s3(), "bucket", "Acme", &brief).await;
        assert_eq!(key, None);
    }
}
