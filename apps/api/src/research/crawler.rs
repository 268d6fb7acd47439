//! Crawler clients. `HttpResearcher` talks to the external crawler service;
//! `OfflineResearcher` is used when none is configured.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::research::{
    resolve_company_name, CompanyResearcher, ResearchBrief, ANALYSIS_FAILED_SUMMARY,
    NOT_FOUND_SUMMARY,
};

#[derive(Debug, Serialize)]
struct CrawlRequest<'a> {
    company: &'a str,
    position: &'a str,
}

/// Body returned by the crawler service.
#[derive(Debug, Default, Deserialize)]
pub struct CrawlResponse {
    pub company: Option<String>,
    pub position: Option<String>,
    pub summary: Option<String>,
    pub source_url: Option<String>,
    pub error: Option<String>,
}

/// Turns a crawler answer into a brief, substituting fallbacks on failure.
pub fn interpret_response(company: &str, position: &str, response: CrawlResponse) -> ResearchBrief {
    let summary = response
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(error) = response.error.as_deref() {
        warn!("Crawler reported '{error}' for {company}");
        let fallback = if error.to_lowercase().contains("not found") {
            NOT_FOUND_SUMMARY
        } else {
            ANALYSIS_FAILED_SUMMARY
        };
        return ResearchBrief::fallback(company, position, summary.unwrap_or(fallback));
    }

    match summary {
        Some(summary) => ResearchBrief {
            company: resolve_company_name(response.company.as_deref(), company),
            position: response
                .position
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| position.to_string()),
            summary: summary.to_string(),
            source_url: response.source_url,
            found: true,
            crawled_at: Utc::now(),
        },
        None => ResearchBrief::fallback(company, position, ANALYSIS_FAILED_SUMMARY),
    }
}

/// Client for the external crawler service.
pub struct HttpResearcher {
    client: Client,
    endpoint: String,
}

impl HttpResearcher {
    pub fn new(endpoint: String) -> Self {
        Self {
            // Crawls drive a headless browser plus an LLM extraction pass.
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(180))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
        }
    }
}

#[async_trait]
impl CompanyResearcher for HttpResearcher {
    async fn research(&self, company: &str, position: &str) -> Result<ResearchBrief, AppError> {
        info!("Crawler started for {company} / {position}");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&CrawlRequest { company, position })
            .send()
            .await
            .map_err(|e| AppError::Research(format!("crawler unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Research(format!("crawler returned {status}: {body}")));
        }

        let body: CrawlResponse = response
            .json()
            .await
            .map_err(|e| AppError::Research(format!("invalid crawler response: {e}")))?;

        Ok(interpret_response(company, position, body))
    }
}

/// Used when no crawler is configured: every query gets the generic brief.
pub struct OfflineResearcher;

#[async_trait]
impl CompanyResearcher for OfflineResearcher {
    async fn research(&self, company: &str, position: &str) -> Result<ResearchBrief, AppError> {
        info!("No crawler configured; using generic brief for {company}");
        Ok(ResearchBrief::fallback(company, position, NOT_FOUND_SUMMARY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_success() {
        let brief = interpret_response(
            "Acme",
            "SRE",
            CrawlResponse {
                company: Some("Acme Robotics Ltd.".to_string()),
                position: Some("Site Reliability Engineer".to_string()),
                summary: Some("# 1. Company basics".to_string()),
                source_url: Some("https://www.104.com.tw/job/abc".to_string()),
                error: None,
            },
        );
        assert!(brief.found);
        assert_eq!(brief.company, "Acme Robotics Ltd.");
        assert_eq!(brief.position, "Site Reliability Engineer");
        assert_eq!(brief.summary, "# 1. Company basics");
    }

    #[test]
    fn test_interpret_job_board_company_is_replaced() {
        let brief = interpret_response(
            "Acme",
            "SRE",
            CrawlResponse {
                company: Some("1111人力銀行".to_string()),
                summary: Some("report".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(brief.company, "Acme");
        assert_eq!(brief.position, "SRE");
    }

    #[test]
    fn test_interpret_not_found() {
        let brief = interpret_response(
            "Acme",
            "SRE",
            CrawlResponse {
                error: Some("Job URL not found".to_string()),
                ..Default::default()
            },
        );
        assert!(!brief.found);
        assert_eq!(brief.summary, NOT_FOUND_SUMMARY);
    }

    #[test]
    fn test_interpret_analysis_failure_and_empty_summary() {
        let failed = interpret_response(
            "Acme",
            "SRE",
            CrawlResponse {
                error: Some("Analysis failed".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(failed.summary, ANALYSIS_FAILED_SUMMARY);

        let empty = interpret_response(
            "Acme",
            "SRE",
            CrawlResponse {
                summary: Some("   ".to_string()),
                ..Default::default()
            },
        );
        assert!(!empty.found);
        assert_eq!(empty.summary, ANALYSIS_FAILED_SUMMARY);
    }

    #[tokio::test]
    async fn test_offline_researcher() {
        let brief = OfflineResearcher.research("Acme", "SRE").await.unwrap();
        assert!(!brief.found);
        assert_eq!(brief.summary, NOT_FOUND_SUMMARY);
        assert_eq!(brief.company, "Acme");
    }
}
