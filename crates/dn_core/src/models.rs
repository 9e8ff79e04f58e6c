//! Wire shapes of the backend responses.
//!
//! Every field the backend may omit is optional here; conversion into the
//! domain types in [`crate::types`] is where defaults are applied and
//! malformed records are dropped.

use serde::Deserialize;
use tracing::warn;

use crate::types::{
    validate_article_url, Article, ArticlePage, BulkReport, CheckReport, Health, NewArticle, Stats,
    Summary, UNTITLED,
};
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct LatestResponse {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
    #[serde(default)]
    pub pagination: Option<PaginationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleRecord {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaginationRecord {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Only absolute http(s) URLs end up in links; anything else is dropped.
fn accept_url(url: Option<String>) -> Option<String> {
    let url = url.filter(|u| !u.trim().is_empty())?;
    match validate_article_url(&url) {
        Ok(_) => Some(url),
        Err(e) => {
            warn!("Dropping record: {}", e);
            None
        }
    }
}

impl ArticleRecord {
    fn into_article(self) -> Option<Article> {
        let url = accept_url(self.url)?;
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        Some(Article {
            url,
            title,
            created_at: self.created_at.unwrap_or_default(),
        })
    }
}

impl LatestResponse {
    /// A response without pagination metadata (the `?limit=` form) is a
    /// single page.
    pub fn into_page(self) -> ArticlePage {
        let total_pages = self
            .pagination
            .and_then(|p| p.total_pages)
            .unwrap_or(1);
        let articles = self
            .articles
            .into_iter()
            .filter_map(|record| {
                let article = record.into_article();
                if article.is_none() {
                    warn!("Dropping article record without a usable url");
                }
                article
            })
            .collect();
        ArticlePage { articles, total_pages }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryRecord {
    #[serde(default)]
    pub article_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub bible_verses: Option<Vec<String>>,
}

impl SummaryRecord {
    /// `fallback_url` covers single-article responses whose payload omits
    /// the owning URL.
    pub fn into_summary(self, fallback_url: Option<&str>) -> Option<Summary> {
        let article_url = accept_url(
            self.article_url
                .filter(|u| !u.trim().is_empty())
                .or_else(|| fallback_url.map(str::to_string)),
        )?;
        Some(Summary {
            article_url,
            title: self.title.unwrap_or_default(),
            body: self.summary.unwrap_or_default(),
            keywords: self.keywords.unwrap_or_default(),
            references: self.bible_verses.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SummariesResponse {
    #[serde(default)]
    pub summaries: Vec<SummaryRecord>,
}

impl SummariesResponse {
    pub fn into_summaries(self) -> Vec<Summary> {
        self.summaries
            .into_iter()
            .filter_map(|record| record.into_summary(None))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub total_articles: Option<u64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl From<StatsResponse> for Stats {
    fn from(response: StatsResponse) -> Self {
        Stats {
            total_articles: response.total_articles.unwrap_or(0),
            last_updated: response.last_updated.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub new_articles: Vec<ArticleRecord>,
}

impl CheckResponse {
    pub fn into_result(self) -> Result<CheckReport> {
        if !self.success {
            return Err(Error::Backend(
                self.message.unwrap_or_else(|| "New article check failed.".to_string()),
            ));
        }
        let new_articles = self
            .new_articles
            .into_iter()
            .filter_map(ArticleRecord::into_article)
            .map(|a| NewArticle { url: a.url, title: a.title })
            .collect();
        Ok(CheckReport {
            message: self.message.unwrap_or_default(),
            new_articles,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkSummarizeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl BulkSummarizeResponse {
    pub fn into_result(self) -> Result<BulkReport> {
        if !self.success {
            return Err(Error::Backend(
                self.message.unwrap_or_else(|| "Summary generation failed.".to_string()),
            ));
        }
        Ok(BulkReport {
            message: self.message.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SummarizeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub summary: Option<SummaryRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SummarizeResponse {
    pub fn into_result(self, article_url: &str) -> Result<Summary> {
        if !self.success {
            return Err(Error::Backend(
                self.message.unwrap_or_else(|| "Summary generation failed.".to_string()),
            ));
        }
        self.summary
            .and_then(|record| record.into_summary(Some(article_url)))
            .ok_or_else(|| Error::InvalidResponse("summary payload missing".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl From<HealthResponse> for Health {
    fn from(response: HealthResponse) -> Self {
        Health {
            status: response.status.unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_defaults() {
        let response: LatestResponse = serde_json::from_str(
            r#"{"articles":[{"url":"https://a/1","title":null,"created_at":"2025-01-02 03:04:05"},{"title":"no url"}]}"#,
        )
        .unwrap();
        let page = response.into_page();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].title, UNTITLED);
    }

    #[test]
    fn test_non_http_urls_are_dropped() {
        let response: LatestResponse = serde_json::from_str(
            r#"{"articles":[{"url":"javascript:alert(document.cookie)","title":"x"},{"url":"https://a/2","title":"Two"}]}"#,
        )
        .unwrap();
        let page = response.into_page();
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].url, "https://a/2");

        let response: SummariesResponse = serde_json::from_str(
            r#"{"summaries":[{"article_url":"data:text/html,<b>x</b>","summary":"S"}]}"#,
        )
        .unwrap();
        assert!(response.into_summaries().is_empty());

        let response: CheckResponse = serde_json::from_str(
            r#"{"success":true,"new_articles":[{"url":"javascript:void(0)","title":"x"}]}"#,
        )
        .unwrap();
        assert!(response.into_result().unwrap().new_articles.is_empty());
    }

    #[test]
    fn test_latest_with_pagination() {
        let response: LatestResponse = serde_json::from_str(
            r#"{"articles":[],"pagination":{"page":3,"per_page":10,"total":200,"total_pages":20}}"#,
        )
        .unwrap();
        let page = response.into_page();
        assert_eq!(page.total_pages, 20);
        assert!(page.articles.is_empty());
    }

    #[test]
    fn test_summaries_skip_records_without_url() {
        let response: SummariesResponse = serde_json::from_str(
            r#"{"summaries":[{"article_url":"https://a/1","summary":"S","keywords":null},{"summary":"orphan"}],"count":2}"#,
        )
        .unwrap();
        let summaries = response.into_summaries();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].keywords.is_empty());
    }

    #[test]
    fn test_summarize_success_uses_request_url() {
        let response: SummarizeResponse = serde_json::from_str(
            r#"{"success":true,"summary":{"summary":"S","keywords":["k1"],"bible_verses":["v1"]}}"#,
        )
        .unwrap();
        let summary = response.into_result("https://a/1").unwrap();
        assert_eq!(summary.article_url, "https://a/1");
        assert_eq!(summary.keywords, vec!["k1".to_string()]);
        assert_eq!(summary.references, vec!["v1".to_string()]);
    }

    #[test]
    fn test_summarize_failure_carries_message() {
        let response: SummarizeResponse =
            serde_json::from_str(r#"{"success":false,"message":"Summary already exists."}"#).unwrap();
        match response.into_result("https://a/1") {
            Err(Error::Backend(message)) => assert_eq!(message, "Summary already exists."),
            other => panic!("unexpected result: {:?}", other),
        }

        let response: SummarizeResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            response.into_result("https://a/1"),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_check_response() {
        let response: CheckResponse = serde_json::from_str(
            r#"{"success":true,"message":"2 new","new_articles":[{"url":"https://a/9","title":"Nine"}]}"#,
        )
        .unwrap();
        let report = response.into_result().unwrap();
        assert_eq!(report.message, "2 new");
        assert_eq!(report.new_articles.len(), 1);

        let response: CheckResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(matches!(response.into_result(), Err(Error::Backend(_))));
    }

    #[test]
    fn test_stats_blank_last_updated() {
        let response: StatsResponse =
            serde_json::from_str(r#"{"total_articles":12,"last_updated":""}"#).unwrap();
        let stats = Stats::from(response);
        assert_eq!(stats.total_articles, 12);
        assert!(stats.last_updated.is_none());
    }
}
