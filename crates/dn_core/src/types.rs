use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Title shown when the backend stored an article without one.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    /// Backend timestamp, kept verbatim; formatting happens at render time.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub article_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "summary")]
    pub body: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "bible_verses", default)]
    pub references: Vec<String>,
}

impl Summary {
    /// Fill in the owning article's title when the payload came without one.
    pub fn with_fallback_title(mut self, title: &str) -> Self {
        if self.title.trim().is_empty() {
            self.title = title.to_string();
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total_pages: u32,
}

/// How `/latest` is addressed: paginated, or a flat "most recent N".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestQuery {
    Page { page: u32, per_page: u32 },
    Limit(u32),
}

impl LatestQuery {
    pub fn to_query_string(&self) -> String {
        match self {
            LatestQuery::Page { page, per_page } => format!("page={}&per_page={}", page, per_page),
            LatestQuery::Limit(limit) => format!("limit={}", limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_articles: u64,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub message: String,
    pub new_articles: Vec<NewArticle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Reject anything that is not an absolute http(s) URL before it is sent
/// to the backend as a path segment.
pub fn validate_article_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(Error::InvalidUrl(format!("unsupported scheme {} in {}", other, raw))),
    }
}
