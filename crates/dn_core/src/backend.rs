use async_trait::async_trait;

use crate::types::{ArticlePage, BulkReport, CheckReport, Health, LatestQuery, Stats, Summary};
use crate::Result;

#[async_trait]
pub trait NewsBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one page (or the most recent N) of stored articles
    async fn latest(&self, query: LatestQuery) -> Result<ArticlePage>;

    /// Fetch the most recent summaries, newest first
    async fn summaries(&self, limit: u32) -> Result<Vec<Summary>>;

    /// Fetch the summary of a single article, `None` if it has none
    async fn summary(&self, article_url: &str) -> Result<Option<Summary>>;

    async fn stats(&self) -> Result<Stats>;

    /// Ask the backend to crawl for new articles
    async fn check(&self) -> Result<CheckReport>;

    /// Ask the backend to summarize its top articles
    async fn summarize_all(&self) -> Result<BulkReport>;

    /// Generate the summary of a single article
    async fn summarize(&self, article_url: &str) -> Result<Summary>;

    async fn health(&self) -> Result<Health>;
}
