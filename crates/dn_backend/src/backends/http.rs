use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use dn_core::models::{
    BulkSummarizeResponse, CheckResponse, HealthResponse, LatestResponse, SummariesResponse,
    SummarizeResponse, SummaryRecord, StatsResponse,
};
use dn_core::{
    ArticlePage, BulkReport, CheckReport, Error, Health, LatestQuery, NewsBackend, Result, Stats,
    Summary,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::BackendConfig;

/// Talks to the news digest REST API.
pub struct HttpBackend {
    client: Arc<Client>,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {}", path);
        let response = self.client.get(self.endpoint(path)).send().await?;
        read_json(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("POST {}", path);
        let response = self.client.post(self.endpoint(path)).send().await?;
        read_json(response).await
    }
}

/// Any non-2xx status is reported as-is without looking at the body.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status.as_u16()));
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

fn encode_segment(article_url: &str) -> String {
    urlencoding::encode(article_url).into_owned()
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl NewsBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn latest(&self, query: LatestQuery) -> Result<ArticlePage> {
        let response: LatestResponse = self
            .get_json(&format!("/latest?{}", query.to_query_string()))
            .await?;
        Ok(response.into_page())
    }

    async fn summaries(&self, limit: u32) -> Result<Vec<Summary>> {
        let response: SummariesResponse = self.get_json(&format!("/summaries?limit={}", limit)).await?;
        Ok(response.into_summaries())
    }

    async fn summary(&self, article_url: &str) -> Result<Option<Summary>> {
        let path = format!("/summary/{}", encode_segment(article_url));
        debug!("GET {}", path);
        let response = self.client.get(self.endpoint(&path)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record: SummaryRecord = read_json(response).await?;
        Ok(record.into_summary(Some(article_url)))
    }

    async fn stats(&self) -> Result<Stats> {
        let response: StatsResponse = self.get_json("/stats").await?;
        Ok(response.into())
    }

    async fn check(&self) -> Result<CheckReport> {
        let response: CheckResponse = self.get_json("/check").await?;
        response.into_result()
    }

    async fn summarize_all(&self) -> Result<BulkReport> {
        let response: BulkSummarizeResponse = self.post_json("/summarize").await?;
        response.into_result()
    }

    async fn summarize(&self, article_url: &str) -> Result<Summary> {
        let response: SummarizeResponse = self
            .post_json(&format!("/summarize/{}", encode_segment(article_url)))
            .await?;
        response.into_result(article_url)
    }

    async fn health(&self) -> Result<Health> {
        let response: HealthResponse = self.get_json("/health").await?;
        Ok(response.into())
    }
}
