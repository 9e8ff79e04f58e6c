use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use dn_core::{
    Article, ArticlePage, BulkReport, CheckReport, Error, Health, LatestQuery, NewArticle,
    NewsBackend, Result, Stats, Summary,
};
use tokio::sync::RwLock;

/// Number of articles a bulk summarize run covers.
const BULK_SUMMARY_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Latest,
    Summaries,
    Summary,
    Stats,
    Check,
    SummarizeAll,
    Summarize,
    Health,
}

#[derive(Default)]
pub struct MemoryStore {
    /// Newest first, as the backend returns them
    articles: Vec<Article>,
    /// Newest first
    summaries: Vec<Summary>,
    /// Articles the next check will "discover"
    uncrawled: Vec<Article>,
    /// Canned payloads returned instead of the generated digest
    prepared: HashMap<String, Summary>,
    failing: HashSet<Endpoint>,
    /// Endpoints that answer but refuse, carrying the backend's message
    rejecting: HashMap<Endpoint, String>,
}

impl MemoryStore {
    fn guard(&self, endpoint: Endpoint) -> Result<()> {
        if self.failing.contains(&endpoint) {
            return Err(Error::Status(500));
        }
        if let Some(message) = self.rejecting.get(&endpoint) {
            return Err(Error::Backend(message.clone()));
        }
        Ok(())
    }

    fn page(&self, query: LatestQuery) -> ArticlePage {
        match query {
            LatestQuery::Page { page, per_page } => {
                let per_page = per_page.max(1) as usize;
                let total_pages = self.articles.len().div_ceil(per_page) as u32;
                let start = (page.max(1) as usize - 1) * per_page;
                let articles = self.articles.iter().skip(start).take(per_page).cloned().collect();
                ArticlePage { articles, total_pages }
            }
            LatestQuery::Limit(limit) => ArticlePage {
                articles: self.articles.iter().take(limit as usize).cloned().collect(),
                total_pages: 1,
            },
        }
    }

    fn find_summary(&self, article_url: &str) -> Option<&Summary> {
        self.summaries.iter().find(|s| s.article_url == article_url)
    }

    fn summarize(&mut self, article_url: &str) -> Result<Summary> {
        let article = self
            .articles
            .iter()
            .find(|a| a.url == article_url)
            .ok_or(Error::Status(404))?;
        if self.find_summary(article_url).is_some() {
            return Err(Error::Backend("Summary already exists.".to_string()));
        }
        let summary = match self.prepared.remove(article_url) {
            Some(prepared) => prepared,
            None => digest(article),
        };
        self.summaries.insert(0, summary.clone());
        Ok(summary)
    }
}

/// Stand-in for the remote summarizer: first words of the title as body,
/// its longest words as keywords.
fn digest(article: &Article) -> Summary {
    let words: Vec<&str> = article.title.split_whitespace().collect();
    let body = words.iter().take(20).copied().collect::<Vec<_>>().join(" ");
    let mut keywords: Vec<&str> = words.clone();
    keywords.sort_unstable();
    keywords.dedup();
    // Stable, so equal lengths stay alphabetical.
    keywords.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    Summary {
        article_url: article.url.clone(),
        title: article.title.clone(),
        body,
        keywords: keywords.into_iter().take(3).map(str::to_string).collect(),
        references: Vec::new(),
    }
}

/// In-process backend used for offline runs and tests.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_articles(articles: Vec<Article>) -> Self {
        let backend = Self::new();
        backend.store.write().await.articles = articles;
        backend
    }

    /// A small fixed catalogue so `--backend memory` has something to show.
    pub async fn demo() -> Self {
        let articles = (1..=23)
            .rev()
            .map(|i| Article {
                url: format!("https://news.example.org/articles/{}", i),
                title: format!("Daniel prayer meeting report number {}", i),
                created_at: format!("2025-01-{:02} 09:00:00", i),
            })
            .collect();
        Self::with_articles(articles).await
    }

    pub async fn insert_summary(&self, summary: Summary) {
        let mut store = self.store.write().await;
        store.summaries.retain(|s| s.article_url != summary.article_url);
        store.summaries.insert(0, summary);
    }

    /// Make the next summarize call for this article return `summary`.
    pub async fn prepare_summary(&self, summary: Summary) {
        let mut store = self.store.write().await;
        store.prepared.insert(summary.article_url.clone(), summary);
    }

    /// Queue an article for the next `check` to discover.
    pub async fn queue_uncrawled(&self, article: Article) {
        self.store.write().await.uncrawled.push(article);
    }

    pub async fn set_failing(&self, endpoint: Endpoint, failing: bool) {
        let mut store = self.store.write().await;
        if failing {
            store.failing.insert(endpoint);
        } else {
            store.failing.remove(&endpoint);
        }
    }

    /// Make `endpoint` answer with `success: false` and `message`; `None`
    /// lets it through again.
    pub async fn set_rejecting(&self, endpoint: Endpoint, message: Option<&str>) {
        let mut store = self.store.write().await;
        match message {
            Some(message) => {
                store.rejecting.insert(endpoint, message.to_string());
            }
            None => {
                store.rejecting.remove(&endpoint);
            }
        }
    }

    pub async fn article_count(&self) -> usize {
        self.store.read().await.articles.len()
    }
}

#[async_trait]
impl NewsBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn latest(&self, query: LatestQuery) -> Result<ArticlePage> {
        let store = self.store.read().await;
        store.guard(Endpoint::Latest)?;
        Ok(store.page(query))
    }

    async fn summaries(&self, limit: u32) -> Result<Vec<Summary>> {
        let store = self.store.read().await;
        store.guard(Endpoint::Summaries)?;
        Ok(store.summaries.iter().take(limit as usize).cloned().collect())
    }

    async fn summary(&self, article_url: &str) -> Result<Option<Summary>> {
        let store = self.store.read().await;
        store.guard(Endpoint::Summary)?;
        Ok(store.find_summary(article_url).cloned())
    }

    async fn stats(&self) -> Result<Stats> {
        let store = self.store.read().await;
        store.guard(Endpoint::Stats)?;
        Ok(Stats {
            total_articles: store.articles.len() as u64,
            last_updated: store.articles.first().map(|a| a.created_at.clone()),
        })
    }

    async fn check(&self) -> Result<CheckReport> {
        let mut store = self.store.write().await;
        store.guard(Endpoint::Check)?;
        let found: Vec<Article> = store.uncrawled.drain(..).collect();
        let mut new_articles = Vec::new();
        for article in found {
            if store.articles.iter().any(|a| a.url == article.url) {
                continue;
            }
            new_articles.push(NewArticle {
                url: article.url.clone(),
                title: article.title.clone(),
            });
            store.articles.insert(0, article);
        }
        Ok(CheckReport {
            message: format!("Found {} new articles.", new_articles.len()),
            new_articles,
        })
    }

    async fn summarize_all(&self) -> Result<BulkReport> {
        let mut store = self.store.write().await;
        store.guard(Endpoint::SummarizeAll)?;
        let targets: Vec<String> = store
            .articles
            .iter()
            .filter(|a| store.find_summary(&a.url).is_none())
            .take(BULK_SUMMARY_LIMIT)
            .map(|a| a.url.clone())
            .collect();
        for url in &targets {
            store.summarize(url)?;
        }
        Ok(BulkReport {
            message: format!("Generated {} article summaries.", targets.len()),
        })
    }

    async fn summarize(&self, article_url: &str) -> Result<Summary> {
        let mut store = self.store.write().await;
        store.guard(Endpoint::Summarize)?;
        store.summarize(article_url)
    }

    async fn health(&self) -> Result<Health> {
        let store = self.store.read().await;
        store.guard(Endpoint::Health)?;
        Ok(Health {
            status: "healthy".to_string(),
        })
    }
}
