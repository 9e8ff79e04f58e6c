use std::sync::Arc;

use dn_core::{
    validate_article_url, Error, LatestQuery, NewArticle, NewsBackend, Result, Stats, Summary,
};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ViewConfig;
use crate::state::{ClickTarget, ViewState};

const ARTICLES_FAILED: &str = "Failed to load articles.";
const SUMMARY_GENERATED: &str = "Article summary generated.";
const SUMMARY_FAILED: &str = "An error occurred while generating the summary.";
const SUMMARY_MISSING: &str = "No summary is available for this article.";
const CHECK_DONE: &str = "New article check finished.";
const CHECK_FAILED: &str = "An error occurred while checking for new articles.";
const BULK_DONE: &str = "Summary generation finished.";
const BULK_FAILED: &str = "An error occurred while generating summaries.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was committed to the view
    Applied,
    /// Out-of-range page, nothing was fetched
    Rejected,
    /// A newer request was issued while this one was in flight
    Stale,
}

#[derive(Debug)]
pub struct CheckOutcome {
    pub new_articles: Vec<NewArticle>,
    /// Delayed reload of the current page, present when something new was found
    pub follow_up: Option<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct BulkOutcome {
    pub message: String,
    /// Delayed summary index refresh
    pub follow_up: JoinHandle<()>,
}

/// Drives a [`ViewState`] from a [`NewsBackend`].
///
/// The state lock is only ever taken for short synchronous updates; it is
/// never held across a backend call, so concurrent operations interleave
/// freely and rely on generation numbers to drop outdated responses.
#[derive(Clone)]
pub struct ViewController {
    backend: Arc<dyn NewsBackend>,
    state: Arc<RwLock<ViewState>>,
    config: ViewConfig,
}

impl ViewController {
    pub fn new(backend: Arc<dyn NewsBackend>, config: ViewConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(ViewState::new(config.per_page))),
            backend,
            config,
        }
    }

    pub fn backend(&self) -> &Arc<dyn NewsBackend> {
        &self.backend
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// A copy of the current view for rendering.
    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// First page and stats are independent, so they are fetched together.
    pub async fn initialize(&self) -> Result<LoadOutcome> {
        let (page, _) = futures::join!(self.load_page(1), self.refresh_stats());
        page
    }

    pub async fn load_page(&self, page: u32) -> Result<LoadOutcome> {
        if !self.state.read().await.pagination().accepts(page) {
            debug!(page, "Ignoring request for a page outside the range");
            return Ok(LoadOutcome::Rejected);
        }
        self.fetch_page(page).await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<LoadOutcome> {
        debug!(page, "Navigating");
        self.load_page(page).await
    }

    /// Re-fetch the current page. The total may have changed on the backend,
    /// so no range check is applied.
    pub async fn reload(&self) -> Result<LoadOutcome> {
        let current = self.state.read().await.pagination().current;
        self.fetch_page(current).await
    }

    async fn fetch_page(&self, page: u32) -> Result<LoadOutcome> {
        let generation = self.state.write().await.begin_page_load();
        info!(page, generation, "📄 Loading page");

        let query = LatestQuery::Page {
            page,
            per_page: self.config.per_page,
        };
        let listing = match self.backend.latest(query).await {
            Ok(listing) => listing,
            Err(e) => {
                error!(page, generation, error = %e, "Failed to load articles");
                let mut state = self.state.write().await;
                state.end_busy();
                if state.fail_page(generation, e.user_message(ARTICLES_FAILED)) {
                    return Err(e);
                }
                return Ok(LoadOutcome::Stale);
            }
        };

        let summaries = match self.backend.summaries(self.config.summary_limit).await {
            Ok(summaries) => Some(summaries),
            Err(e) => {
                warn!(page, generation, error = %e, "Failed to load summaries, showing articles without them");
                None
            }
        };

        let mut state = self.state.write().await;
        state.end_busy();
        let count = listing.articles.len();
        if state.apply_page(generation, page, listing, summaries) {
            info!(page, generation, "✅ Loaded {} articles ({} with summaries)", count, state.index().len());
            Ok(LoadOutcome::Applied)
        } else {
            debug!(page, generation, "Discarding outdated page response");
            Ok(LoadOutcome::Stale)
        }
    }

    /// Generate the summary of one article and flip its row to "view".
    ///
    /// On failure the row falls back to whatever the index says, so it ends
    /// up exactly as it was before the request.
    pub async fn generate_summary(&self, article_url: &str) -> Result<Summary> {
        if let Err(e) = validate_article_url(article_url) {
            warn!(url = article_url, error = %e, "Refusing to summarize");
            self.state.write().await.set_error(SUMMARY_FAILED);
            return Err(e);
        }
        if !self.state.write().await.mark_pending(article_url) {
            debug!(url = article_url, "Summary generation already pending");
            return Err(Error::SummaryInProgress(article_url.to_string()));
        }

        info!(url = article_url, "🤖 Generating summary");
        let result = self.backend.summarize(article_url).await;

        let mut state = self.state.write().await;
        state.clear_pending(article_url);
        match result {
            Ok(summary) => {
                let summary = state.record_summary(summary.clone()).unwrap_or(summary);
                state.set_success(SUMMARY_GENERATED);
                info!(url = article_url, "✨ Summary ready");
                Ok(summary)
            }
            Err(e) => {
                error!(url = article_url, error = %e, "Summary generation failed");
                state.set_error(e.user_message(SUMMARY_FAILED));
                Err(e)
            }
        }
    }

    /// Open the overlay with the indexed summary of `article_url`.
    pub async fn show_summary(&self, article_url: &str) -> Result<Summary> {
        let mut state = self.state.write().await;
        match state.index().get(article_url).cloned() {
            Some(summary) => {
                state.show_summary(summary.clone());
                Ok(summary)
            }
            None => {
                state.set_error(SUMMARY_MISSING);
                Err(Error::SummaryNotFound(article_url.to_string()))
            }
        }
    }

    pub async fn dismiss_overlay(&self, target: ClickTarget) -> bool {
        self.state.write().await.dismiss_overlay(target)
    }

    /// Fetch `/stats` into the view. A failure resets both fields to the
    /// placeholder.
    pub async fn refresh_stats(&self) -> Result<Stats> {
        match self.backend.stats().await {
            Ok(stats) => {
                self.state.write().await.apply_stats(Some(&stats));
                Ok(stats)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load stats");
                self.state.write().await.apply_stats(None);
                Err(e)
            }
        }
    }

    /// Ask the backend to crawl. When new articles turn up, the current page
    /// and the stats are refreshed after `reload_delay`.
    pub async fn check_new_articles(&self) -> Result<CheckOutcome> {
        {
            let mut state = self.state.write().await;
            state.set_checking(true);
            state.clear_banner();
            state.begin_busy();
        }
        info!("🔄 Checking for new articles");
        let result = self.backend.check().await;
        {
            let mut state = self.state.write().await;
            state.set_checking(false);
            state.end_busy();
            match &result {
                Ok(report) if report.message.trim().is_empty() => state.set_success(CHECK_DONE),
                Ok(report) => state.set_success(report.message.clone()),
                Err(e) => state.set_error(e.user_message(CHECK_FAILED)),
            }
        }

        let report = result.map_err(|e| {
            error!(error = %e, "New article check failed");
            e
        })?;
        info!("📰 Found {} new articles", report.new_articles.len());

        let follow_up = if report.new_articles.is_empty() {
            let _ = self.refresh_stats().await;
            None
        } else {
            let controller = self.clone();
            let delay = self.config.reload_delay;
            Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(e) = controller.reload().await {
                    warn!(error = %e, "Reload after check failed");
                }
                let _ = controller.refresh_stats().await;
            }))
        };

        Ok(CheckOutcome {
            new_articles: report.new_articles,
            follow_up,
        })
    }

    /// Ask the backend to summarize its top articles, then refresh the index
    /// after `reload_delay`.
    pub async fn generate_all_summaries(&self) -> Result<BulkOutcome> {
        {
            let mut state = self.state.write().await;
            state.set_bulk_generating(true);
            state.clear_banner();
            state.begin_busy();
        }
        info!("🤖 Generating summaries for the latest articles");
        let result = self.backend.summarize_all().await;

        let mut state = self.state.write().await;
        state.set_bulk_generating(false);
        state.end_busy();
        match result {
            Ok(report) => {
                let message = if report.message.trim().is_empty() {
                    BULK_DONE.to_string()
                } else {
                    report.message
                };
                state.set_success(message.clone());
                drop(state);

                let controller = self.clone();
                let delay = self.config.reload_delay;
                let follow_up = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    controller.refresh_summaries().await;
                });
                Ok(BulkOutcome { message, follow_up })
            }
            Err(e) => {
                error!(error = %e, "Bulk summary generation failed");
                state.set_error(e.user_message(BULK_FAILED));
                Err(e)
            }
        }
    }

    /// Rebuild the summary index against the rows already on screen.
    pub async fn refresh_summaries(&self) -> LoadOutcome {
        let generation = self.state.write().await.begin_summary_refresh();
        let summaries = match self.backend.summaries(self.config.summary_limit).await {
            Ok(summaries) => Some(summaries),
            Err(e) => {
                warn!(generation, error = %e, "Failed to refresh summaries");
                None
            }
        };
        if self.state.write().await.apply_summaries(generation, summaries) {
            LoadOutcome::Applied
        } else {
            debug!(generation, "Discarding outdated summary listing");
            LoadOutcome::Stale
        }
    }
}
