use std::collections::{HashMap, HashSet};

use dn_core::{Article, ArticlePage, Stats, Summary};

use crate::format::format_date;
use crate::index::SummaryIndex;
use crate::pagination::{PageItem, Pagination};

/// Shown in the stats fields before the first load and after a failure.
pub const STATS_PLACEHOLDER: &str = "-";
/// Shown when the backend has never recorded an update.
pub const STATS_NEVER: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Generate,
    View,
}

/// The single action control of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionControl {
    pub kind: ActionKind,
    pub in_progress: bool,
}

impl ActionControl {
    pub fn label(&self) -> &'static str {
        if self.in_progress {
            return "Generating...";
        }
        match self.kind {
            ActionKind::Generate => "🤖 Summarize",
            ActionKind::View => "📖 View summary",
        }
    }

    pub fn disabled(&self) -> bool {
        self.in_progress
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub url: String,
    pub title: String,
    pub created_at: String,
    pub action: ActionControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub kind: BannerKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOverlay {
    pub article_url: String,
    pub title: String,
    pub body: String,
    pub keywords: Vec<String>,
    pub references: Vec<String>,
}

impl From<Summary> for SummaryOverlay {
    fn from(summary: Summary) -> Self {
        Self {
            article_url: summary.article_url,
            title: summary.title,
            body: summary.body,
            keywords: summary.keywords,
            references: summary.references,
        }
    }
}

/// Where a click on the open overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    CloseButton,
    Background,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_articles: String,
    pub last_updated: String,
}

impl Default for StatsView {
    fn default() -> Self {
        Self {
            total_articles: STATS_PLACEHOLDER.to_string(),
            last_updated: STATS_PLACEHOLDER.to_string(),
        }
    }
}

/// Everything the page shows, owned in one place.
///
/// Rows are never stored: [`ViewState::rows`] derives them from the loaded
/// articles, the summary index and the set of pending generations, so
/// rendering twice from the same state gives the same output.
#[derive(Debug, Clone)]
pub struct ViewState {
    articles: Vec<Article>,
    index: SummaryIndex,
    pending: HashSet<String>,
    /// Summaries generated here that no fetched listing has confirmed yet
    generated: HashMap<String, Summary>,
    pagination: Pagination,
    page_generation: u64,
    summary_generation: u64,
    busy: u32,
    loaded: bool,
    checking: bool,
    bulk_generating: bool,
    banner: Option<StatusBanner>,
    overlay: Option<SummaryOverlay>,
    stats: StatsView,
}

impl ViewState {
    pub fn new(per_page: u32) -> Self {
        Self {
            articles: Vec::new(),
            index: SummaryIndex::new(),
            pending: HashSet::new(),
            generated: HashMap::new(),
            pagination: Pagination::new(per_page),
            page_generation: 0,
            summary_generation: 0,
            busy: 0,
            loaded: false,
            checking: false,
            bulk_generating: false,
            banner: None,
            overlay: None,
            stats: StatsView::default(),
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn index(&self) -> &SummaryIndex {
        &self.index
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page_controls(&self) -> Vec<PageItem> {
        self.pagination.controls()
    }

    pub fn banner(&self) -> Option<&StatusBanner> {
        self.banner.as_ref()
    }

    pub fn overlay(&self) -> Option<&SummaryOverlay> {
        self.overlay.as_ref()
    }

    pub fn stats(&self) -> &StatsView {
        &self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.busy > 0
    }

    pub fn is_checking(&self) -> bool {
        self.checking
    }

    pub fn is_bulk_generating(&self) -> bool {
        self.bulk_generating
    }

    pub fn is_pending(&self, article_url: &str) -> bool {
        self.pending.contains(article_url)
    }

    /// True once a load has finished and left nothing to show.
    pub fn show_empty_state(&self) -> bool {
        self.loaded && self.articles.is_empty()
    }

    pub fn rows(&self) -> Vec<RowView> {
        self.articles.iter().map(|a| self.row_for(a)).collect()
    }

    pub fn row(&self, article_url: &str) -> Option<RowView> {
        self.articles
            .iter()
            .find(|a| a.url == article_url)
            .map(|a| self.row_for(a))
    }

    fn row_for(&self, article: &Article) -> RowView {
        let kind = if self.index.contains(&article.url) {
            ActionKind::View
        } else {
            ActionKind::Generate
        };
        RowView {
            url: article.url.clone(),
            title: article.title.clone(),
            created_at: format_date(&article.created_at),
            action: ActionControl {
                kind,
                in_progress: self.pending.contains(&article.url),
            },
        }
    }

    // ── Page loads ──────────────────────────────────────────────────────

    /// Start a page load; the returned generation must be presented back
    /// when the response arrives.
    pub fn begin_page_load(&mut self) -> u64 {
        self.page_generation += 1;
        self.busy += 1;
        self.page_generation
    }

    pub fn is_current_page_load(&self, generation: u64) -> bool {
        generation == self.page_generation
    }

    pub fn begin_busy(&mut self) {
        self.busy += 1;
    }

    pub fn end_busy(&mut self) {
        self.busy = self.busy.saturating_sub(1);
    }

    /// Commit a page. Returns false, leaving the view untouched, when a newer
    /// load has been issued since `generation`. `summaries` is `None` when the
    /// summary listing could not be fetched.
    pub fn apply_page(
        &mut self,
        generation: u64,
        page: u32,
        listing: ArticlePage,
        summaries: Option<Vec<Summary>>,
    ) -> bool {
        if !self.is_current_page_load(generation) {
            return false;
        }
        self.articles = listing.articles;
        self.rebuild_index(summaries);
        self.pagination.update(page, listing.total_pages);
        self.loaded = true;
        // An index refresh started before this page was fetched is now outdated.
        self.summary_generation += 1;
        true
    }

    /// Record a failed article fetch: the list is cleared so the empty state
    /// shows, pagination is left as it was.
    pub fn fail_page(&mut self, generation: u64, message: String) -> bool {
        if !self.is_current_page_load(generation) {
            return false;
        }
        self.articles.clear();
        self.index.clear();
        self.loaded = true;
        self.set_error(message);
        true
    }

    // ── Summary index ───────────────────────────────────────────────────

    pub fn begin_summary_refresh(&mut self) -> u64 {
        self.summary_generation += 1;
        self.summary_generation
    }

    pub fn apply_summaries(&mut self, generation: u64, summaries: Option<Vec<Summary>>) -> bool {
        if generation != self.summary_generation {
            return false;
        }
        self.rebuild_index(summaries);
        true
    }

    /// A listing may have been read by the backend before a local generation
    /// finished, so locally generated summaries it lacks are laid back on top.
    /// A failed listing empties the index outright.
    fn rebuild_index(&mut self, summaries: Option<Vec<Summary>>) {
        let Some(summaries) = summaries else {
            self.generated.clear();
            self.index.clear();
            return;
        };
        for summary in &summaries {
            self.generated.remove(&summary.article_url);
        }
        self.index = SummaryIndex::build(summaries, &self.articles);
        for article in &self.articles {
            if let Some(summary) = self.generated.get(&article.url) {
                self.index
                    .insert(summary.clone().with_fallback_title(&article.title));
            }
        }
    }

    /// Returns false if a generation for this URL is already running.
    pub fn mark_pending(&mut self, article_url: &str) -> bool {
        self.pending.insert(article_url.to_string())
    }

    pub fn clear_pending(&mut self, article_url: &str) {
        self.pending.remove(article_url);
    }

    /// Store a freshly generated summary. Only articles still on screen are
    /// indexed; the stored copy is returned when it was.
    pub fn record_summary(&mut self, summary: Summary) -> Option<Summary> {
        self.generated
            .insert(summary.article_url.clone(), summary.clone());
        let article = self.articles.iter().find(|a| a.url == summary.article_url)?;
        let summary = summary.with_fallback_title(&article.title);
        self.index.insert(summary.clone());
        Some(summary)
    }

    // ── Overlay ─────────────────────────────────────────────────────────

    /// Open the overlay, replacing any overlay already open.
    pub fn show_summary(&mut self, summary: Summary) {
        self.overlay = Some(SummaryOverlay::from(summary));
    }

    /// Returns true if the click closed the overlay.
    pub fn dismiss_overlay(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Content => false,
            ClickTarget::CloseButton | ClickTarget::Background => self.overlay.take().is_some(),
        }
    }

    // ── Banner, stats, busy flags ───────────────────────────────────────

    pub fn set_success(&mut self, text: impl Into<String>) {
        self.banner = Some(StatusBanner {
            kind: BannerKind::Success,
            text: text.into(),
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.banner = Some(StatusBanner {
            kind: BannerKind::Error,
            text: text.into(),
        });
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// `None` means the fetch failed.
    pub fn apply_stats(&mut self, stats: Option<&Stats>) {
        self.stats = match stats {
            Some(stats) => StatsView {
                total_articles: stats.total_articles.to_string(),
                last_updated: stats
                    .last_updated
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_else(|| STATS_NEVER.to_string()),
            },
            None => StatsView::default(),
        };
    }

    pub fn set_checking(&mut self, checking: bool) {
        self.checking = checking;
    }

    pub fn set_bulk_generating(&mut self, generating: bool) {
        self.bulk_generating = generating;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(i: u32) -> Article {
        Article {
            url: format!("https://a/{}", i),
            title: format!("Article {}", i),
            created_at: "2025-03-01 09:30:00".to_string(),
        }
    }

    fn summary(i: u32) -> Summary {
        Summary {
            article_url: format!("https://a/{}", i),
            title: String::new(),
            body: format!("Body {}", i),
            keywords: vec!["k1".to_string()],
            references: vec!["v1".to_string()],
        }
    }

    fn loaded_state() -> ViewState {
        let mut state = ViewState::new(10);
        let generation = state.begin_page_load();
        state.end_busy();
        let listing = ArticlePage {
            articles: (1..=3).map(article).collect(),
            total_pages: 5,
        };
        assert!(state.apply_page(generation, 2, listing, Some(vec![summary(2)])));
        state
    }

    #[test]
    fn test_rows_follow_index() {
        let state = loaded_state();
        let rows = state.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].action.kind, ActionKind::Generate);
        assert_eq!(rows[1].action.kind, ActionKind::View);
        assert_eq!(rows[0].created_at, "2025. 03. 01. 09:30");
        assert_eq!(state.pagination().current, 2);
        assert_eq!(state.pagination().total_pages, 5);
        assert!(!state.is_loading());
        assert_eq!(state.rows(), rows);
    }

    #[test]
    fn test_stale_page_is_ignored() {
        let mut state = loaded_state();
        let older = state.begin_page_load();
        let newer = state.begin_page_load();

        let stale = ArticlePage { articles: vec![article(9)], total_pages: 9 };
        assert!(!state.apply_page(older, 4, stale, None));
        assert_eq!(state.articles().len(), 3);

        let fresh = ArticlePage { articles: vec![article(7)], total_pages: 5 };
        assert!(state.apply_page(newer, 3, fresh, None));
        assert_eq!(state.articles()[0].url, "https://a/7");
        assert!(!state.fail_page(older, "late failure".to_string()));
        assert!(state.banner().is_none());
    }

    #[test]
    fn test_failed_page_clears_list_keeps_pagination() {
        let mut state = loaded_state();
        let generation = state.begin_page_load();
        assert!(state.fail_page(generation, "Failed to load articles.".to_string()));
        assert!(state.show_empty_state());
        assert_eq!(state.pagination().current, 2);
        assert_eq!(state.banner().unwrap().kind, BannerKind::Error);
    }

    #[test]
    fn test_pending_row_is_disabled() {
        let mut state = loaded_state();
        assert!(state.mark_pending("https://a/1"));
        assert!(!state.mark_pending("https://a/1"));

        let row = state.row("https://a/1").unwrap();
        assert!(row.action.disabled());
        assert_eq!(row.action.label(), "Generating...");
        assert_eq!(row.action.kind, ActionKind::Generate);

        state.clear_pending("https://a/1");
        let row = state.row("https://a/1").unwrap();
        assert!(!row.action.disabled());
        assert_eq!(row.action.label(), "🤖 Summarize");
    }

    #[test]
    fn test_record_summary_only_for_visible_articles() {
        let mut state = loaded_state();
        let stored = state.record_summary(summary(1)).unwrap();
        assert_eq!(stored.title, "Article 1");
        assert_eq!(state.row("https://a/1").unwrap().action.kind, ActionKind::View);

        assert!(state.record_summary(summary(42)).is_none());
        assert!(!state.index().contains("https://a/42"));
    }

    #[test]
    fn test_overlay_single_instance_and_dismissal() {
        let mut state = loaded_state();
        state.show_summary(summary(1));
        state.show_summary(summary(2));
        assert_eq!(state.overlay().unwrap().article_url, "https://a/2");

        assert!(!state.dismiss_overlay(ClickTarget::Content));
        assert!(state.overlay().is_some());
        assert!(state.dismiss_overlay(ClickTarget::Background));
        assert!(state.overlay().is_none());
        assert!(!state.dismiss_overlay(ClickTarget::CloseButton));
    }

    #[test]
    fn test_stats_view() {
        let mut state = ViewState::new(10);
        assert_eq!(state.stats().total_articles, STATS_PLACEHOLDER);

        state.apply_stats(Some(&Stats {
            total_articles: 42,
            last_updated: Some("2025-03-01 09:30:00".to_string()),
        }));
        assert_eq!(state.stats().total_articles, "42");
        assert_eq!(state.stats().last_updated, "2025. 03. 01. 09:30");

        state.apply_stats(Some(&Stats::default()));
        assert_eq!(state.stats().last_updated, STATS_NEVER);

        state.apply_stats(None);
        assert_eq!(state.stats(), &StatsView::default());
    }

    #[test]
    fn test_generated_summary_survives_older_listing() {
        let mut state = loaded_state();
        let refresh = state.begin_summary_refresh();
        state.record_summary(summary(1));

        // The listing was read before the generation landed.
        assert!(state.apply_summaries(refresh, Some(vec![summary(2)])));
        assert_eq!(state.row("https://a/1").unwrap().action.kind, ActionKind::View);
        assert_eq!(state.index().get("https://a/1").unwrap().title, "Article 1");

        let generation = state.begin_page_load();
        let listing = ArticlePage { articles: (1..=3).map(article).collect(), total_pages: 5 };
        assert!(state.apply_page(generation, 2, listing, Some(vec![])));
        assert!(state.index().contains("https://a/1"));

        // Once a listing carries it, the backend copy wins.
        let refresh = state.begin_summary_refresh();
        let confirmed = Summary { body: "from backend".to_string(), ..summary(1) };
        assert!(state.apply_summaries(refresh, Some(vec![confirmed])));
        assert_eq!(state.index().get("https://a/1").unwrap().body, "from backend");
    }

    #[test]
    fn test_summary_refresh_superseded_by_page_load() {
        let mut state = loaded_state();
        let refresh = state.begin_summary_refresh();
        let generation = state.begin_page_load();
        let listing = ArticlePage { articles: (1..=3).map(article).collect(), total_pages: 5 };
        assert!(state.apply_page(generation, 2, listing, None));

        assert!(!state.apply_summaries(refresh, Some(vec![summary(1)])));
        assert!(state.index().is_empty());
    }
}
