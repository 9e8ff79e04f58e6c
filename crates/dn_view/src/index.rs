use std::collections::HashMap;

use dn_core::{Article, Summary};

/// Article URL → summary, for the articles currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryIndex {
    entries: HashMap<String, Summary>,
}

impl SummaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a summary listing (newest first) against the loaded articles.
    /// Summaries for articles not on the page are ignored; when the listing
    /// repeats a URL the newest entry wins.
    pub fn build(summaries: Vec<Summary>, articles: &[Article]) -> Self {
        let titles: HashMap<&str, &str> = articles
            .iter()
            .map(|a| (a.url.as_str(), a.title.as_str()))
            .collect();

        let mut entries = HashMap::new();
        for summary in summaries {
            let Some(title) = titles.get(summary.article_url.as_str()) else {
                continue;
            };
            entries
                .entry(summary.article_url.clone())
                .or_insert_with(|| summary.with_fallback_title(title));
        }
        Self { entries }
    }

    pub fn get(&self, article_url: &str) -> Option<&Summary> {
        self.entries.get(article_url)
    }

    pub fn contains(&self, article_url: &str) -> bool {
        self.entries.contains_key(article_url)
    }

    /// Insert or overwrite; returns the replaced entry.
    pub fn insert(&mut self, summary: Summary) -> Option<Summary> {
        self.entries.insert(summary.article_url.clone(), summary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
