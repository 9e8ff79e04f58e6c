use std::time::Duration;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_SUMMARY_LIMIT: u32 = 50;
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Articles per page requested from `/latest`
    pub per_page: u32,
    /// How many recent summaries to fetch when rebuilding the index
    pub summary_limit: u32,
    pub stats_interval: Duration,
    /// Pause before refreshing after a check or bulk summarize
    pub reload_delay: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            summary_limit: DEFAULT_SUMMARY_LIMIT,
            stats_interval: DEFAULT_STATS_INTERVAL,
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }
}
