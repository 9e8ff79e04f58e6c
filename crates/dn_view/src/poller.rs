use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::controller::ViewController;

/// Refresh the stats every `period`, starting one period from now.
///
/// The task runs until aborted. Failures are already reflected in the view
/// as placeholders by [`ViewController::refresh_stats`].
pub fn spawn_stats_poller(controller: ViewController, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            debug!("Polling stats");
            let _ = controller.refresh_stats().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewConfig;
    use dn_backend::MemoryBackend;
    use dn_core::Article;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_poller_refreshes_on_interval() {
        let backend = MemoryBackend::new();
        let controller = ViewController::new(Arc::new(backend.clone()), ViewConfig::default());
        let poller = spawn_stats_poller(controller.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(controller.snapshot().await.stats().total_articles, "-");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(controller.snapshot().await.stats().total_articles, "0");

        backend
            .queue_uncrawled(Article {
                url: "https://a/1".to_string(),
                title: "One".to_string(),
                created_at: "2025-03-01 09:30:00".to_string(),
            })
            .await;
        dn_core::NewsBackend::check(&backend).await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(controller.snapshot().await.stats().total_articles, "1");
        poller.abort();
    }
}
