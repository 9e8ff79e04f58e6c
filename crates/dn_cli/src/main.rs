use clap::Parser;
use dn_backend::{check_backend_with_retry, create_backend, BackendConfig, BackendKind, DEFAULT_API_URL};
use dn_core::{Error, NewsBackend};
use dn_view::config::{DEFAULT_PER_PAGE, DEFAULT_SUMMARY_LIMIT};
use dn_view::{spawn_stats_poller, LoadOutcome, ViewConfig, ViewController};
use dn_web::AppState;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod logging;
mod render;

const HEALTH_RETRIES: u32 = 3;
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
const HEALTH_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    'd' => total_seconds += num * 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number counts as seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds += num;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse the Daniel news digest", long_about = None)]
pub struct Cli {
    #[arg(long, env = "DN_BACKEND", default_value = "http", help = "Backend to use. Available backends: http (default), memory")]
    backend: String,
    #[arg(long, env = "DN_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Per-request timeout (e.g. 30s, 1m)
    #[arg(long, default_value = "30s")]
    timeout: HumanDuration,
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,
    /// How many recent summaries are matched against a page
    #[arg(long, default_value_t = DEFAULT_SUMMARY_LIMIT)]
    summary_limit: u32,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the web front end
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3000)]
        port: u16,
        /// How often the stats are refreshed (e.g. 30s, 5m)
        #[arg(long, default_value = "30s")]
        stats_interval: HumanDuration,
        /// Pause before reloading after a check or bulk summarize
        #[arg(long, default_value = "2s")]
        reload_delay: HumanDuration,
    },
    /// List one page of articles
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Summarize one article, or the latest articles when no URL is given
    Summarize {
        #[arg(required = false)]
        url: Option<String>,
    },
    /// Print the stored summary of an article
    Show { url: String },
    /// Ask the backend to look for new articles
    Check,
    /// Print article statistics
    Stats,
}

impl Cli {
    fn view_config(&self) -> ViewConfig {
        let mut config = ViewConfig {
            per_page: self.per_page,
            summary_limit: self.summary_limit,
            ..ViewConfig::default()
        };
        if let Commands::Serve { stats_interval, reload_delay, .. } = &self.command {
            config.stats_interval = stats_interval.0;
            config.reload_delay = reload_delay.0;
        }
        config
    }
}

async fn connect(cli: &Cli) -> anyhow::Result<Arc<dyn NewsBackend>> {
    let kind = BackendKind::from_str(&cli.backend)?;
    let config = BackendConfig::new(cli.api_url.as_str()).with_timeout(cli.timeout.0);
    let backend = create_backend(kind, &config).await?;

    info!("🩺 Checking backend health...");
    let health = check_backend_with_retry(&backend, HEALTH_RETRIES, HEALTH_TIMEOUT, HEALTH_RETRY_DELAY).await?;
    info!("✨ Backend is {} (using {})", health.status, backend.name());
    Ok(backend)
}

async fn list(controller: &ViewController, page: u32) -> anyhow::Result<()> {
    controller.load_page(1).await?;
    if page != 1 && controller.go_to_page(page).await? == LoadOutcome::Rejected {
        let total = controller.snapshot().await.pagination().total_pages;
        anyhow::bail!("Page {} is out of range (1-{})", page, total.max(1));
    }
    let view = controller.snapshot().await;
    print!("{}", render::rows(&view));
    println!("{}", render::page_footer(&view));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let backend = connect(&cli).await?;
    let controller = ViewController::new(backend.clone(), cli.view_config());

    match cli.command {
        Commands::Serve { host, port, .. } => {
            if let Err(e) = controller.initialize().await {
                warn!("⚠️ Initial page load failed: {}", e);
            }
            let poller = spawn_stats_poller(controller.clone(), controller.config().stats_interval);
            let result = dn_web::serve(AppState::new(controller), &host, port).await;
            poller.abort();
            result?;
        }
        Commands::List { page } => list(&controller, page).await?,
        Commands::Summarize { url: Some(url) } => {
            info!("🤖 Summarizing {}", url);
            let summary = controller.generate_summary(&url).await?;
            print!("{}", render::summary(&summary));
        }
        Commands::Summarize { url: None } => {
            let outcome = controller.generate_all_summaries().await?;
            // The index refresh only matters to a live view.
            outcome.follow_up.abort();
            println!("{}", outcome.message);
        }
        Commands::Show { url } => match backend.summary(&url).await? {
            Some(summary) => print!("{}", render::summary(&summary)),
            None => return Err(Error::SummaryNotFound(url).into()),
        },
        Commands::Check => {
            let outcome = controller.check_new_articles().await?;
            if let Some(handle) = outcome.follow_up {
                handle.abort();
            }
            if let Some(banner) = controller.snapshot().await.banner() {
                println!("{}", banner.text);
            }
            for article in &outcome.new_articles {
                println!("  + {} ({})", article.title, article.url);
            }
        }
        Commands::Stats => {
            let _ = controller.refresh_stats().await;
            println!("{}", render::stats(controller.snapshot().await.stats()));
        }
    }

    Ok(())
}
