use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use dn_core::{Error, Health, NewsBackend, Result};
use tracing::info;

pub mod backends;

pub use backends::*;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Http,
    Memory,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" | "remote" => Ok(BackendKind::Http),
            "memory" | "demo" => Ok(BackendKind::Memory),
            other => Err(Error::Config(format!(
                "Unknown backend: {}. Available backends: http, memory",
                other
            ))),
        }
    }
}

pub async fn create_backend(kind: BackendKind, config: &BackendConfig) -> Result<Arc<dyn NewsBackend>> {
    let backend: Arc<dyn NewsBackend> = match kind {
        BackendKind::Http => Arc::new(HttpBackend::new(config)?),
        BackendKind::Memory => Arc::new(MemoryBackend::demo().await),
    };
    info!("🔌 Backend ready (using {})", backend.name());
    Ok(backend)
}

/// Probe `/health` up to `max_retries` times, each attempt bounded by
/// `timeout`, sleeping `retry_delay` in between.
pub async fn check_backend_with_retry(
    backend: &Arc<dyn NewsBackend>,
    max_retries: u32,
    timeout: Duration,
    retry_delay: Duration,
) -> Result<Health> {
    let mut retries = 0;
    let mut last_error = None;

    while retries < max_retries {
        match tokio::time::timeout(timeout, backend.health()).await {
            Ok(Ok(health)) => return Ok(health),
            Ok(Err(e)) => last_error = Some(e),
            Err(elapsed) => {
                last_error = Some(Error::Backend(format!("Backend health check timed out: {}", elapsed)));
            }
        }
        retries += 1;
        if retries < max_retries {
            info!("Backend health check failed, retrying {}/{}...", retries, max_retries);
            tokio::time::sleep(retry_delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| Error::Backend("Backend health check failed after all retries".to_string())))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_backend, BackendConfig, BackendKind};
}
