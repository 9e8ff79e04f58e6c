use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {0}")]
    Status(u16),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Summary generation already in progress for {0}")]
    SummaryInProgress(String),

    #[error("No summary for {0}")]
    SummaryNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Text suitable for the status banner.
    ///
    /// Backend-reported failures carry their own message; everything else is
    /// collapsed into the caller's generic text.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            Error::Backend(message) if !message.trim().is_empty() => message.clone(),
            Error::SummaryInProgress(_) => "Summary generation is already running.".to_string(),
            _ => generic.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
