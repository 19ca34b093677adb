use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Upstream returned HTTP status {0}")]
    HttpStatus(u16),

    #[error("Upstream returned an empty body")]
    EmptyBody,

    #[error("Fetch timed out after {0:?}")]
    FetchTimeout(Duration),

    #[error("{0}")]
    SummarizeError(String),

    #[error("Summarization timed out after {0:?}")]
    SummarizeTimeout(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
