pub mod api;
pub mod config;
pub mod error;
pub mod observability;
pub mod scraper;
pub mod summarizer;

use crate::config::Config;
use crate::error::Result;
use crate::scraper::Fetcher;
use crate::summarizer::SummarizerHandle;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
    pub summarizer: SummarizerHandle,
    pub max_input_chars: usize,
}

impl AppState {
    pub fn new(config: &Config, summarizer: SummarizerHandle) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(&config.fetch)?,
            summarizer,
            max_input_chars: config.max_input_chars,
        })
    }
}
