//! Abstractive summarization behind a small trait.
//!
//! A backend is loaded once at startup and wrapped in a [`SummarizerHandle`],
//! which every request shares. The handle bounds how many generations run at
//! the same time and how long any single one may take.

pub mod huggingface;
pub mod openrouter;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::config::{Backend, SummarizerConfig};
use crate::error::{AppError, Result};

pub use huggingface::HuggingFaceSummarizer;
pub use openrouter::OpenRouterSummarizer;

const WARMUP_TEXT: &str = "The service starts by loading a pretrained summarization model. \
    Once the model answers this request, incoming pages can be summarized.";

/// Decoding parameters sent with every generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
            do_sample: false,
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce an abstractive summary of `text`.
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String>;

    /// Identifier of the model doing the work.
    fn model_name(&self) -> &str;

    /// Run one throwaway generation so a broken model fails before serving.
    async fn warm_up(&self, params: &GenerationParams) -> Result<()> {
        let summary = self.summarize(WARMUP_TEXT, params).await?;
        tracing::debug!(
            model = self.model_name(),
            chars = summary.len(),
            "warm-up generation done"
        );
        Ok(())
    }
}

/// Builds the configured backend and, if asked to, proves it can generate.
pub async fn load(config: &SummarizerConfig) -> Result<Arc<dyn Summarizer>> {
    let summarizer: Arc<dyn Summarizer> = match config.backend {
        Backend::HuggingFace => Arc::new(HuggingFaceSummarizer::new(config)?),
        Backend::OpenRouter => Arc::new(OpenRouterSummarizer::new(config)?),
    };

    tracing::info!(
        backend = ?config.backend,
        model = summarizer.model_name(),
        "summarization model configured"
    );

    if config.warmup {
        let started = Instant::now();
        summarizer.warm_up(&config.params).await?;
        tracing::info!(elapsed = ?started.elapsed(), "summarization model ready");
    }

    Ok(summarizer)
}

/// Process-wide, read-only access point to the loaded model.
#[derive(Clone)]
pub struct SummarizerHandle {
    inner: Arc<dyn Summarizer>,
    permits: Arc<Semaphore>,
    params: GenerationParams,
    timeout: Duration,
}

impl SummarizerHandle {
    pub fn new(
        inner: Arc<dyn Summarizer>,
        params: GenerationParams,
        max_concurrent: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            params,
            timeout,
        }
    }

    pub fn from_config(inner: Arc<dyn Summarizer>, config: &SummarizerConfig) -> Self {
        Self::new(inner, config.params, config.max_concurrent, config.timeout)
    }

    pub fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    /// Summarize with the fixed parameters, waiting for a free slot first.
    ///
    /// The timeout covers queueing as well as generation.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let started = Instant::now();
        let work = async {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| AppError::SummarizeError(e.to_string()))?;
            self.inner.summarize(text, &self.params).await
        };

        match tokio::time::timeout(self.timeout, work).await {
            Ok(result) => {
                tracing::debug!(
                    elapsed = ?started.elapsed(),
                    ok = result.is_ok(),
                    "summarization finished"
                );
                result
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "summarization timed out");
                Err(AppError::SummarizeTimeout(self.timeout))
            }
        }
    }
}
