//! Hugging Face inference API backend (`summarization` pipeline task).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerationParams, Summarizer};
use crate::config::SummarizerConfig;
use crate::error::{AppError, Result};

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Deserialize)]
struct InferenceError {
    error: String,
}

pub struct HuggingFaceSummarizer {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl HuggingFaceSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(AppError::ConfigError("SUMMARIZER_MODEL must not be empty".to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/models/{}", config.endpoint, config.model),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String> {
        let body = InferenceRequest {
            inputs: text,
            parameters: params,
            options: InferenceOptions { wait_for_model: true },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request
            .send()
            .await
            .map_err(|e| AppError::SummarizeError(e.to_string()))?;

        let status = res.status();
        let raw = res
            .text()
            .await
            .map_err(|e| AppError::SummarizeError(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<InferenceError>(&raw)
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("inference service returned {}", status));
            tracing::warn!(
                model = %self.model,
                status = status.as_u16(),
                %message,
                "inference request failed"
            );
            return Err(AppError::SummarizeError(message));
        }

        let items: Vec<SummaryItem> = serde_json::from_str(&raw).map_err(|e| {
            AppError::SummarizeError(format!("Invalid response format from model: {}", e))
        })?;

        items
            .into_iter()
            .next()
            .map(|item| item.summary_text)
            .ok_or_else(|| AppError::SummarizeError("Model returned no summary".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
