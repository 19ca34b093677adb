use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{GenerationParams, Summarizer};
use crate::config::SummarizerConfig;
use crate::error::{AppError, Result};

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat-completions model asked to behave like a summarization pipeline.
pub struct OpenRouterSummarizer {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenRouterSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::ConfigError("OPENROUTER_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.endpoint),
            api_key,
            model: config.model.clone(),
        })
    }
}

pub fn build_prompt(content: &str, params: &GenerationParams) -> String {
    let mut result = String::with_capacity(content.len() + 200);
    result.push_str(&format!(
        "Summarize the following text as a single plain-text paragraph of {} to {} words. \
         Reply with the summary only.\n\n",
        params.min_length, params.max_length
    ));
    result.push_str(content);
    result
}

#[async_trait]
impl Summarizer for OpenRouterSummarizer {
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: build_prompt(text, params),
            }],
            max_tokens: params.max_length,
            temperature: if params.do_sample { 0.7 } else { 0.0 },
        };

        let res = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::SummarizeError(e.to_string()))?;

        let status = res.status();
        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::SummarizeError(e.to_string()))?;

        if !status.is_success() {
            let message = json["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("chat completion returned {}", status));
            tracing::warn!(
                model = %self.model,
                status = status.as_u16(),
                %message,
                "chat completion failed"
            );
            return Err(AppError::SummarizeError(message));
        }

        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AppError::SummarizeError("Invalid response format from LLM".to_string())
            })?
            .trim()
            .to_string();

        Ok(reply)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
