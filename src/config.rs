use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::observability::LogFormat;
use crate::summarizer::GenerationParams;

pub const DEFAULT_HF_MODEL: &str = "sshleifer/distilbart-cnn-12-6";
pub const DEFAULT_HF_ENDPOINT: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_OPENROUTER_MODEL: &str = "deepseek/deepseek-chat-v3-0324";
pub const DEFAULT_OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1";

/// Which inference service hosts the summarization model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    HuggingFace,
    OpenRouter,
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Backend::HuggingFace),
            "openrouter" => Ok(Backend::OpenRouter),
            other => Err(AppError::ConfigError(format!(
                "Unknown summarizer backend: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub backend: Backend,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub params: GenerationParams,
    pub timeout: Duration,
    pub max_concurrent: usize,
    pub warmup: bool,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub fetch: FetchConfig,
    pub summarizer: SummarizerConfig,
    pub max_input_chars: usize,
    pub log_format: LogFormat,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = parse_or(&var, "PORT", 3000)?;
        let ip = IpAddr::from_str(host.trim())
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
        let server_addr = SocketAddr::new(ip, port);

        let backend = match var("SUMMARIZER_BACKEND") {
            Some(raw) => raw.parse::<Backend>()?,
            None => Backend::HuggingFace,
        };

        let (default_model, default_endpoint, key_var) = match backend {
            Backend::HuggingFace => (DEFAULT_HF_MODEL, DEFAULT_HF_ENDPOINT, "HF_API_TOKEN"),
            Backend::OpenRouter => (
                DEFAULT_OPENROUTER_MODEL,
                DEFAULT_OPENROUTER_ENDPOINT,
                "OPENROUTER_API_KEY",
            ),
        };

        let api_key = var(key_var);
        if backend == Backend::OpenRouter && api_key.is_none() {
            return Err(AppError::ConfigError(
                "OPENROUTER_API_KEY is required for the openrouter backend".to_string(),
            ));
        }

        let params = GenerationParams {
            max_length: parse_or(&var, "SUMMARY_MAX_LENGTH", 150)?,
            min_length: parse_or(&var, "SUMMARY_MIN_LENGTH", 30)?,
            do_sample: false,
        };
        if params.min_length > params.max_length {
            return Err(AppError::ConfigError(format!(
                "SUMMARY_MIN_LENGTH ({}) exceeds SUMMARY_MAX_LENGTH ({})",
                params.min_length, params.max_length
            )));
        }

        let max_concurrent: usize = parse_or(&var, "MAX_CONCURRENT_SUMMARIES", 1)?;
        if max_concurrent == 0 {
            return Err(AppError::ConfigError(
                "MAX_CONCURRENT_SUMMARIES must be at least 1".to_string(),
            ));
        }

        let summarizer = SummarizerConfig {
            backend,
            model: var("SUMMARIZER_MODEL").unwrap_or_else(|| default_model.to_string()),
            endpoint: var("SUMMARIZER_ENDPOINT")
                .unwrap_or_else(|| default_endpoint.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            params,
            timeout: Duration::from_secs(parse_or(&var, "SUMMARIZE_TIMEOUT_SECS", 60)?),
            max_concurrent,
            warmup: parse_or(&var, "SUMMARIZER_WARMUP", true)?,
        };

        let fetch = FetchConfig {
            timeout: Duration::from_secs(parse_or(&var, "FETCH_TIMEOUT_SECS", 10)?),
            connect_timeout: Duration::from_secs(parse_or(&var, "FETCH_CONNECT_TIMEOUT_SECS", 5)?),
            user_agent: var("FETCH_USER_AGENT").unwrap_or_else(|| {
                concat!("ozetdunyasi/", env!("CARGO_PKG_VERSION")).to_string()
            }),
        };

        let max_input_chars: usize = parse_or(&var, "MAX_INPUT_CHARS", 1024)?;
        if max_input_chars == 0 {
            return Err(AppError::ConfigError(
                "MAX_INPUT_CHARS must be at least 1".to_string(),
            ));
        }

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::Text,
        };

        Ok(Config {
            server_addr,
            fetch,
            summarizer,
            max_input_chars,
            log_format,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
