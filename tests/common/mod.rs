#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use ozetdunyasi::api::routes::create_router;
use ozetdunyasi::config::Config;
use ozetdunyasi::error::{AppError, Result};
use ozetdunyasi::observability::{self, LogFormat};
use ozetdunyasi::summarizer::{GenerationParams, Summarizer, SummarizerHandle};
use ozetdunyasi::AppState;

static INIT: Once = Once::new();

pub fn init_test_tracing() {
    INIT.call_once(|| observability::init_logging(LogFormat::Text, "debug"));
}

/// Stands in for the pretrained model and remembers what it was asked.
pub struct RecordingSummarizer {
    pub inputs: Mutex<Vec<String>>,
    pub failure: Option<String>,
}

impl RecordingSummarizer {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            inputs: Mutex::new(Vec::new()),
            failure: None,
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            inputs: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        })
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for RecordingSummarizer {
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String> {
        assert_eq!(*params, GenerationParams::default());
        self.inputs.lock().unwrap().push(text.to_string());

        match &self.failure {
            Some(message) => Err(AppError::SummarizeError(message.clone())),
            None => Ok(format!("Summary of {} characters.", text.chars().count())),
        }
    }

    fn model_name(&self) -> &str {
        "recording-stub"
    }
}

pub fn test_router(model: Arc<RecordingSummarizer>) -> Router {
    test_router_with_fetch_timeout(model, 5)
}

pub fn test_router_with_fetch_timeout(model: Arc<RecordingSummarizer>, secs: u64) -> Router {
    init_test_tracing();

    let config = Config::from_lookup(|key| match key {
        "FETCH_TIMEOUT_SECS" => Some(secs.to_string()),
        _ => None,
    })
    .unwrap();

    let handle = SummarizerHandle::new(
        model,
        GenerationParams::default(),
        1,
        Duration::from_secs(5),
    );

    create_router(AppState::new(&config, handle).unwrap())
}

pub fn form_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_post(url: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/summarize")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "url": url }).to_string()))
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
