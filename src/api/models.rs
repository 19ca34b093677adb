use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

pub const RETRIEVAL_FAILED_MESSAGE: &str = "URL'den içerik alınamadı veya geçersiz URL!";
pub const NO_CONTENT_MESSAGE: &str = "Sayfa içeriği yeterli değil veya bozuk.";
pub const SUMMARIZATION_FAILED_PREFIX: &str = "Özetleme sırasında bir hata oluştu: ";

/// Body of the HTML form post. The field may be missing entirely.
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeForm {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub summary: String,
    pub summarized_at: DateTime<Utc>,
    pub input_chars: usize,
    pub model: String,
}

/// Result of one fetch → extract → summarize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// `input_chars` is the length of the text actually handed to the model.
    Success { summary: String, input_chars: usize },
    NoContent,
    RetrievalFailed(String),
    SummarizationFailed(String),
}

impl SummaryOutcome {
    /// Text shown in the summary slot of the page.
    pub fn summary_text(&self) -> Option<String> {
        match self {
            SummaryOutcome::Success { summary, .. } => Some(summary.clone()),
            SummaryOutcome::NoContent => Some(NO_CONTENT_MESSAGE.to_string()),
            SummaryOutcome::SummarizationFailed(detail) => {
                Some(format!("{}{}", SUMMARIZATION_FAILED_PREFIX, detail))
            }
            SummaryOutcome::RetrievalFailed(_) => None,
        }
    }

    /// Machine-readable tag for the failure variants.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            SummaryOutcome::Success { .. } => None,
            SummaryOutcome::NoContent => Some("no_content"),
            SummaryOutcome::RetrievalFailed(_) => Some("retrieval_failed"),
            SummaryOutcome::SummarizationFailed(_) => Some("summarization_failed"),
        }
    }

    /// Text shown in the error slot. Retrieval details stay in the logs.
    pub fn error_text(&self) -> Option<&'static str> {
        match self {
            SummaryOutcome::RetrievalFailed(_) => Some(RETRIEVAL_FAILED_MESSAGE),
            _ => None,
        }
    }
}
