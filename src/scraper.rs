use reqwest::{Client, ClientBuilder, StatusCode};
use scraper::{ElementRef, Html, Selector};
use std::time::Instant;
use once_cell::sync::Lazy;

use crate::config::FetchConfig;
use crate::error::{AppError, Result};

// Create static selectors to avoid recompiling them each time
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article").expect("Failed to parse article selector")
});

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("main").expect("Failed to parse main selector")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

/// Retrieves raw page markup. One instance is shared by every request.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Performs a single GET. Only a non-empty 200 response counts as content.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let started = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!(url, error = %e, "page fetch timed out");
                return Err(AppError::FetchTimeout(started.elapsed()));
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "page request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(url, status = status.as_u16(), "page returned non-200 status");
            return Err(AppError::HttpStatus(status.as_u16()));
        }

        let html = response.text().await.map_err(|e| {
            tracing::warn!(url, error = %e, "failed to read page body");
            AppError::from(e)
        })?;

        if html.is_empty() {
            tracing::warn!(url, "page returned an empty body");
            return Err(AppError::EmptyBody);
        }

        tracing::debug!(url, bytes = html.len(), elapsed = ?started.elapsed(), "page fetched");
        Ok(html)
    }
}

/// Picks the primary content region: first `<article>`, then first `<main>`.
/// `None` means the whole document should be used.
fn content_region(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&ARTICLE_SELECTOR)
        .next()
        .or_else(|| document.select(&MAIN_SELECTOR).next())
}

fn paragraph_text(paragraph: ElementRef<'_>) -> String {
    paragraph.text().collect()
}

/// Joins the text of every paragraph in the content region with single spaces.
///
/// Returns `None` when nothing but whitespace is left, so callers can tell
/// "no usable content" apart from real text.
pub fn extract_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let paragraphs: Vec<String> = match content_region(&document) {
        Some(region) => region.select(&PARAGRAPH_SELECTOR).map(paragraph_text).collect(),
        None => document.select(&PARAGRAPH_SELECTOR).map(paragraph_text).collect(),
    };

    let text = paragraphs.join(" ");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Keeps the first `max_chars` characters. Words and sentences may be cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(timeout_secs: u64) -> Fetcher {
        Fetcher::new(&FetchConfig {
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(1),
            user_agent: "ozetdunyasi-test".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn empty_body_is_not_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let err = fetcher(5).fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyBody));
    }

    #[tokio::test]
    async fn slow_upstream_hits_the_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>late</p>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = fetcher(1).fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, AppError::FetchTimeout(_)));
    }

    #[tokio::test]
    async fn non_200_reports_the_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<p>gone</p>"))
            .mount(&server)
            .await;

        let err = fetcher(5).fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, AppError::HttpStatus(404)));
    }

    #[test]
    fn article_paragraphs_win_over_the_rest() {
        let html = r#"
            <html><body>
                <p>Outside before</p>
                <article><p>Hello</p><p>World</p></article>
                <main><p>Main text</p></main>
                <p>Outside after</p>
            </body></html>
        "#;

        assert_eq!(extract_text(html).as_deref(), Some("Hello World"));
    }

    #[test]
    fn main_is_used_when_there_is_no_article() {
        let html = "<body><p>nav</p><main><p>First</p><div><p>Second</p></div></main></body>";
        assert_eq!(extract_text(html).as_deref(), Some("First Second"));
    }

    #[test]
    fn whole_document_is_the_last_resort() {
        let html = "<body><div><p>One</p></div><section><p>Two</p></section></body>";
        assert_eq!(extract_text(html).as_deref(), Some("One Two"));
    }

    #[test]
    fn only_the_first_article_counts() {
        let html = "<article><p>A</p></article><article><p>B</p></article>";
        assert_eq!(extract_text(html).as_deref(), Some("A"));
    }

    #[test]
    fn article_without_paragraphs_does_not_fall_back() {
        let html = "<article><div>no paragraphs here</div></article><p>outside</p>";
        assert_eq!(extract_text(html), None);
    }

    #[test]
    fn no_paragraphs_yields_none() {
        assert_eq!(extract_text("<html><body><div>text</div></body></html>"), None);
        assert_eq!(extract_text("<main><h1>Title</h1></main>"), None);
        assert_eq!(extract_text(""), None);
    }

    #[test]
    fn whitespace_only_paragraphs_yield_none() {
        assert_eq!(extract_text("<p>   </p><p>\n\t</p>"), None);
    }

    #[test]
    fn nested_inline_text_is_concatenated_verbatim() {
        let html = "<p>Rust is <strong>fast</strong> and <em>safe</em>.</p>";
        assert_eq!(extract_text(html).as_deref(), Some("Rust is fast and safe."));
    }

    #[test]
    fn malformed_markup_is_tolerated() {
        let html = "<div><p>Unclosed <b>bold<p>Second</div></span>";
        let text = extract_text(html).unwrap();
        assert!(text.contains("Unclosed"));
        assert!(text.contains("Second"));
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = "<main><p>Same</p><p>input</p></main>";
        assert_eq!(extract_text(html), extract_text(html));
    }

    #[test]
    fn truncation_keeps_exact_prefix() {
        let text = "a".repeat(1500);
        assert_eq!(truncate_chars(&text, 1024), &text[..1024]);
        assert_eq!(truncate_chars("short", 1024), "short");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "ş".repeat(1100);
        let truncated = truncate_chars(&text, 1024);
        assert_eq!(truncated.chars().count(), 1024);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn truncation_cuts_mid_word() {
        assert_eq!(truncate_chars("Hello World", 7), "Hello W");
    }
}
