//! Server-rendered form page.

use super::models::SummaryOutcome;

/// Values the page template consumes. All `None` is the empty form.
#[derive(Debug, Default)]
pub struct PageView {
    pub url: Option<String>,
    pub summary: Option<String>,
    pub error: Option<String>,
}

impl PageView {
    pub fn from_outcome(url: &str, outcome: &SummaryOutcome) -> Self {
        Self {
            url: Some(url.to_string()),
            summary: outcome.summary_text(),
            error: outcome.error_text().map(str::to_string),
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(view: &PageView) -> String {
    let url = view.url.as_deref().map(escape_html).unwrap_or_default();

    let mut result = String::with_capacity(2048);
    result.push_str(concat!(
        "<!DOCTYPE html>\n",
        "<html lang=\"tr\">\n",
        "<head>\n",
        "<meta charset=\"utf-8\">\n",
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        "<title>Özet Dünyası</title>\n",
        "</head>\n",
        "<body>\n",
        "<h1>Özet Dünyası</h1>\n",
        "<form method=\"post\" action=\"/\">\n",
    ));
    result.push_str(&format!(
        "<input type=\"url\" name=\"url\" placeholder=\"https://\" value=\"{}\" required>\n",
        url
    ));
    result.push_str("<button type=\"submit\">Özetle</button>\n</form>\n");

    if let Some(error) = &view.error {
        result.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }

    if let Some(summary) = &view.summary {
        result.push_str(&format!(
            "<section class=\"summary\">\n<h2>Özet</h2>\n<p>{}</p>\n</section>\n",
            escape_html(summary)
        ));
    }

    result.push_str("</body>\n</html>\n");
    result
}
