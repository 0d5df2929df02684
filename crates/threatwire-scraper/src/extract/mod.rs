//! Main-text extraction from article pages.
//!
//! Strategies are tried in priority order and the first one whose text is
//! longer than the minimum wins, even when a later strategy would return more
//! text. The accepted text is then truncated on a clean boundary.

mod strategy;
mod truncate;

use reqwest::{Client, Url};
use scraper::Html;
use threatwire_core::ExtractedContent;

use crate::error::ScraperError;

pub use strategy::{strategies_for, Strategy};
pub use truncate::truncate_at_boundary;

/// Fetches article pages and extracts their main text.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    client: Client,
    min_chars: usize,
}

impl ContentExtractor {
    /// A strategy's text is accepted only when it is longer than `min_chars`.
    #[must_use]
    pub fn new(client: Client, min_chars: usize) -> Self {
        Self { client, min_chars }
    }

    /// Fetches `url` and extracts at most `max_chars` characters of body text.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::ExtractionFailed`] when the page cannot be
    /// fetched, answers with a non-success status, or no strategy yields
    /// more than `min_chars` characters.
    pub async fn extract(
        &self,
        url: &str,
        max_chars: usize,
    ) -> Result<ExtractedContent, ScraperError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScraperError::extraction(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::extraction(
                url,
                format!("unexpected HTTP status {}", status.as_u16()),
            ));
        }

        // Redirects may land on another host; pick strategies for where we ended up.
        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| ScraperError::extraction(url, e))?;

        let mut content = extract_from_html(&final_url, &html, self.min_chars, max_chars)?;
        content.source_link = url.to_string();
        Ok(content)
    }
}

/// Runs the strategy chain over an already fetched page.
///
/// # Errors
///
/// Returns [`ScraperError::ExtractionFailed`] when no strategy yields more
/// than `min_chars` characters.
pub fn extract_from_html(
    url: &str,
    html: &str,
    min_chars: usize,
    max_chars: usize,
) -> Result<ExtractedContent, ScraperError> {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(ToOwned::to_owned))
        .unwrap_or_default();
    let document = Html::parse_document(html);

    let mut longest_rejected = 0usize;
    for strategy in strategies_for(&host) {
        let Some(text) = strategy.apply(&document) else {
            continue;
        };
        let len = text.chars().count();
        if len <= min_chars {
            longest_rejected = longest_rejected.max(len);
            continue;
        }

        let raw_text = truncate_at_boundary(&text, max_chars);
        let char_count = raw_text.chars().count();
        if char_count == 0 {
            continue;
        }

        tracing::debug!(
            url,
            strategy = %strategy.name(),
            chars = char_count,
            "content extracted"
        );
        return Ok(ExtractedContent {
            source_link: url.to_string(),
            raw_text,
            char_count,
            extraction_strategy_used: strategy.name(),
        });
    }

    Err(ScraperError::extraction(
        url,
        format!(
            "no strategy produced more than {min_chars} characters (longest was {longest_rejected})"
        ),
    ))
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;
