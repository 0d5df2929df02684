use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed unavailable at {url}: {reason}")]
    FeedUnavailable { url: String, reason: String },

    #[error("extraction failed for {url}: {reason}")]
    ExtractionFailed { url: String, reason: String },
}

impl ScraperError {
    pub(crate) fn feed(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::FeedUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn extraction(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::ExtractionFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
