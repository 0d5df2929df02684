use chrono::{DateTime, Utc};
use serde::Serialize;
use threatwire_core::StoredArticleSummary;
use threatwire_store::DeleteFailure;

/// Where in the stage sequence an item was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    FeedUnavailable,
    ExtractionFailed,
    GenerationFailed,
    StorageUnavailable,
    /// The run deadline elapsed before the item finished.
    Deadline,
}

impl FailureStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FeedUnavailable => "feed_unavailable",
            Self::ExtractionFailed => "extraction_failed",
            Self::GenerationFailed => "generation_failed",
            Self::StorageUnavailable => "storage_unavailable",
            Self::Deadline => "deadline",
        }
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A skipped feed (`link` is `None`) or article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub feed: String,
    pub link: Option<String>,
    pub stage: FailureStage,
    pub reason: String,
}

/// Counts and reasons for one run. Failures are data here, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub feeds_attempted: usize,
    pub feeds_failed: usize,
    pub articles_attempted: usize,
    pub articles_succeeded: usize,
    pub articles_skipped_duplicate: usize,
    pub articles_failed: usize,
    /// Documents written by this run.
    pub stored: Vec<StoredArticleSummary>,
    pub failures: Vec<Failure>,
}

impl RunReport {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            feeds_attempted: 0,
            feeds_failed: 0,
            articles_attempted: 0,
            articles_succeeded: 0,
            articles_skipped_duplicate: 0,
            articles_failed: 0,
            stored: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Failures recorded for a given stage.
    pub fn failures_at(&self, stage: FailureStage) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(move |f| f.stage == stage)
    }
}

/// Response shape of the article listing; external readers depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleListing {
    pub total: usize,
    pub articles: Vec<StoredArticleSummary>,
}

impl From<Vec<StoredArticleSummary>> for ArticleListing {
    fn from(articles: Vec<StoredArticleSummary>) -> Self {
        Self {
            total: articles.len(),
            articles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub deleted_count: usize,
    pub failures: Vec<DeleteFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_serializes_to_contract_shape() {
        let listing = ArticleListing::from(Vec::new());
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json, serde_json::json!({ "total": 0, "articles": [] }));
    }

    #[test]
    fn failure_stage_serializes_snake_case() {
        let failure = Failure {
            feed: "https://f.example/rss".to_string(),
            link: None,
            stage: FailureStage::StorageUnavailable,
            reason: "disk full".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["stage"], "storage_unavailable");
        assert_eq!(json["link"], serde_json::Value::Null);
        assert_eq!(FailureStage::Deadline.to_string(), "deadline");
    }
}
