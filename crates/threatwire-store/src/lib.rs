//! Durable storage for rendered articles.
//!
//! [`ArticleStore`] is the seam the pipeline writes through. [`FsArticleStore`]
//! keeps one HTML file per article in a directory; [`MemoryArticleStore`]
//! backs tests and dry runs.

mod error;
mod fs;
mod memory;

use async_trait::async_trait;
use serde::Serialize;
use threatwire_core::{RenderedDocument, StoredArticleSummary};

pub use error::StoreError;
pub use fs::FsArticleStore;
pub use memory::MemoryArticleStore;

/// Extension every stored document carries. Listing and clearing ignore
/// anything else found in the container.
pub const DOCUMENT_EXTENSION: &str = ".html";

/// Result of [`ArticleStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// The document was written.
    Created(StoredArticleSummary),
    /// A document with the same name was already stored; nothing was written.
    Existing(StoredArticleSummary),
}

impl PutOutcome {
    #[must_use]
    pub fn summary(&self) -> &StoredArticleSummary {
        match self {
            Self::Created(s) | Self::Existing(s) => s,
        }
    }

    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of [`ArticleStore::delete_all`]. `deleted` counts only successful
/// removals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub deleted: usize,
    pub failures: Vec<DeleteFailure>,
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Stores `document` unless one with the same filename already exists.
    ///
    /// Creation is atomic: of two concurrent writers for one name, exactly
    /// one observes [`PutOutcome::Created`].
    async fn put(&self, document: &RenderedDocument) -> Result<PutOutcome, StoreError>;

    /// Every stored document, newest first.
    async fn list(&self) -> Result<Vec<StoredArticleSummary>, StoreError>;

    /// Raw bytes of the named document, or `None` if absent.
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Removes every stored document, reporting per-document failures
    /// instead of stopping at the first one.
    async fn delete_all(&self) -> Result<DeleteReport, StoreError>;
}

/// Rejects names that could escape the container or that are not documents.
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] describing the first violated rule.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let reason = if name.is_empty() {
        Some("empty")
    } else if name.starts_with('.') {
        Some("hidden names are reserved")
    } else if !name.ends_with(DOCUMENT_EXTENSION) {
        Some("not an .html document")
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        Some("only ASCII letters, digits, '-', '_' and '.' are allowed")
    } else if name.contains("..") {
        Some("contains '..'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

pub(crate) fn public_url(base: &str, name: &str) -> String {
    format!("{}/{name}", base.trim_end_matches('/'))
}

/// Newest first; equal timestamps fall back to name, descending.
pub(crate) fn sort_newest_first(summaries: &mut [StoredArticleSummary]) {
    summaries.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.name.cmp(&a.name)));
}
