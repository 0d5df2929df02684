use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use threatwire_core::{RenderedDocument, StoredArticleSummary};
use tokio::sync::RwLock;

use crate::{
    public_url, sort_newest_first, validate_name, ArticleStore, DeleteReport, PutOutcome,
    StoreError,
};

#[derive(Debug, Clone)]
struct StoredDocument {
    bytes: Vec<u8>,
    created: DateTime<Utc>,
}

/// Process-local store. Documents keep the `created_at` they were rendered
/// with, so listings are reproducible in tests.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    public_base_url: String,
    documents: RwLock<BTreeMap<String, StoredDocument>>,
}

impl MemoryArticleStore {
    #[must_use]
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    fn summary(&self, name: &str, doc: &StoredDocument) -> StoredArticleSummary {
        StoredArticleSummary {
            name: name.to_string(),
            url: public_url(&self.public_base_url, name),
            created: doc.created,
            size: doc.bytes.len() as u64,
        }
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn put(&self, document: &RenderedDocument) -> Result<PutOutcome, StoreError> {
        validate_name(&document.filename)?;

        let mut documents = self.documents.write().await;
        if let Some(existing) = documents.get(&document.filename) {
            return Ok(PutOutcome::Existing(
                self.summary(&document.filename, existing),
            ));
        }

        let stored = StoredDocument {
            bytes: document.html_bytes.clone(),
            created: document.created_at,
        };
        let summary = self.summary(&document.filename, &stored);
        documents.insert(document.filename.clone(), stored);
        Ok(PutOutcome::Created(summary))
    }

    async fn list(&self) -> Result<Vec<StoredArticleSummary>, StoreError> {
        let documents = self.documents.read().await;
        let mut summaries: Vec<StoredArticleSummary> = documents
            .iter()
            .map(|(name, doc)| self.summary(name, doc))
            .collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_name(name)?;
        Ok(self
            .documents
            .read()
            .await
            .get(name)
            .map(|doc| doc.bytes.clone()))
    }

    async fn delete_all(&self) -> Result<DeleteReport, StoreError> {
        let mut documents = self.documents.write().await;
        let deleted = documents.len();
        documents.clear();
        Ok(DeleteReport {
            deleted,
            failures: Vec::new(),
        })
    }
}
