use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use threatwire_core::{RenderedDocument, StoredArticleSummary};
use tokio::fs;
use uuid::Uuid;

use crate::{
    public_url, sort_newest_first, validate_name, ArticleStore, DeleteFailure, DeleteReport,
    PutOutcome, StoreError,
};

/// One file per article inside a single directory.
///
/// Writes go to a hidden staging file first and are then hard-linked to the
/// final name, so a reader never sees a partial document and a name that
/// already exists is never overwritten. The directory is created on first
/// write; listing a directory that does not exist yet yields nothing.
#[derive(Debug, Clone)]
pub struct FsArticleStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsArticleStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn summary_from_metadata(&self, name: &str, meta: &std::fs::Metadata) -> StoredArticleSummary {
        let created = meta
            .modified()
            .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);
        StoredArticleSummary {
            name: name.to_string(),
            url: public_url(&self.public_base_url, name),
            created,
            size: meta.len(),
        }
    }

    async fn summary_at(&self, name: &str, path: &Path) -> Result<StoredArticleSummary, StoreError> {
        let meta = fs::metadata(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        Ok(self.summary_from_metadata(name, &meta))
    }

    async fn read_root(&self) -> Result<Option<fs::ReadDir>, StoreError> {
        match fs::read_dir(&self.root).await {
            Ok(entries) => Ok(Some(entries)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.root, e)),
        }
    }
}

/// Hidden file a document is written to before being linked into place.
/// Removed on drop, so a failed or abandoned write leaves nothing behind.
struct StagingFile {
    path: PathBuf,
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove staging file");
            }
        }
    }
}

/// Name of a directory entry that `list` and `delete_all` both treat as a
/// stored document.
fn document_name(entry: &fs::DirEntry) -> Option<String> {
    let name = entry.file_name().into_string().ok()?;
    validate_name(&name).is_ok().then_some(name)
}

#[async_trait]
impl ArticleStore for FsArticleStore {
    async fn put(&self, document: &RenderedDocument) -> Result<PutOutcome, StoreError> {
        let name = document.filename.as_str();
        validate_name(name)?;

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))?;

        let target = self.root.join(name);
        let staging = StagingFile {
            path: self.root.join(format!(".{name}.{}.tmp", Uuid::new_v4())),
        };
        fs::write(&staging.path, &document.html_bytes)
            .await
            .map_err(|e| StoreError::io(&staging.path, e))?;

        let linked = fs::hard_link(&staging.path, &target).await;
        drop(staging);

        match linked {
            Ok(()) => {
                let summary = self.summary_at(name, &target).await?;
                tracing::debug!(name, size = summary.size, "document stored");
                Ok(PutOutcome::Created(summary))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(name, "document already stored; write skipped");
                Ok(PutOutcome::Existing(self.summary_at(name, &target).await?))
            }
            Err(e) => Err(StoreError::io(&target, e)),
        }
    }

    async fn list(&self) -> Result<Vec<StoredArticleSummary>, StoreError> {
        let Some(mut entries) = self.read_root().await? else {
            return Ok(Vec::new());
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.root, e))?
        {
            let Some(name) = document_name(&entry) else {
                continue;
            };
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                // removed between read_dir and stat
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::io(entry.path(), e)),
            };
            if meta.is_file() {
                summaries.push(self.summary_from_metadata(&name, &meta));
            }
        }

        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_name(name)?;
        let path = self.root.join(name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    async fn delete_all(&self) -> Result<DeleteReport, StoreError> {
        let Some(mut entries) = self.read_root().await? else {
            return Ok(DeleteReport::default());
        };

        let mut report = DeleteReport::default();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.root, e))?
        {
            let Some(name) = document_name(&entry) else {
                continue;
            };

            match fs::remove_file(entry.path()).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "failed to delete stored document");
                    report.failures.push(DeleteFailure {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            deleted = report.deleted,
            failed = report.failures.len(),
            "stored documents cleared"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "fs_test.rs"]
mod tests;
