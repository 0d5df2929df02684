use std::sync::Arc;

use thiserror::Error;
use threatwire_core::AppConfig;
use threatwire_llm::{ArticleGenerator, ChatClient, GenerationSettings, LlmError, RetryPolicy};
use threatwire_scraper::{build_http_client, ContentExtractor, FeedReader, ScraperError};
use threatwire_store::{ArticleStore, FsArticleStore, StoreError};

use crate::report::{ArticleListing, ClearReport, RunReport};
use crate::run::{Clock, Orchestrator, RunSettings};

/// Failures while assembling a [`Pipeline`]. They happen before any
/// processing and are fatal to startup.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to build scraper client: {0}")]
    Scraper(#[from] ScraperError),

    #[error("failed to build generation client: {0}")]
    Llm(#[from] LlmError),
}

/// The three operations the rest of the system uses: run once, list, clear.
pub struct Pipeline {
    orchestrator: Orchestrator,
    store: Arc<dyn ArticleStore>,
}

impl Pipeline {
    /// Builds a pipeline writing to the filesystem store named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if an HTTP client cannot be constructed or
    /// the generation base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let store: Arc<dyn ArticleStore> = Arc::new(FsArticleStore::new(
            config.storage_dir.clone(),
            config.public_base_url.clone(),
        ));
        Self::with_store(config, store)
    }

    /// Builds a pipeline over any [`ArticleStore`].
    ///
    /// # Errors
    ///
    /// See [`Pipeline::from_config`].
    pub fn with_store(
        config: &AppConfig,
        store: Arc<dyn ArticleStore>,
    ) -> Result<Self, PipelineError> {
        let http = build_http_client(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
        )?;
        let chat = ChatClient::with_base_url(
            &config.openai_api_key,
            config.llm_timeout_secs,
            &config.llm_base_url,
        )?;
        let generator = ArticleGenerator::new(
            chat,
            RetryPolicy::new(config.llm_max_retries, config.llm_backoff_base_ms),
            GenerationSettings {
                model: config.llm_model.clone(),
                title_model: config.llm_title_model.clone(),
                max_tokens: config.llm_max_tokens,
                min_response_chars: config.llm_min_response_chars,
                rewrite_titles: config.rewrite_titles,
            },
        );

        let orchestrator = Orchestrator::new(
            FeedReader::new(http.clone()),
            ContentExtractor::new(http, config.content_min_length),
            generator,
            Arc::clone(&store),
            RunSettings::from_config(config),
        );

        Ok(Self {
            orchestrator,
            store,
        })
    }

    /// Replaces the system clock. Each article reads it once, when its
    /// processing starts, to get its `created_at` and filename.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.orchestrator = self.orchestrator.with_clock(clock);
        self
    }

    pub async fn run_once(&self) -> RunReport {
        self.orchestrator.run_once().await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be listed.
    pub async fn list_articles(&self) -> Result<ArticleListing, StoreError> {
        Ok(ArticleListing::from(self.store.list().await?))
    }

    /// Deletes every stored article. Individual delete failures are reported
    /// in the result, not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be enumerated at all.
    pub async fn clear_articles(&self) -> Result<ClearReport, StoreError> {
        let report = self.store.delete_all().await?;
        Ok(ClearReport {
            deleted_count: report.deleted,
            failures: report.failures,
        })
    }

    /// Stored HTML for `name`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] for names that cannot be stored
    /// documents and other [`StoreError`]s on backend failure.
    pub async fn article_html(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.store.get(name).await
    }
}
