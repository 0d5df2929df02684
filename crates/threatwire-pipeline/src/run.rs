//! One pipeline run: feeds → extraction → generation → classification →
//! rendering → storage, with per-item failure isolation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use threatwire_core::{ArticleCandidate, AppConfig, KeywordTiers, StoredArticleSummary};
use threatwire_llm::ArticleGenerator;
use threatwire_scraper::{ContentExtractor, FeedReader, ScraperError};
use threatwire_store::{ArticleStore, PutOutcome};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::classify::{classify, topic_tags};
use crate::render::{filename_for, render, source_domain, ArticleMetadata};
use crate::report::{Failure, FailureStage, RunReport};

/// Run-level knobs taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub feeds: Vec<String>,
    pub articles_per_feed: usize,
    pub content_max_length: usize,
    pub keyword_tiers: KeywordTiers,
    /// Upper bound on feeds or article groups in flight at once.
    pub max_concurrent: usize,
    /// Budget for one article's generation, retries included.
    pub article_timeout: Duration,
    pub run_deadline: Duration,
}

impl RunSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            feeds: config.feeds.clone(),
            articles_per_feed: config.articles_per_feed,
            content_max_length: config.content_max_length,
            keyword_tiers: config.keyword_tiers.clone(),
            max_concurrent: config.max_concurrent_requests,
            article_timeout: config.article_timeout(),
            run_deadline: config.run_deadline(),
        }
    }
}

#[derive(Debug, Clone)]
enum ArticleOutcome {
    Stored(StoredArticleSummary),
    Duplicate,
    Failed(FailureStage, String),
}

/// Candidates from one source domain. Members are processed in feed order,
/// one at a time, so each reads the clock only after the previous finished.
struct DomainGroup {
    domain: String,
    members: Vec<(usize, ArticleCandidate)>,
}

/// Source of document timestamps, read when each article starts processing.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

struct Stages {
    feeds: FeedReader,
    extractor: ContentExtractor,
    generator: ArticleGenerator,
    store: Arc<dyn ArticleStore>,
    settings: RunSettings,
}

pub struct Orchestrator {
    stages: Arc<Stages>,
    clock: Clock,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        feeds: FeedReader,
        extractor: ContentExtractor,
        generator: ArticleGenerator,
        store: Arc<dyn ArticleStore>,
        settings: RunSettings,
    ) -> Self {
        Self {
            stages: Arc::new(Stages {
                feeds,
                extractor,
                generator,
                store,
                settings,
            }),
            clock: system_clock(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Runs the pipeline once.
    ///
    /// Never fails: unreachable feeds and failing articles are recorded in
    /// the report and the run moves on. Feeds or articles still in flight
    /// when the run deadline elapses are abandoned and reported with
    /// [`FailureStage::Deadline`].
    pub async fn run_once(&self) -> RunReport {
        let settings = &self.stages.settings;
        let deadline = Instant::now() + settings.run_deadline;
        let limit = settings.max_concurrent.max(1);
        let mut report = RunReport::new((self.clock)());

        tracing::info!(feeds = settings.feeds.len(), "pipeline run started");

        let existing = Arc::new(self.stages.existing_names().await);
        let candidates = self.read_feeds(deadline, limit, &mut report).await;
        let groups = group_by_domain(&candidates);

        let mut outcomes: Vec<Option<ArticleOutcome>> = vec![None; candidates.len()];
        let (tx, mut rx) = mpsc::unbounded_channel();

        let stages = Arc::clone(&self.stages);
        let clock = Arc::clone(&self.clock);
        let work = stream::iter(groups)
            .map(move |group| {
                let stages = Arc::clone(&stages);
                let clock = Arc::clone(&clock);
                let existing = Arc::clone(&existing);
                let tx = tx.clone();
                async move { stages.process_group(group, &existing, &clock, &tx).await }
            })
            .buffer_unordered(limit)
            .for_each(|()| futures::future::ready(()));

        if tokio::time::timeout_at(deadline, work).await.is_err() {
            tracing::warn!(
                deadline_secs = settings.run_deadline.as_secs(),
                "run deadline elapsed; abandoning unfinished articles"
            );
        }
        while let Ok((index, outcome)) = rx.try_recv() {
            outcomes[index] = Some(outcome);
        }

        for ((feed, candidate), outcome) in candidates.into_iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|| {
                ArticleOutcome::Failed(FailureStage::Deadline, "run deadline elapsed".to_string())
            });
            match outcome {
                ArticleOutcome::Stored(summary) => {
                    report.articles_attempted += 1;
                    report.articles_succeeded += 1;
                    report.stored.push(summary);
                }
                ArticleOutcome::Duplicate => report.articles_skipped_duplicate += 1,
                ArticleOutcome::Failed(stage, reason) => {
                    report.articles_attempted += 1;
                    report.articles_failed += 1;
                    report.failures.push(Failure {
                        feed,
                        link: Some(candidate.link),
                        stage,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            feeds_attempted = report.feeds_attempted,
            feeds_failed = report.feeds_failed,
            articles_attempted = report.articles_attempted,
            articles_succeeded = report.articles_succeeded,
            articles_skipped_duplicate = report.articles_skipped_duplicate,
            articles_failed = report.articles_failed,
            "pipeline run finished"
        );
        report
    }

    /// Reads every feed and returns `(feed, candidate)` pairs in
    /// feed-then-document order. Feeds that answered before the deadline
    /// keep their candidates; the rest are reported as abandoned.
    async fn read_feeds(
        &self,
        deadline: Instant,
        limit: usize,
        report: &mut RunReport,
    ) -> Vec<(String, ArticleCandidate)> {
        let feeds = self.stages.settings.feeds.clone();
        let per_feed = self.stages.settings.articles_per_feed;
        report.feeds_attempted = feeds.len();

        let stages = Arc::clone(&self.stages);
        let mut reads = stream::iter(feeds.clone().into_iter().enumerate())
            .map(move |(index, url)| {
                let stages = Arc::clone(&stages);
                async move { (index, stages.feeds.read(&url, per_feed).await) }
            })
            .buffer_unordered(limit);

        let mut results: Vec<Option<Result<Vec<ArticleCandidate>, ScraperError>>> =
            Vec::new();
        results.resize_with(feeds.len(), || None);
        let drained = tokio::time::timeout_at(deadline, async {
            while let Some((index, result)) = reads.next().await {
                results[index] = Some(result);
            }
        })
        .await;
        if drained.is_err() {
            tracing::warn!("run deadline elapsed while reading feeds");
        }

        let mut candidates = Vec::new();
        for (url, result) in feeds.into_iter().zip(results) {
            let (stage, reason) = match result {
                Some(Ok(entries)) => {
                    tracing::info!(feed = %url, candidates = entries.len(), "feed read");
                    candidates.extend(entries.into_iter().map(|c| (url.clone(), c)));
                    continue;
                }
                Some(Err(e)) => (FailureStage::FeedUnavailable, e.to_string()),
                None => (FailureStage::Deadline, "run deadline elapsed".to_string()),
            };
            tracing::warn!(feed = %url, stage = %stage, error = %reason, "skipping feed");
            report.feeds_failed += 1;
            report.failures.push(Failure {
                feed: url,
                link: None,
                stage,
                reason,
            });
        }
        candidates
    }
}

impl Stages {
    /// Names already stored when the run starts. A listing failure only
    /// disables the pre-check; `put` still refuses to overwrite.
    async fn existing_names(&self) -> HashSet<String> {
        match self.store.list().await {
            Ok(summaries) => summaries.into_iter().map(|s| s.name).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "could not list stored articles; relying on put for dedup");
                HashSet::new()
            }
        }
    }

    async fn process_group(
        &self,
        group: DomainGroup,
        existing: &HashSet<String>,
        clock: &Clock,
        tx: &mpsc::UnboundedSender<(usize, ArticleOutcome)>,
    ) {
        let mut written: HashSet<String> = HashSet::new();

        for (index, candidate) in group.members {
            let now = clock();
            let filename = filename_for(&candidate.link, now);
            if existing.contains(&filename) || written.contains(&filename) {
                tracing::info!(
                    article = %candidate.link,
                    domain = %group.domain,
                    filename = %filename,
                    "skipping duplicate article"
                );
                let _ = tx.send((index, ArticleOutcome::Duplicate));
                continue;
            }

            let outcome = match self.process_article(&candidate, now).await {
                Ok(PutOutcome::Created(summary)) => {
                    tracing::info!(article = %candidate.link, name = %summary.name, "article stored");
                    ArticleOutcome::Stored(summary)
                }
                Ok(PutOutcome::Existing(_)) => {
                    tracing::info!(article = %candidate.link, filename = %filename, "document already stored");
                    ArticleOutcome::Duplicate
                }
                Err((stage, reason)) => {
                    tracing::warn!(
                        feed = %candidate.source_feed,
                        article = %candidate.link,
                        stage = %stage,
                        error = %reason,
                        "article skipped"
                    );
                    ArticleOutcome::Failed(stage, reason)
                }
            };
            if !matches!(outcome, ArticleOutcome::Failed(..)) {
                written.insert(filename);
            }
            let _ = tx.send((index, outcome));
        }
    }

    async fn process_article(
        &self,
        candidate: &ArticleCandidate,
        now: DateTime<Utc>,
    ) -> Result<PutOutcome, (FailureStage, String)> {
        let content = self
            .extractor
            .extract(&candidate.link, self.settings.content_max_length)
            .await
            .map_err(|e| (FailureStage::ExtractionFailed, e.to_string()))?;

        let budget = self.settings.article_timeout;
        let article = tokio::time::timeout(budget, self.generator.generate(candidate, &content))
            .await
            .map_err(|_| {
                (
                    FailureStage::GenerationFailed,
                    format!("time budget of {}s exhausted", budget.as_secs()),
                )
            })?
            .map_err(|e| (FailureStage::GenerationFailed, e.to_string()))?;

        let classification = classify(
            &candidate.title,
            &content.raw_text,
            &self.settings.keyword_tiers,
        );
        let topics = topic_tags(&format!("{} {}", candidate.title, content.raw_text))
            .into_iter()
            .map(str::to_owned)
            .collect();
        tracing::debug!(
            article = %candidate.link,
            severity = %classification.severity,
            strategy = %content.extraction_strategy_used,
            "article classified"
        );

        let document = render(
            &article,
            &classification,
            &ArticleMetadata {
                source_link: candidate.link.clone(),
                published_at: candidate.published_at,
                topics,
                created_at: now,
            },
        );

        self.store
            .put(&document)
            .await
            .map_err(|e| (FailureStage::StorageUnavailable, e.to_string()))
    }
}

/// Groups candidates by source domain, preserving first-seen order both
/// across and within groups.
fn group_by_domain(candidates: &[(String, ArticleCandidate)]) -> Vec<DomainGroup> {
    let mut groups: Vec<DomainGroup> = Vec::new();
    for (index, (_, candidate)) in candidates.iter().enumerate() {
        let domain = source_domain(&candidate.link);
        let member = (index, candidate.clone());
        match groups.iter_mut().find(|g| g.domain == domain) {
            Some(group) => group.members.push(member),
            None => groups.push(DomainGroup {
                domain,
                members: vec![member],
            }),
        }
    }
    groups
}
