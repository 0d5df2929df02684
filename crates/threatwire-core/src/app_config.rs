use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::keywords::KeywordTiers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, built once at startup and shared read-only.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub feeds: Vec<String>,
    pub articles_per_feed: usize,
    pub content_max_length: usize,
    pub content_min_length: usize,
    pub keyword_tiers: KeywordTiers,
    pub storage_dir: PathBuf,
    pub public_base_url: String,
    pub openai_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_title_model: String,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_backoff_base_ms: u64,
    pub llm_min_response_chars: usize,
    pub rewrite_titles: bool,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub max_concurrent_requests: usize,
    pub article_timeout_secs: u64,
    pub run_deadline_secs: u64,
    pub schedule: String,
    pub api_keys: Vec<String>,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }

    #[must_use]
    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }

    #[must_use]
    pub fn run_deadline(&self) -> Duration {
        Duration::from_secs(self.run_deadline_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("feeds", &self.feeds)
            .field("articles_per_feed", &self.articles_per_feed)
            .field("content_max_length", &self.content_max_length)
            .field("content_min_length", &self.content_min_length)
            .field("keyword_tiers", &self.keyword_tiers)
            .field("storage_dir", &self.storage_dir)
            .field("public_base_url", &self.public_base_url)
            .field("openai_api_key", &"[redacted]")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_title_model", &self.llm_title_model)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_backoff_base_ms", &self.llm_backoff_base_ms)
            .field("llm_min_response_chars", &self.llm_min_response_chars)
            .field("rewrite_titles", &self.rewrite_titles)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("article_timeout_secs", &self.article_timeout_secs)
            .field("run_deadline_secs", &self.run_deadline_secs)
            .field("schedule", &self.schedule)
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}
