//! Shared configuration and data model for the threatwire pipeline.

mod app_config;
pub mod articles;
mod config;
pub mod keywords;

pub use app_config::{AppConfig, Environment};
pub use articles::{
    ArticleCandidate, BodySection, Classification, ExtractedContent, GeneratedArticle,
    RenderedDocument, SectionKind, Severity, StoredArticleSummary,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use keywords::KeywordTiers;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
