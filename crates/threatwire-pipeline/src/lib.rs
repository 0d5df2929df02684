//! The threatwire content pipeline.
//!
//! [`Pipeline`] is the public surface: [`Pipeline::run_once`] drives feeds
//! through extraction, generation, classification, rendering and storage;
//! [`Pipeline::list_articles`] and [`Pipeline::clear_articles`] expose the
//! store.

pub mod classify;
pub mod render;
mod report;
mod run;
mod service;

pub use classify::{classify, topic_tags};
pub use render::{filename_for, render, slug, ArticleMetadata};
pub use report::{ArticleListing, ClearReport, Failure, FailureStage, RunReport};
pub use run::{system_clock, Clock, Orchestrator, RunSettings};
pub use service::{Pipeline, PipelineError};
