//! Feed reading and article text extraction.
//!
//! [`FeedReader`] turns an RSS/Atom URL into [`ArticleCandidate`]s and
//! [`ContentExtractor`] recovers the readable body of each linked page using
//! an ordered chain of extraction strategies.
//!
//! [`ArticleCandidate`]: threatwire_core::ArticleCandidate

pub mod client;
pub mod error;
pub mod extract;
pub mod feed;

pub use client::build_http_client;
pub use error::ScraperError;
pub use extract::{extract_from_html, ContentExtractor, Strategy};
pub use feed::{parse_feed, FeedReader};
