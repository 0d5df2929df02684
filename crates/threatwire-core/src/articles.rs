use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One feed entry selected for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCandidate {
    pub source_feed: String,
    pub title: String,
    /// Always an absolute http(s) URL.
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub source_link: String,
    pub raw_text: String,
    /// Length of `raw_text` in characters; never zero.
    pub char_count: usize,
    pub extraction_strategy_used: String,
}

/// The six parts every generated article is organised into, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Hook,
    Introduction,
    TechnicalAnalysis,
    BusinessImplications,
    Recommendations,
    Conclusion,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Hook,
        SectionKind::Introduction,
        SectionKind::TechnicalAnalysis,
        SectionKind::BusinessImplications,
        SectionKind::Recommendations,
        SectionKind::Conclusion,
    ];

    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            SectionKind::Hook => "Hook",
            SectionKind::Introduction => "Introduction",
            SectionKind::TechnicalAnalysis => "Technical Analysis",
            SectionKind::BusinessImplications => "Business Implications",
            SectionKind::Recommendations => "Recommendations",
            SectionKind::Conclusion => "Conclusion",
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            SectionKind::Hook => "section-hook",
            SectionKind::Introduction => "section-introduction",
            SectionKind::TechnicalAnalysis => "section-technical-analysis",
            SectionKind::BusinessImplications => "section-business-implications",
            SectionKind::Recommendations => "section-recommendations",
            SectionKind::Conclusion => "section-conclusion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodySection {
    pub kind: SectionKind,
    pub heading: String,
    /// Markdown body of the section, excluding its own heading line.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArticle {
    pub title: String,
    pub original_title: String,
    pub body_sections: Vec<BodySection>,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub severity: Severity,
    /// Lower-cased keywords matched across every tier.
    pub matched_keywords: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub html_bytes: Vec<u8>,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Listing projection of a stored document. The serialized field names are
/// consumed by external readers and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArticleSummary {
    pub name: String,
    pub url: String,
    pub created: DateTime<Utc>,
    pub size: u64,
}
