//! Turns a generated article into a self-contained HTML document.

mod filename;
mod hero;
mod markdown;
mod template;

use chrono::{DateTime, Utc};
use threatwire_core::{
    BodySection, Classification, GeneratedArticle, RenderedDocument, SectionKind,
};

pub use filename::{filename_for, slug, source_domain};
pub use hero::{hero_image_for, DEFAULT_HERO_IMAGE};
pub use markdown::markdown_to_html;

/// Context the document is rendered with besides the article itself.
#[derive(Debug, Clone)]
pub struct ArticleMetadata {
    /// Link to the original story, shown as the source attribution.
    pub source_link: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Topical tags shown next to the matched severity keywords.
    pub topics: Vec<String>,
    /// Timestamp the filename and footer are derived from.
    pub created_at: DateTime<Utc>,
}

/// Renders `article` into a [`RenderedDocument`].
///
/// Never fails: sections are placed in canonical order whatever order they
/// arrive in, and an article without sections falls back to its raw text.
#[must_use]
pub fn render(
    article: &GeneratedArticle,
    classification: &Classification,
    meta: &ArticleMetadata,
) -> RenderedDocument {
    let mut sections: Vec<&BodySection> = article.body_sections.iter().collect();
    sections.sort_by_key(|s| s.kind);

    let body = if sections.is_empty() {
        markdown_to_html(&article.raw_text)
    } else {
        sections.iter().map(|s| render_section(s)).collect()
    };

    let mut tags: Vec<&str> = classification
        .matched_keywords
        .iter()
        .map(String::as_str)
        .collect();
    for topic in &meta.topics {
        if !tags.contains(&topic.as_str()) {
            tags.push(topic);
        }
    }

    let opening: String = article.raw_text.chars().take(500).collect();
    let page = template::Page {
        title: &article.title,
        hero_image: hero_image_for(&format!("{} {opening}", article.title)),
        severity: classification.severity,
        tags: &tags,
        body: &body,
        source_link: &meta.source_link,
        published_at: meta.published_at,
        content_chars: article.raw_text.chars().count(),
        generated_at: meta.created_at,
    };
    let html_bytes = page.to_html().into_bytes();

    RenderedDocument {
        filename: filename_for(&meta.source_link, meta.created_at),
        size: html_bytes.len() as u64,
        html_bytes,
        created_at: meta.created_at,
    }
}

fn render_section(section: &BodySection) -> String {
    let inner = markdown_to_html(&section.text);
    if section.kind == SectionKind::Hook {
        return format!("<div class=\"lead {}\">\n{inner}</div>\n", section.kind.css_class());
    }
    format!(
        "<section class=\"article-section {}\">\n<h2>{}</h2>\n{inner}</section>\n",
        section.kind.css_class(),
        html_escape::encode_text(section.kind.heading()),
    )
}

#[cfg(test)]
#[path = "../render_test.rs"]
mod tests;
