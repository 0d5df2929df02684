use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never counts as article content.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "noscript", "form", "iframe", "svg",
    "button", "template",
];

/// Class names marking page furniture inside otherwise useful containers.
const SKIPPED_CLASSES: &[&str] = &[
    "advertisement",
    "ads",
    "social-share",
    "comments",
    "navigation",
    "sidebar",
    "related-articles",
];

/// Elements that end the current paragraph.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "pre", "br", "tr", "td", "th", "table", "figure", "figcaption", "dd", "dt",
];

/// Containers that are considered when looking for the largest text block.
const BLOCK_CONTAINERS: &str = "div, section, article, main, td";

const GENERIC_SELECTORS: &[&str] = &[
    "article",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".content",
    ".main-content",
    "[role=\"main\"]",
    ".story-body",
    "main article",
    ".post-body",
];

/// Host fragment to the selectors known to wrap that site's article body.
const SITE_SELECTORS: &[(&str, &[&str])] = &[
    (
        "krebsonsecurity.com",
        &[".entry-content", ".post-content", "article .content"],
    ),
    (
        "bleepingcomputer.com",
        &[".articleBody", ".news_content", ".article_section"],
    ),
    (
        "thehackernews.com",
        &[".post-body", ".story-content", ".article-content"],
    ),
    (
        "darkreading.com",
        &[".article-content", ".content-body", ".post-content"],
    ),
    (
        "securityweek.com",
        &[".field-name-body", ".article-body", ".content"],
    ),
    (
        "welivesecurity.com",
        &[".post-content", ".entry-content", ".article-body"],
    ),
];

/// One way of locating the main text of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// A selector known to hold article bodies on a specific site.
    Site(&'static str),
    /// A common semantic or content-class container.
    Selector(&'static str),
    /// The container with the most paragraph text directly inside it.
    LargestBlock,
    /// Everything inside `<body>`.
    Body,
}

impl Strategy {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Strategy::Site(sel) => format!("site:{sel}"),
            Strategy::Selector(sel) => format!("selector:{sel}"),
            Strategy::LargestBlock => "largest-block".to_string(),
            Strategy::Body => "body".to_string(),
        }
    }

    /// Returns the strategy's candidate text, or `None` when it finds nothing.
    #[must_use]
    pub fn apply(&self, document: &Html) -> Option<String> {
        let text = match self {
            Strategy::Site(sel) | Strategy::Selector(sel) => {
                let selector = parse_selector(sel)?;
                document.select(&selector).next().map(element_text)?
            }
            Strategy::LargestBlock => largest_block(document)?,
            Strategy::Body => {
                let selector = parse_selector("body")?;
                document
                    .select(&selector)
                    .next()
                    .map_or_else(|| element_text(document.root_element()), element_text)
            }
        };

        (!text.is_empty()).then_some(text)
    }
}

/// Builds the ordered strategy chain for a page on `host`.
///
/// Site-specific selectors come first, then the generic containers, then the
/// two whole-page fallbacks.
#[must_use]
pub fn strategies_for(host: &str) -> Vec<Strategy> {
    let host = host.to_ascii_lowercase();
    let mut chain: Vec<Strategy> = SITE_SELECTORS
        .iter()
        .filter(|(fragment, _)| host.contains(fragment))
        .flat_map(|(_, selectors)| selectors.iter().copied().map(Strategy::Site))
        .collect();

    chain.extend(GENERIC_SELECTORS.iter().copied().map(Strategy::Selector));
    chain.push(Strategy::LargestBlock);
    chain.push(Strategy::Body);
    chain
}

fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!(selector = raw, error = %e, "invalid CSS selector");
            None
        }
    }
}

/// Readable text under `element`, one paragraph per block element, paragraphs
/// separated by a blank line.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    collect_text(element, &mut paragraphs, &mut current);
    flush(&mut paragraphs, &mut current);
    paragraphs.join("\n\n")
}

fn collect_text(element: ElementRef<'_>, paragraphs: &mut Vec<String>, current: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                current.push_str(text);
            }
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_skipped(child_el) {
                    continue;
                }
                let is_block = BLOCK_TAGS.contains(&child_el.value().name());
                if is_block {
                    flush(paragraphs, current);
                }
                collect_text(child_el, paragraphs, current);
                if is_block {
                    flush(paragraphs, current);
                }
            }
            _ => {}
        }
    }
}

fn flush(paragraphs: &mut Vec<String>, current: &mut String) {
    let collapsed = collapse_whitespace(current);
    if !collapsed.is_empty() {
        paragraphs.push(collapsed);
    }
    current.clear();
}

fn is_skipped(element: ElementRef<'_>) -> bool {
    let value = element.value();
    SKIPPED_TAGS.contains(&value.name())
        || value
            .classes()
            .any(|class| SKIPPED_CLASSES.contains(&class))
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds the container whose direct `<p>` children hold the most text.
/// Ties go to the container that appears first in the document.
fn largest_block(document: &Html) -> Option<String> {
    let containers = parse_selector(BLOCK_CONTAINERS)?;

    let mut best: Option<(usize, String)> = None;
    for container in document.select(&containers) {
        if is_skipped(container) {
            continue;
        }
        let paragraphs: Vec<String> = container
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "p" && !is_skipped(*child))
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        if paragraphs.is_empty() {
            continue;
        }

        let text = paragraphs.join("\n\n");
        let len = text.chars().count();
        if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
            best = Some((len, text));
        }
    }

    best.map(|(_, text)| text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_for_known_site_start_with_site_selectors() {
        let chain = strategies_for("www.KrebsOnSecurity.com");
        assert_eq!(chain[0], Strategy::Site(".entry-content"));
        assert_eq!(chain[3], Strategy::Selector("article"));
        assert_eq!(chain.last(), Some(&Strategy::Body));
    }

    #[test]
    fn strategies_for_unknown_site_use_generic_chain() {
        let chain = strategies_for("blog.example.org");
        assert_eq!(chain[0], Strategy::Selector("article"));
        assert_eq!(chain.len(), GENERIC_SELECTORS.len() + 2);
        assert_eq!(chain[chain.len() - 2], Strategy::LargestBlock);
    }

    #[test]
    fn every_selector_parses() {
        for sel in GENERIC_SELECTORS
            .iter()
            .chain(SITE_SELECTORS.iter().flat_map(|(_, s)| s.iter()))
        {
            assert!(Selector::parse(sel).is_ok(), "selector {sel} failed to parse");
        }
        assert!(Selector::parse(BLOCK_CONTAINERS).is_ok());
    }

    #[test]
    fn element_text_skips_boilerplate_and_splits_paragraphs() {
        let html = Html::parse_document(
            "<html><body><article><h1>Title</h1><script>var x = 1;</script>\
             <p>First   paragraph\n text.</p><aside>Sidebar junk</aside>\
             <div class=\"social-share\">Share me</div><p>Second paragraph.</p></article></body></html>",
        );
        let text = Strategy::Selector("article").apply(&html).unwrap();
        assert_eq!(text, "Title\n\nFirst paragraph text.\n\nSecond paragraph.");
    }

    #[test]
    fn largest_block_prefers_most_paragraph_text() {
        let html = Html::parse_document(
            "<html><body><div id=\"a\"><p>short</p></div>\
             <div id=\"b\"><p>this is much longer paragraph text</p><p>and more</p></div></body></html>",
        );
        let text = Strategy::LargestBlock.apply(&html).unwrap();
        assert!(text.starts_with("this is much longer"));
    }

    #[test]
    fn largest_block_tie_goes_to_first_container() {
        let html = Html::parse_document(
            "<html><body><section><p>aaaa</p></section><section><p>bbbb</p></section></body></html>",
        );
        assert_eq!(Strategy::LargestBlock.apply(&html).as_deref(), Some("aaaa"));
    }

    #[test]
    fn selector_without_match_returns_none() {
        let html = Html::parse_document("<html><body><p>text</p></body></html>");
        assert_eq!(Strategy::Selector(".post-body").apply(&html), None);
    }

    #[test]
    fn body_strategy_ignores_navigation() {
        let html = Html::parse_document(
            "<html><body><nav>Home | About</nav><p>Only this.</p><footer>(c)</footer></body></html>",
        );
        assert_eq!(Strategy::Body.apply(&html).as_deref(), Some("Only this."));
    }
}
