//! RSS/Atom feed reader.

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use threatwire_core::ArticleCandidate;

use crate::error::ScraperError;

/// Fetches feeds and yields the first `limit` usable entries.
#[derive(Debug, Clone)]
pub struct FeedReader {
    client: Client,
}

impl FeedReader {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `feed_url` and returns up to `limit` candidates in document order.
    ///
    /// Every call re-fetches the feed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::FeedUnavailable`] when the feed cannot be
    /// fetched, answers with a non-success status, or cannot be parsed.
    pub async fn read(
        &self,
        feed_url: &str,
        limit: usize,
    ) -> Result<Vec<ArticleCandidate>, ScraperError> {
        let response = self
            .client
            .get(feed_url)
            .send()
            .await
            .map_err(|e| ScraperError::feed(feed_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::feed(
                feed_url,
                format!("unexpected HTTP status {}", status.as_u16()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScraperError::feed(feed_url, e))?;

        let candidates = parse_feed(feed_url, &body, limit)?;
        tracing::debug!(
            feed = feed_url,
            count = candidates.len(),
            "feed parsed"
        );
        Ok(candidates)
    }
}

/// Parses a feed document into at most `limit` candidates.
///
/// Entries without an absolute http(s) link are skipped and do not count
/// toward `limit`.
///
/// # Errors
///
/// Returns [`ScraperError::FeedUnavailable`] if `body` is not a valid
/// RSS/Atom document.
pub fn parse_feed(
    feed_url: &str,
    body: &[u8],
    limit: usize,
) -> Result<Vec<ArticleCandidate>, ScraperError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| ScraperError::feed(feed_url, e))?;

    let candidates = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let Some(link) = entry
                .links
                .iter()
                .map(|l| l.href.trim())
                .find(|href| is_absolute_http(href))
                .map(ToOwned::to_owned)
            else {
                tracing::debug!(feed = feed_url, entry = %entry.id, "skipping entry without usable link");
                return None;
            };

            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string());

            let published_at: Option<DateTime<Utc>> = entry.published.or(entry.updated);

            Some(ArticleCandidate {
                source_feed: feed_url.to_string(),
                title,
                link,
                published_at,
            })
        })
        .take(limit)
        .collect();

    Ok(candidates)
}

fn is_absolute_http(href: &str) -> bool {
    Url::parse(href)
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Security News</title>
    <link>https://news.example.com/</link>
    <description>test</description>
    <item>
      <title>First story</title>
      <link>https://news.example.com/first</link>
      <pubDate>Tue, 02 Jan 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Relative link</title>
      <link>/relative</link>
    </item>
    <item>
      <title>Second story</title>
      <link>https://news.example.com/second</link>
    </item>
    <item>
      <title>Third story</title>
      <link>https://news.example.com/third</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parse_feed_respects_limit_and_order() {
        let candidates = parse_feed("https://news.example.com/feed", RSS.as_bytes(), 2).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "First story");
        assert_eq!(candidates[1].title, "Second story");
        assert_eq!(candidates[0].source_feed, "https://news.example.com/feed");
    }

    #[test]
    fn parse_feed_skips_relative_links() {
        let candidates = parse_feed("https://news.example.com/feed", RSS.as_bytes(), 10).unwrap();
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| c.link.starts_with("https://")));
    }

    #[test]
    fn parse_feed_reads_publish_date() {
        let candidates = parse_feed("https://news.example.com/feed", RSS.as_bytes(), 1).unwrap();
        let published = candidates[0].published_at.expect("pubDate");
        assert_eq!(published.to_rfc3339(), "2024-01-02T10:00:00+00:00");
    }

    #[test]
    fn parse_feed_accepts_atom() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom News</title>
  <id>urn:uuid:feed</id>
  <updated>2024-01-02T10:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:uuid:1</id>
    <link href="https://atom.example.com/entry"/>
    <updated>2024-01-02T10:00:00Z</updated>
  </entry>
</feed>"#;
        let candidates = parse_feed("https://atom.example.com/feed", atom.as_bytes(), 5).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].link, "https://atom.example.com/entry");
        assert!(candidates[0].published_at.is_some());
    }

    #[test]
    fn parse_feed_rejects_garbage() {
        let result = parse_feed("https://bad.example.com/feed", b"<html>nope</html>", 3);
        assert!(matches!(
            result,
            Err(ScraperError::FeedUnavailable { ref url, .. }) if url == "https://bad.example.com/feed"
        ));
    }

    #[test]
    fn parse_feed_defaults_missing_title() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title><link>https://x.example/</link><description>d</description>
<item><link>https://x.example/a</link></item>
</channel></rss>"#;
        let candidates = parse_feed("https://x.example/feed", rss.as_bytes(), 5).unwrap();
        assert_eq!(candidates[0].title, "Untitled");
    }
}
