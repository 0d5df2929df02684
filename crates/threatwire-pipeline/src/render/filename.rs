use chrono::{DateTime, Utc};
use reqwest::Url;

/// Lower-cases `input` and collapses every run of characters other than
/// ASCII letters and digits into a single `-`, trimming separators at both ends.
#[must_use]
pub fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

/// Domain identifier for a link: its host without a leading `www.`, or
/// `"article"` when the link has no host.
#[must_use]
pub fn source_domain(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .map_or_else(
            || "article".to_string(),
            |host| host.strip_prefix("www.").unwrap_or(&host).to_string(),
        )
}

/// `slug(domain)-YYYYMMDD-HHMM.html`, evaluated in UTC.
#[must_use]
pub fn filename_for(link: &str, created_at: DateTime<Utc>) -> String {
    let mut domain = slug(&source_domain(link));
    if domain.is_empty() {
        domain.push_str("article");
    }
    format!("{domain}-{}.html", created_at.format("%Y%m%d-%H%M"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slug("Krebs On--Security.com"), "krebs-on-security-com");
        assert_eq!(slug("..leading and trailing.."), "leading-and-trailing");
        assert_eq!(slug("***"), "");
    }

    #[test]
    fn source_domain_strips_www() {
        assert_eq!(
            source_domain("https://www.bleepingcomputer.com/news/x/"),
            "bleepingcomputer.com"
        );
        assert_eq!(source_domain("http://127.0.0.1:8080/a"), "127.0.0.1");
        assert_eq!(source_domain("not a url"), "article");
    }

    #[test]
    fn filename_uses_utc_minute() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 59).unwrap();
        assert_eq!(
            filename_for("https://krebsonsecurity.com/2024/03/story/", at),
            "krebsonsecurity-com-20240307-0905.html"
        );
    }

    #[test]
    fn same_domain_same_minute_collides() {
        let a = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 58).unwrap();
        assert_eq!(
            filename_for("https://www.example.com/one", a),
            filename_for("https://example.com/two", b)
        );
    }
}
