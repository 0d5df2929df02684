//! Keyword-based severity classification and topical tagging.

use std::collections::BTreeSet;

use threatwire_core::{Classification, KeywordTiers, Severity};

/// Vocabulary topical tags are drawn from, in display priority.
pub const TOPIC_VOCABULARY: [&str; 29] = [
    "malware",
    "ransomware",
    "phishing",
    "vulnerability",
    "exploit",
    "breach",
    "hack",
    "trojan",
    "virus",
    "botnet",
    "ddos",
    "apt",
    "zero-day",
    "cve",
    "patch",
    "firewall",
    "encryption",
    "authentication",
    "cybersecurity",
    "threat",
    "attack",
    "security",
    "compromise",
    "incident",
    "data breach",
    "spyware",
    "rootkit",
    "backdoor",
    "social engineering",
];

pub const MAX_TOPIC_TAGS: usize = 8;

/// Classifies the combined `title` and `body`.
///
/// Matching is case-insensitive substring search. Severity is the highest
/// tier with any match, or [`Severity::Low`]; `matched_keywords` holds the
/// matches from every tier.
#[must_use]
pub fn classify(title: &str, body: &str, tiers: &KeywordTiers) -> Classification {
    let text = format!("{title} {body}").to_lowercase();
    let tier_matches = |keywords: &[String]| -> Vec<String> {
        keywords
            .iter()
            .filter(|k| !k.is_empty() && text.contains(k.as_str()))
            .cloned()
            .collect()
    };

    let critical = tier_matches(&tiers.critical);
    let high = tier_matches(&tiers.high);
    let medium = tier_matches(&tiers.medium);

    let severity = if !critical.is_empty() {
        Severity::Critical
    } else if !high.is_empty() {
        Severity::High
    } else if !medium.is_empty() {
        Severity::Medium
    } else {
        Severity::Low
    };

    let matched_keywords: BTreeSet<String> =
        critical.into_iter().chain(high).chain(medium).collect();

    Classification {
        severity,
        matched_keywords,
    }
}

/// Up to [`MAX_TOPIC_TAGS`] vocabulary terms found in `text`, in vocabulary
/// order.
#[must_use]
pub fn topic_tags(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    TOPIC_VOCABULARY
        .iter()
        .copied()
        .filter(|term| lower.contains(term))
        .take(MAX_TOPIC_TAGS)
        .collect()
}
