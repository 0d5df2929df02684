//! Severity keyword tiers used by the classifier.

pub const DEFAULT_CRITICAL_KEYWORDS: &str =
    "zero-day,critical,emergency,widespread,global,critical vulnerability";
pub const DEFAULT_HIGH_KEYWORDS: &str =
    "breach,ransomware,apt,exploit,vulnerability,attack,compromise";
pub const DEFAULT_MEDIUM_KEYWORDS: &str = "phishing,malware,threat,security,incident";

/// Three ordered keyword sets, highest priority first. All entries are
/// lower-cased and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTiers {
    pub critical: Vec<String>,
    pub high: Vec<String>,
    pub medium: Vec<String>,
}

impl KeywordTiers {
    /// Builds tiers from three comma-separated lists.
    #[must_use]
    pub fn from_lists(critical: &str, high: &str, medium: &str) -> Self {
        Self {
            critical: parse_keyword_list(critical),
            high: parse_keyword_list(high),
            medium: parse_keyword_list(medium),
        }
    }
}

impl Default for KeywordTiers {
    fn default() -> Self {
        Self::from_lists(
            DEFAULT_CRITICAL_KEYWORDS,
            DEFAULT_HIGH_KEYWORDS,
            DEFAULT_MEDIUM_KEYWORDS,
        )
    }
}

/// Splits a comma-separated list, trimming and lower-casing each entry and
/// dropping blanks and repeats.
#[must_use]
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for keyword in raw.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        let keyword = keyword.to_lowercase();
        if !out.contains(&keyword) {
            out.push(keyword);
        }
    }
    out
}
