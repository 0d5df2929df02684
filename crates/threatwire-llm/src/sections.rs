//! Splits a generated markdown article into its six canonical parts.

use threatwire_core::{BodySection, SectionKind};

/// Keyword fragments recognising each part from a heading, checked in this
/// order. Technical analysis goes last because "analysis" shows up in other
/// headings too.
const HEADING_KEYWORDS: &[(SectionKind, &[&str])] = &[
    (SectionKind::Hook, &["hook", "opening"]),
    (
        SectionKind::Introduction,
        &["introduction", "intro", "overview", "what happened"],
    ),
    (
        SectionKind::BusinessImplications,
        &["business", "implication", "impact"],
    ),
    (
        SectionKind::Recommendations,
        &["recommend", "mitigation", "defen", "what to do", "action"],
    ),
    (
        SectionKind::Conclusion,
        &["conclusion", "takeaway", "final thoughts", "next steps", "summary"],
    ),
    (
        SectionKind::TechnicalAnalysis,
        &["technical", "analysis", "attack", "how it works", "details"],
    ),
];

/// Maps a heading to the part it introduces, if recognisable.
#[must_use]
pub fn classify_heading(heading: &str) -> Option<SectionKind> {
    let lower = heading.to_lowercase();
    HEADING_KEYWORDS
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| lower.contains(f)))
        .map(|(kind, _)| *kind)
}

/// Parses `raw` into ordered sections.
///
/// `#`/`##` lines start a section; `###` and deeper stay inside the section
/// text. Text before the first heading becomes the hook. A heading that
/// matches no part folds into the preceding section as a `###` subheading.
/// Sections left without text are dropped.
#[must_use]
pub fn parse_sections(raw: &str) -> Vec<BodySection> {
    let mut sections: Vec<BodySection> = Vec::new();
    let mut current = BodySection {
        kind: SectionKind::Hook,
        heading: SectionKind::Hook.heading().to_string(),
        text: String::new(),
    };

    for line in raw.lines() {
        let Some(heading) = main_heading(line) else {
            current.text.push_str(line);
            current.text.push('\n');
            continue;
        };

        if let Some(kind) = classify_heading(&heading) {
            push_section(&mut sections, current);
            current = BodySection {
                kind,
                heading,
                text: String::new(),
            };
        } else {
            current.text.push_str("### ");
            current.text.push_str(&heading);
            current.text.push('\n');
        }
    }
    push_section(&mut sections, current);

    sections
}

fn push_section(sections: &mut Vec<BodySection>, mut section: BodySection) {
    section.text = section.text.trim().to_string();
    if !section.text.is_empty() {
        sections.push(section);
    }
}

/// Returns the cleaned heading text when `line` is a level-1 or level-2
/// markdown heading.
fn main_heading(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=2).contains(&hashes) {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let cleaned = strip_numbering(rest.trim()).trim_matches('*').trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Drops a leading "1." / "2)" style prefix.
fn strip_numbering(heading: &str) -> &str {
    let digits = heading.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return heading;
    }
    heading[digits..]
        .strip_prefix(['.', ')', ':'])
        .map_or(heading, str::trim_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "\
**Over 10,000 servers** were exposed within hours.

## Introduction
A zero-day in the VPN appliance was exploited.

## Technical Analysis
### Attack Methodology
Attackers chained two bugs.

## Indicators of Compromise
- 203.0.113.7

## Business Implications
Downtime costs rose.

## Security Recommendations
- Patch now

## Conclusion
Stay alert.
";

    #[test]
    fn parses_six_parts_in_order() {
        let sections = parse_sections(ARTICLE);
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
    }

    #[test]
    fn preamble_becomes_hook() {
        let sections = parse_sections(ARTICLE);
        assert_eq!(sections[0].kind, SectionKind::Hook);
        assert!(sections[0].text.starts_with("**Over 10,000 servers**"));
    }

    #[test]
    fn unknown_heading_folds_into_previous_section() {
        let sections = parse_sections(ARTICLE);
        let technical = &sections[2];
        assert_eq!(technical.kind, SectionKind::TechnicalAnalysis);
        assert!(technical.text.contains("### Attack Methodology"));
        assert!(technical.text.contains("### Indicators of Compromise"));
        assert!(technical.text.contains("203.0.113.7"));
    }

    #[test]
    fn numbered_and_bold_headings_are_recognised() {
        let sections = parse_sections("## 1. **Opening Hook**\nBig news.\n## 6) Conclusion\nDone.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Hook);
        assert_eq!(sections[0].heading, "Opening Hook");
        assert_eq!(sections[1].kind, SectionKind::Conclusion);
    }

    #[test]
    fn text_without_headings_is_a_single_hook() {
        let sections = parse_sections("Just one paragraph.\n\nAnd another.");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Hook);
        assert_eq!(sections[0].text, "Just one paragraph.\n\nAnd another.");
    }

    #[test]
    fn empty_sections_are_dropped() {
        let sections = parse_sections("## Introduction\n\n## Conclusion\nEnd.");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Conclusion);
    }

    #[test]
    fn classify_heading_prefers_business_over_analysis() {
        assert_eq!(
            classify_heading("Business Impact Analysis"),
            Some(SectionKind::BusinessImplications)
        );
        assert_eq!(
            classify_heading("Technical Analysis"),
            Some(SectionKind::TechnicalAnalysis)
        );
        assert_eq!(classify_heading("Indicators of Compromise"), None);
    }
}
