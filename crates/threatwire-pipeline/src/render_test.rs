use std::collections::BTreeSet;

use chrono::TimeZone;
use threatwire_core::Severity;

use super::*;

fn section(kind: SectionKind, text: &str) -> BodySection {
    BodySection {
        kind,
        heading: kind.heading().to_string(),
        text: text.to_string(),
    }
}

fn article(sections: Vec<BodySection>) -> GeneratedArticle {
    GeneratedArticle {
        title: "Attackers <abuse> VPN \"gateways\"".to_string(),
        original_title: "VPN zero-day".to_string(),
        body_sections: sections,
        raw_text: "Hook text about Cisco appliances.".to_string(),
    }
}

fn classification() -> Classification {
    Classification {
        severity: Severity::High,
        matched_keywords: BTreeSet::from(["exploit".to_string(), "attack".to_string()]),
    }
}

fn meta() -> ArticleMetadata {
    ArticleMetadata {
        source_link: "https://www.securityweek.com/vpn-story/?a=1&b=2".to_string(),
        published_at: Some(Utc.with_ymd_and_hms(2024, 4, 2, 8, 0, 0).unwrap()),
        topics: vec!["exploit".to_string(), "patch".to_string()],
        created_at: Utc.with_ymd_and_hms(2024, 4, 3, 14, 7, 30).unwrap(),
    }
}

fn html_of(doc: &RenderedDocument) -> String {
    String::from_utf8(doc.html_bytes.clone()).unwrap()
}

#[test]
fn document_carries_filename_size_and_timestamp() {
    let doc = render(
        &article(vec![section(SectionKind::Introduction, "Intro.")]),
        &classification(),
        &meta(),
    );
    assert_eq!(doc.filename, "securityweek-com-20240403-1407.html");
    assert_eq!(doc.size, doc.html_bytes.len() as u64);
    assert_eq!(doc.created_at, meta().created_at);
}

#[test]
fn sections_render_in_canonical_order() {
    let doc = render(
        &article(vec![
            section(SectionKind::Conclusion, "Closing words."),
            section(SectionKind::Introduction, "Opening words."),
            section(SectionKind::Hook, "Striking fact."),
            section(SectionKind::TechnicalAnalysis, "Deep dive."),
        ]),
        &classification(),
        &meta(),
    );
    let html = html_of(&doc);
    let hook = html.find("Striking fact.").unwrap();
    let intro = html.find("<h2>Introduction</h2>").unwrap();
    let technical = html.find("<h2>Technical Analysis</h2>").unwrap();
    let conclusion = html.find("<h2>Conclusion</h2>").unwrap();
    assert!(hook < intro && intro < technical && technical < conclusion);
    assert!(!html.contains("<h2>Hook</h2>"));
}

#[test]
fn badge_tags_and_source_are_present() {
    let html = html_of(&render(
        &article(vec![section(SectionKind::Introduction, "Intro.")]),
        &classification(),
        &meta(),
    ));
    assert!(html.contains("threat-badge threat-high"));
    assert!(html.contains("HIGH THREAT"));
    assert!(html.contains("<li>attack</li><li>exploit</li><li>patch</li>"));
    assert_eq!(html.matches("<li>exploit</li>").count(), 1);
    assert!(html.contains(r#"href="https://www.securityweek.com/vpn-story/?a=1&amp;b=2""#));
    assert!(html.contains("02 April 2024"));
}

#[test]
fn title_is_escaped() {
    let html = html_of(&render(&article(Vec::new()), &classification(), &meta()));
    assert!(html.contains("<title>Attackers &lt;abuse&gt; VPN \"gateways\"</title>"));
    assert!(html.contains(r#"alt="Attackers &lt;abuse&gt; VPN &quot;gateways&quot;""#));
    assert!(!html.contains("<abuse>"));
}

#[test]
fn article_without_sections_falls_back_to_raw_text() {
    let html = html_of(&render(&article(Vec::new()), &classification(), &meta()));
    assert!(html.contains("<p>Hook text about Cisco appliances.</p>"));
}

#[test]
fn hero_image_follows_article_text() {
    let html = html_of(&render(&article(Vec::new()), &classification(), &meta()));
    assert!(html.contains("Cisco_logo"));
}

#[test]
fn rendering_is_deterministic() {
    let a = render(&article(Vec::new()), &classification(), &meta());
    let b = render(&article(Vec::new()), &classification(), &meta());
    assert_eq!(a, b);
}
