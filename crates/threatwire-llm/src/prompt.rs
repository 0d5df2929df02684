use threatwire_core::{ArticleCandidate, ExtractedContent, SectionKind};

use crate::client::ChatMessage;

const ARTICLE_SYSTEM_PROMPT: &str = "You are a senior cybersecurity journalist writing for \
security professionals. Produce comprehensive, factual articles from the supplied source \
material. Use only details present in the source: company names, technical specifics, dates, \
figures and quotes. Never invent facts.";

const TITLE_SYSTEM_PROMPT: &str = "You write concise, professional headlines for a \
cybersecurity news site. Reply with the headline only.";

/// Characters of the generated body shown to the title model.
pub const TITLE_PREVIEW_CHARS: usize = 500;

/// Builds the messages asking for a six-part article about `candidate`.
#[must_use]
pub fn article_messages(candidate: &ArticleCandidate, content: &ExtractedContent) -> Vec<ChatMessage> {
    let published = candidate
        .published_at
        .map_or_else(|| "unknown".to_string(), |d| d.format("%d %B %Y").to_string());

    let structure: String = SectionKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{}. ## {} - {}\n", i + 1, kind.heading(), section_brief(*kind)))
        .collect();

    let user = format!(
        "ORIGINAL TITLE: {title}\n\
         SOURCE URL: {link}\n\
         SOURCE FEED: {feed}\n\
         PUBLISHED: {published}\n\n\
         FULL ARTICLE CONTENT:\n{body}\n\n\
         Write an analysis article with exactly these six main sections, in this order, each \
         introduced by a level-two markdown heading with the given name:\n\
         {structure}\n\
         GUIDELINES:\n\
         - Write in UK English.\n\
         - At least 1000 words of substantive content.\n\
         - Use ## only for the six main headings and ### for subsections.\n\
         - Use - for bullet points and **bold** for key terms.\n\
         - Keep paragraphs to two to four sentences.\n\
         - Do not add a title line before the first section.",
        title = candidate.title,
        link = candidate.link,
        feed = candidate.source_feed,
        body = content.raw_text,
    );

    vec![
        ChatMessage::system(ARTICLE_SYSTEM_PROMPT),
        ChatMessage::user(user),
    ]
}

/// Builds the messages asking for a fresh headline.
#[must_use]
pub fn title_messages(original_title: &str, body: &str) -> Vec<ChatMessage> {
    let preview: String = body.chars().take(TITLE_PREVIEW_CHARS).collect();
    let user = format!(
        "Original title: \"{original_title}\"\n\
         Content preview: \"{preview}\"\n\n\
         Write a new headline covering the same story. Requirements:\n\
         - Different wording from the original title.\n\
         - Professional, active voice, focused on the security or business impact.\n\
         - At most 80 characters.\n\
         - Avoid generic openers such as \"New Study\" or \"Report Shows\"."
    );

    vec![ChatMessage::system(TITLE_SYSTEM_PROMPT), ChatMessage::user(user)]
}

fn section_brief(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Hook => "open with a striking fact or figure from the source",
        SectionKind::Introduction => "what happened and why it matters, two to three paragraphs",
        SectionKind::TechnicalAnalysis => {
            "technical details, attack methods and impact, with ### subsections"
        }
        SectionKind::BusinessImplications => "the wider effect on organisations and industries",
        SectionKind::Recommendations => "specific, actionable advice for security teams",
        SectionKind::Conclusion => "key takeaways and next steps",
    }
}
