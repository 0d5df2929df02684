//! Article generation: prompt, validated completion, optional headline rewrite.

use threatwire_core::{ArticleCandidate, ExtractedContent, GeneratedArticle};

use crate::client::{ChatClient, ChatRequest};
use crate::error::LlmError;
use crate::prompt::{article_messages, title_messages};
use crate::retry::RetryPolicy;
use crate::sections::parse_sections;

const ARTICLE_TEMPERATURE: f32 = 0.1;
const TITLE_TEMPERATURE: f32 = 0.4;
const TITLE_MAX_TOKENS: u32 = 30;
const MAX_TITLE_CHARS: usize = 80;

/// Model and validation settings for [`ArticleGenerator`].
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub title_model: String,
    pub max_tokens: u32,
    /// Replies shorter than this are rejected and requested once more.
    pub min_response_chars: usize,
    pub rewrite_titles: bool,
}

/// Produces [`GeneratedArticle`]s from extracted source text.
#[derive(Debug, Clone)]
pub struct ArticleGenerator {
    chat: ChatClient,
    policy: RetryPolicy,
    settings: GenerationSettings,
}

impl ArticleGenerator {
    #[must_use]
    pub fn new(chat: ChatClient, policy: RetryPolicy, settings: GenerationSettings) -> Self {
        Self {
            chat,
            policy,
            settings,
        }
    }

    /// Generates the long-form article for `candidate`.
    ///
    /// Transient failures are retried by the configured [`RetryPolicy`]. A
    /// reply that is empty or shorter than `min_response_chars` is requested
    /// one more time; a second short reply fails the article. Headline
    /// rewriting never fails the article and falls back to the source title.
    ///
    /// # Errors
    ///
    /// Returns the last [`LlmError`] once retries are exhausted, a
    /// non-transient error immediately, or [`LlmError::ResponseTooShort`] /
    /// [`LlmError::EmptyResponse`] after the validation retry.
    pub async fn generate(
        &self,
        candidate: &ArticleCandidate,
        content: &ExtractedContent,
    ) -> Result<GeneratedArticle, LlmError> {
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: article_messages(candidate, content),
            max_tokens: self.settings.max_tokens,
            temperature: ARTICLE_TEMPERATURE,
        };

        let raw_text = self.validated_completion(&request, &candidate.link).await?;
        let body_sections = parse_sections(&raw_text);
        if body_sections.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let title = if self.settings.rewrite_titles {
            self.rewrite_title(&candidate.title, &raw_text).await
        } else {
            fallback_title(&candidate.title)
        };

        tracing::info!(
            article = %candidate.link,
            chars = raw_text.chars().count(),
            sections = body_sections.len(),
            "article generated"
        );

        Ok(GeneratedArticle {
            title,
            original_title: candidate.title.clone(),
            body_sections,
            raw_text,
        })
    }

    async fn validated_completion(
        &self,
        request: &ChatRequest,
        link: &str,
    ) -> Result<String, LlmError> {
        let min = self.settings.min_response_chars;
        let mut rejected = None;

        for validation_attempt in 1..=2u32 {
            let outcome = self.policy.run(|| self.chat.complete(request)).await;
            let err = match outcome {
                Ok(text) => {
                    let len = text.chars().count();
                    if len >= min {
                        return Ok(text);
                    }
                    LlmError::ResponseTooShort { len, min }
                }
                Err(LlmError::EmptyResponse) => LlmError::EmptyResponse,
                Err(other) => return Err(other),
            };

            tracing::warn!(
                article = link,
                validation_attempt,
                error = %err,
                "completion rejected by output validation"
            );
            rejected = Some(err);
        }

        Err(rejected.unwrap_or(LlmError::EmptyResponse))
    }

    async fn rewrite_title(&self, original: &str, body: &str) -> String {
        let request = ChatRequest {
            model: self.settings.title_model.clone(),
            messages: title_messages(original, body),
            max_tokens: TITLE_MAX_TOKENS,
            temperature: TITLE_TEMPERATURE,
        };

        match self.chat.complete(&request).await {
            Ok(reply) => {
                let cleaned = reply.trim().trim_matches(['"', '\'']).trim();
                if cleaned.is_empty() {
                    fallback_title(original)
                } else {
                    fallback_title(cleaned)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "headline rewrite failed, keeping source title");
                fallback_title(original)
            }
        }
    }
}

/// Returns `title` unchanged when it fits in 80 characters, otherwise its
/// first 77 characters followed by `...`.
#[must_use]
pub fn fallback_title(title: &str) -> String {
    let title = title.trim();
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let kept: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_title_keeps_short_titles() {
        assert_eq!(fallback_title("  Short title "), "Short title");
    }

    #[test]
    fn fallback_title_truncates_long_titles() {
        let long = "a".repeat(100);
        let out = fallback_title(&long);
        assert_eq!(out.chars().count(), 80);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn fallback_title_boundary_is_inclusive() {
        let exact = "b".repeat(80);
        assert_eq!(fallback_title(&exact), exact);
    }
}
