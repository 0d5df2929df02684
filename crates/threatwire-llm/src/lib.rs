//! Long-form article generation over an OpenAI-compatible chat API.
//!
//! [`ChatClient`] performs single chat-completion calls, [`RetryPolicy`]
//! wraps them with bounded exponential back-off, and [`ArticleGenerator`]
//! builds the six-part prompt, validates the reply, and splits it into
//! [`BodySection`]s.
//!
//! [`BodySection`]: threatwire_core::BodySection

pub mod client;
pub mod error;
pub mod generate;
pub mod prompt;
pub mod retry;
pub mod sections;

pub use client::{ChatClient, ChatMessage, ChatRequest};
pub use error::LlmError;
pub use generate::{fallback_title, ArticleGenerator, GenerationSettings};
pub use retry::RetryPolicy;
pub use sections::parse_sections;
