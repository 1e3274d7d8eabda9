#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Shared domain types and collaborator contracts for knowbot.
//!
//! Every remote service the assistant talks to (chat completion, web search,
//! encyclopedia) is reached through one of the traits defined here, so the
//! conversation layer never depends on a concrete HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod util;

pub use error::ProviderError;
pub use util::truncate_chars;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Outbound chat-completion request, serialized as-is into the request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A single web search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub body: String,
}

/// An encyclopedia article resolved from a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub summary: String,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(&self, request: &ChatRequest<'_>) -> Result<LLMResponse, ProviderError>;
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns at most `max_results` hits, in ranking order. An empty vector
    /// is a valid answer, not an error.
    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<SearchHit>, ProviderError>;
}

/// Two-step encyclopedia contract: resolve a query to the best matching
/// article title, then fetch that article.
#[async_trait]
pub trait EncyclopediaProvider: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Option<String>, ProviderError>;

    async fn article(&self, title: &str) -> Result<Article, ProviderError>;
}

#[async_trait]
impl<T: LLMProvider + ?Sized> LLMProvider for Arc<T> {
    async fn chat(&self, request: &ChatRequest<'_>) -> Result<LLMResponse, ProviderError> {
        (**self).chat(request).await
    }
}

#[async_trait]
impl<T: SearchProvider + ?Sized> SearchProvider for Arc<T> {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        (**self).search(query, max_results).await
    }
}

#[async_trait]
impl<T: EncyclopediaProvider + ?Sized> EncyclopediaProvider for Arc<T> {
    async fn resolve(&self, query: &str) -> Result<Option<String>, ProviderError> {
        (**self).resolve(query).await
    }

    async fn article(&self, title: &str) -> Result<Article, ProviderError> {
        (**self).article(title).await
    }
}

/// An optional collaborator, resolved once at startup.
///
/// A disabled or unconstructible collaborator is `Unavailable` for the whole
/// lifetime of the session instead of being rediscovered on each call.
#[derive(Debug, Clone)]
pub enum Collaborator<T> {
    Available(T),
    Unavailable,
}

impl<T> Collaborator<T> {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    #[must_use]
    pub const fn as_available(&self) -> Option<&T> {
        match self {
            Self::Available(inner) => Some(inner),
            Self::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Collaborator<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unavailable, Self::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let msg = ChatMessage::assistant("hi");
        let json = serde_json::to_value(&msg).unwrap_or_default();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn chat_request_wire_shape() {
        let messages = vec![ChatMessage::user("hello")];
        let request = ChatRequest {
            model: "deepseek/deepseek-chat",
            messages: &messages,
            temperature: 0.5,
            max_tokens: 1000,
        };
        let json = serde_json::to_value(&request).unwrap_or_default();
        assert_eq!(json["model"], "deepseek/deepseek-chat");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["max_tokens"], 1000);
    }

    #[test]
    fn collaborator_from_option() {
        let available: Collaborator<u8> = Some(3).into();
        assert!(available.is_available());
        assert_eq!(available.as_available(), Some(&3));

        let missing: Collaborator<u8> = None.into();
        assert!(!missing.is_available());
        assert!(missing.as_available().is_none());
    }

    struct Echo;

    #[async_trait]
    impl LLMProvider for Echo {
        async fn chat(&self, request: &ChatRequest<'_>) -> Result<LLMResponse, ProviderError> {
            Ok(LLMResponse {
                content: request
                    .messages
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_default(),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn arc_provider_delegates() {
        let provider: Arc<dyn LLMProvider> = Arc::new(Echo);
        let messages = vec![ChatMessage::user("ping")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.0,
            max_tokens: 1,
        };
        let Ok(response) = provider.chat(&request).await else {
            panic!("echo provider failed");
        };
        assert_eq!(response.content, "ping");
    }
}
