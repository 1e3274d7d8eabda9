use std::time::Duration;

use async_trait::async_trait;
use knowbot_core::{ChatRequest, LLMProvider, LLMResponse, ProviderError, Usage};
use reqwest::Client;
use tracing::{debug, info};

use crate::http::{build_client, send_json};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Chat-completion client for OpenRouter (and any OpenAI-compatible endpoint).
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
    referer: Option<String>,
    title: Option<String>,
}

impl OpenRouterProvider {
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating OpenRouterProvider");
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            referer: None,
            title: None,
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the `HTTP-Referer` and `X-Title` headers OpenRouter uses for app
    /// attribution.
    #[must_use]
    pub fn with_attribution(mut self, referer: Option<String>, title: Option<String>) -> Self {
        self.referer = referer;
        self.title = title;
        self
    }

    fn parse_reply(response: &serde_json::Value) -> Result<LLMResponse, ProviderError> {
        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::MalformedResponse("missing choices[0].message.content".to_string())
            })?
            .to_string();

        let usage = response.get("usage").and_then(|u| {
            let field = |name: &str| {
                u.get(name)
                    .and_then(serde_json::Value::as_u64)
                    .and_then(|v| u32::try_from(v).ok())
            };
            Some(Usage {
                prompt_tokens: field("prompt_tokens")?,
                completion_tokens: field("completion_tokens")?,
                total_tokens: field("total_tokens")?,
            })
        });

        Ok(LLMResponse { content, usage })
    }
}

#[async_trait]
impl LLMProvider for OpenRouterProvider {
    async fn chat(&self, request: &ChatRequest<'_>) -> Result<LLMResponse, ProviderError> {
        debug!(
            "Sending {} messages to model {}",
            request.messages.len(),
            request.model
        );

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            builder = builder.header("X-Title", title);
        }

        let response = send_json(builder, self.timeout).await?;
        let reply = Self::parse_reply(&response)?;

        if let Some(usage) = reply.usage {
            debug!(
                "Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(reply)
    }
}
