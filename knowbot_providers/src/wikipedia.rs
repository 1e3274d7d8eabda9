use std::time::Duration;

use async_trait::async_trait;
use knowbot_core::{Article, EncyclopediaProvider, ProviderError};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::http::{build_client, send_json};

/// Encyclopedia lookups through the MediaWiki action API.
pub struct WikipediaProvider {
    client: Client,
    api_url: Url,
    timeout: Duration,
}

impl WikipediaProvider {
    /// Provider for `https://{language}.wikipedia.org`.
    pub fn new(language: &str, timeout: Duration) -> anyhow::Result<Self> {
        Self::with_api_url(
            &format!("https://{language}.wikipedia.org/w/api.php"),
            timeout,
        )
    }

    pub fn with_api_url(api_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating WikipediaProvider for {api_url}");
        Ok(Self {
            client: build_client(timeout)?,
            api_url: Url::parse(api_url)?,
            timeout,
        })
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<serde_json::Value, ProviderError> {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("formatversion", "2")
            .extend_pairs(params);

        send_json(self.client.get(url), self.timeout).await
    }
}

#[async_trait]
impl EncyclopediaProvider for WikipediaProvider {
    async fn resolve(&self, query: &str) -> Result<Option<String>, ProviderError> {
        let response = self
            .query(&[("list", "search"), ("srsearch", query), ("srlimit", "1")])
            .await?;

        let results = response["query"]["search"].as_array().ok_or_else(|| {
            ProviderError::MalformedResponse("missing query.search".to_string())
        })?;

        let title = results
            .first()
            .and_then(|hit| hit["title"].as_str())
            .map(str::to_string);
        debug!("Resolved {query:?} to {title:?}");
        Ok(title)
    }

    async fn article(&self, title: &str) -> Result<Article, ProviderError> {
        let response = self
            .query(&[
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        let page = &response["query"]["pages"][0];
        if page.is_null() {
            return Err(ProviderError::MalformedResponse(
                "missing query.pages".to_string(),
            ));
        }
        if page["missing"].as_bool().unwrap_or(false) {
            return Err(ProviderError::MalformedResponse(format!(
                "article not found: {title}"
            )));
        }

        let resolved_title = page["title"].as_str().unwrap_or(title).to_string();
        let summary = page["extract"]
            .as_str()
            .ok_or_else(|| ProviderError::MalformedResponse("missing page extract".to_string()))?
            .trim()
            .to_string();

        Ok(Article {
            title: resolved_title,
            summary,
        })
    }
}
