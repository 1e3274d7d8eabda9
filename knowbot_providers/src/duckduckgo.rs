use std::time::Duration;

use async_trait::async_trait;
use knowbot_core::{ProviderError, SearchHit, SearchProvider};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::http::{build_client, send_json};

pub const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com/";

/// Web search backed by the DuckDuckGo Instant Answer API.
pub struct DuckDuckGoSearch {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating DuckDuckGoSearch");
        Ok(Self {
            client: build_client(timeout)?,
            base_url: Url::parse(base_url)?,
            timeout,
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("no_html", "1")
            .append_pair("skip_disambig", "1");

        let response = send_json(self.client.get(url), self.timeout).await?;
        if !response.is_object() {
            return Err(ProviderError::MalformedResponse(
                "expected a JSON object".to_string(),
            ));
        }

        let hits = collect_hits(&response, max_results);
        debug!("Search for {query:?} returned {} hits", hits.len());
        Ok(hits)
    }
}

/// Gather hits in display order: the abstract first, then related topics
/// (nested topic groups flattened in place).
fn collect_hits(response: &Value, max_results: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    let heading = response["Heading"].as_str().unwrap_or_default();
    let abstract_text = response["AbstractText"].as_str().unwrap_or_default();
    if !heading.is_empty() && !abstract_text.is_empty() {
        hits.push(SearchHit {
            title: heading.to_string(),
            body: abstract_text.to_string(),
        });
    }

    if let Some(topics) = response["RelatedTopics"].as_array() {
        collect_topics(topics, &mut hits);
    }

    hits.truncate(max_results);
    hits
}

fn collect_topics(topics: &[Value], hits: &mut Vec<SearchHit>) {
    for topic in topics {
        if let Some(group) = topic["Topics"].as_array() {
            collect_topics(group, hits);
        } else if let Some(hit) = topic_hit(topic) {
            hits.push(hit);
        }
    }
}

fn topic_hit(topic: &Value) -> Option<SearchHit> {
    let text = topic["Text"].as_str().filter(|t| !t.trim().is_empty())?;

    if let Some(title) = topic["FirstURL"].as_str().and_then(title_from_url) {
        let body = text
            .strip_prefix(title.as_str())
            .map(str::trim_start)
            .filter(|rest| !rest.is_empty())
            .unwrap_or(text);
        return Some(SearchHit {
            body: body.to_string(),
            title,
        });
    }

    let (title, body) = text.split_once(" - ").unwrap_or((text, text));
    Some(SearchHit {
        title: title.trim().to_string(),
        body: body.trim().to_string(),
    })
}

/// `https://duckduckgo.com/Rust_(programming_language)` -> `Rust (programming language)`
fn title_from_url(first_url: &str) -> Option<String> {
    let url = Url::parse(first_url).ok()?;
    let segment = url.path_segments()?.next_back()?;
    let decoded = urlencoding::decode(segment).ok()?;
    let title = decoded.replace('_', " ");
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}
