//! Request plumbing shared by all providers.

use std::time::Duration;

use anyhow::Context;
use knowbot_core::{ProviderError, truncate_chars};
use reqwest::{Client, Response};

/// Upper bound on how much of an error body is kept in `ProviderError::Status`.
const ERROR_BODY_LIMIT: usize = 200;

pub fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("knowbot/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

/// Map a transport-level failure onto the collaborator error taxonomy.
pub fn classify(err: &reqwest::Error, timeout: Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout)
    } else if err.is_decode() {
        ProviderError::MalformedResponse(err.to_string())
    } else {
        ProviderError::Transport(err.to_string())
    }
}

/// Turn a non-2xx response into `ProviderError::Status`, keeping the head of
/// the body for diagnostics.
pub async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body: truncate_chars(body.trim(), ERROR_BODY_LIMIT).to_string(),
    })
}

/// Send a prepared request and decode its JSON body.
pub async fn send_json(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<serde_json::Value, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| classify(&e, timeout))?;

    ensure_success(response)
        .await?
        .json::<serde_json::Value>()
        .await
        .map_err(|e| classify(&e, timeout))
}
