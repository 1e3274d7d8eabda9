use std::time::Duration;

use thiserror::Error;

/// Failure talking to a remote collaborator.
///
/// Always recovered inside the conversation layer and turned into a
/// displayable message; never surfaced to the user as a fault.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("invalid response format: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Short label used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "status",
            Self::Transport(_) => "transport",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_details() {
        let err = ProviderError::Status {
            status: 503,
            body: "upstream unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP status 503: upstream unavailable");
        assert_eq!(err.kind(), "status");

        let err = ProviderError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "request timed out after 30s");
    }
}
