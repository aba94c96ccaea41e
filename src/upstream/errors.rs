//! Error types for the analytics API client.

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream returned {status} for {url}")]
    BadStatus { status: u16, url: String },
    #[error("failed to parse upstream response from {url}")]
    ParseFailed {
        status: u16,
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    RequestFailed(#[from] reqwest::Error),
}

impl UpstreamError {
    /// Whether the failure is a transport-level problem (unreachable host,
    /// timeout) as opposed to a response the server actually produced.
    pub fn is_network(&self) -> bool {
        matches!(self, UpstreamError::RequestFailed(_))
    }
}
