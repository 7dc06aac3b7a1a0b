use thiserror::Error;

/// Errors returned by the chat completion client.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// The environment variable named by the config is unset or empty.
    #[error("API key environment variable {0} not set")]
    MissingApiKey(String),

    /// The configured base URL cannot be used to build a request URL.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API request failed with status {status}")]
    Status { status: u16 },

    /// The response body could not be deserialized into the expected shape.
    #[error("error decoding completion response: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// The response decoded but carried no choices.
    #[error("no choices in completion response")]
    EmptyChoices,
}
