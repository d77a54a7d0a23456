use thiserror::Error;

/// Unexpected failures while talking to the upstream lookup services.
///
/// These are distinct from the expected "nothing found" outcomes, which are
/// reported through [`crate::SearchResponse::Error`] instead.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send request to {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {endpoint} JSON: {source}")]
    Malformed {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = LookupError> = std::result::Result<T, E>;
