use thiserror::Error;

use super::ResponseKind;
use crate::status::ApiStatus;

/// Fatal failures while turning a response body into typed records.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("response body is not a JSON object")]
    NotAnObject,
    /// The top-level `status` was anything other than `OK`.
    #[error(
        "API returned status {status}: {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    ApiStatus {
        status: ApiStatus,
        message: Option<String>,
    },
    #[error("missing required field `{path}`")]
    MissingField { path: String },
    #[error("malformed {kind} payload at `{path}`: {source}")]
    InvalidField {
        kind: ResponseKind,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    pub(super) fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }
}
