use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::normalize::NormalizeError;

/// Failures of the external collaborator that fetches response bodies.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build request URL: {0}")]
    Url(String),
    #[error("HTTP request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("HTTP status {0}")]
    Status(u16),
}

/// Anything that can go wrong between raw bytes (or a fetch) and a
/// normalized route.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RouteError {
    /// Whether the caller should offer a retry rather than a hard failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(FetchError::Transport(_)) => true,
            Self::Fetch(FetchError::Status(code)) => *code >= 500 || *code == 429,
            Self::Decode(DecodeError::ApiStatus { status, .. }) => status.is_retryable(),
            _ => false,
        }
    }
}
