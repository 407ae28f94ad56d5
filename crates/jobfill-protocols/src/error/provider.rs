//! Errors from an AI answer provider.

use thiserror::Error;

/// Wait assumed when a 429 carries no usable `retry-after`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider cannot be built from the current settings.
    #[error("provider unavailable: {0}")]
    NotConfigured(String),

    #[error("HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("rate limited, retry in {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("credentials rejected: {0}")]
    AuthenticationFailed(String),

    #[error("request rejected: {0}")]
    InvalidRequest(String),

    /// The reply arrived but did not contain usable answers.
    #[error("unusable reply: {0}")]
    MalformedResponse(String),

    #[error("network: {0}")]
    Network(String),

    #[error("no reply within {0}s")]
    Timeout(u64),
}

impl ProviderError {
    /// Classify a non-success HTTP reply.
    pub fn from_status(status: u16, message: String, retry_after: Option<u64>) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed(message),
            429 => Self::RateLimited {
                retry_after_seconds: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            400 | 404 | 413 | 422 => Self::InvalidRequest(message),
            _ => Self::ApiError { status, message },
        }
    }

    /// Worth trying again later with the same request.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network(_) | Self::Timeout(_) => true,
            Self::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
