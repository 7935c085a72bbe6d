//! Remit API error types

use thiserror::Error;

/// Errors returned by the remit API client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No API key configured
    #[error("no API key configured")]
    NotConfigured,

    /// 401 Unauthorized - key invalid or revoked
    #[error("API key rejected (401)")]
    Unauthorized,

    /// 403 Forbidden - key lacks permission for the endpoint
    #[error("API key not permitted (403)")]
    Forbidden,

    /// 429 Rate Limited
    #[error("rate limited{}", retry_suffix(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// Network or timeout error
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-2xx response
    #[error("API Error: {status}")]
    Http { status: u16, message: String },

    /// Response body was not JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

fn retry_suffix(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs
        .map(|secs| format!(", retry after {}s", secs))
        .unwrap_or_default()
}

impl ApiError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(status: u16, retry_after_secs: Option<u64>, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            429 => ApiError::RateLimited { retry_after_secs },
            status => ApiError::Http { status, message },
        }
    }

    /// Check if this is an authentication error (401 or 403)
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden)
    }

    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::RateLimited { .. } => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
