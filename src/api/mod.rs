//! JX402 remit API client.
//!
//! The dashboard never depends on the API: a remit call is only dispatched
//! fire-and-forget after a simulation completes, and failures are logged.

pub mod error;
mod remit;

pub use error::ApiError;
pub use remit::{dispatch_remit, RemitClient, RemitRequest};

use async_trait::async_trait;

/// Default base URL of the hosted API
pub const DEFAULT_API_BASE: &str = "https://jx402-api.lubaking-co.workers.dev";

/// Remote remittance endpoint
#[async_trait]
pub trait RemitApi: Send + Sync {
    /// Submit a remittance; the response body is returned unvalidated
    async fn remit(&self, request: &RemitRequest) -> Result<serde_json::Value, ApiError>;
}
