use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::Serialize;
use tokio::task::JoinHandle;

use super::{ApiError, RemitApi};
use crate::config::ApiConfig;
use crate::flow::{Currency, Summary};

/// Body of `POST /remit`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemitRequest {
    pub amount: f64,
    pub to: Currency,
    pub corridor: String,
}

impl RemitRequest {
    pub fn new(amount: f64, to: Currency) -> Self {
        Self {
            amount,
            to,
            corridor: to.corridor(),
        }
    }

    pub fn from_summary(summary: &Summary) -> Self {
        Self::new(summary.amount_usd, summary.currency)
    }
}

/// HTTP client for the hosted remit API
pub struct RemitClient {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl RemitClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("jx402/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from config; `None` when no key is configured
    pub fn from_config(config: &ApiConfig) -> Result<Option<Self>, ApiError> {
        match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(Some(Self::new(
                &config.base_url,
                key.trim(),
                Duration::from_secs(config.timeout_secs),
            )?)),
            _ => Ok(None),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RemitApi for RemitClient {
    async fn remit(&self, request: &RemitRequest) -> Result<serde_json::Value, ApiError> {
        if self.api_key.is_empty() {
            return Err(ApiError::NotConfigured);
        }

        let response = self
            .client
            .post(self.endpoint("/remit"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), retry_after, body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Delay before the single retry of a transient failure
const REMIT_RETRY_DELAY: Duration = Duration::from_secs(1);

fn retry_strategy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(REMIT_RETRY_DELAY)
        .with_max_delay(REMIT_RETRY_DELAY)
        .with_max_times(1)
}

/// Send a remit in the background; transient failures are retried once,
/// anything else is logged and dropped.
pub fn dispatch_remit(api: Arc<dyn RemitApi>, request: RemitRequest) -> JoinHandle<()> {
    tokio::spawn(async move {
        let op = || async { api.remit(&request).await };
        let result = op
            .retry(retry_strategy())
            .when(ApiError::is_transient)
            .notify(|err, dur| {
                tracing::debug!("Retrying remit after {:?}: {}", dur, err);
            })
            .await;

        match result {
            Ok(body) => {
                tracing::info!(
                    amount = request.amount,
                    to = %request.to,
                    corridor = %request.corridor,
                    response = %body,
                    "Remit accepted"
                );
            }
            Err(e) => {
                tracing::warn!(
                    amount = request.amount,
                    to = %request.to,
                    auth = e.is_auth_error(),
                    transient = e.is_transient(),
                    "Remit failed: {}",
                    e
                );
            }
        }
    })
}
