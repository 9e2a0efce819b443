use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{RawRow, ReportSource};
use crate::config::{RequestConfig, SheetConfig};
use crate::error::{SourceError, SourceResult};

/// Client for the spreadsheet export API.
///
/// Two read-only endpoints: the report rows of a sheet and its known-names
/// column. Auth is a bearer credential owned by this client; nothing else in
/// the crate sees it.
#[derive(Clone)]
pub struct SheetClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    sheet_id: String,
    request_config: RequestConfig,
}

impl SheetClient {
    /// Create a new sheet client
    pub fn new(config: &SheetConfig, request_config: RequestConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(SourceError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            sheet_id: config.sheet_id.clone(),
            request_config,
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a JSON endpoint with bounded retries and exponential backoff.
    async fn fetch_with_retries<T: DeserializeOwned>(&self, path: &str) -> SourceResult<T> {
        let url = format!("{}/v1/sheets/{}/{}", self.base_url, self.sheet_id, path);

        let mut last_error = None;
        let mut retries = 0;

        while retries <= self.request_config.max_retries {
            if retries > 0 {
                let delay = backoff_delay(self.request_config.retry_delay_ms, retries);
                warn!(
                    endpoint = %path,
                    retry = retries,
                    delay_ms = delay.as_millis(),
                    "Retrying sheet request"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();

            match self.execute_request(&url).await {
                Ok(value) => {
                    let latency = start.elapsed();
                    info!(
                        endpoint = %path,
                        latency_ms = latency.as_millis(),
                        "Sheet fetch succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => {
                    let latency = start.elapsed();
                    error!(
                        endpoint = %path,
                        error = %e,
                        latency_ms = latency.as_millis(),
                        retry = retries,
                        "Sheet fetch failed"
                    );
                    last_error = Some(e);
                    retries += 1;
                }
            }
        }

        Err(SourceError::Unavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
            attempts: retries,
        })
    }

    /// Execute a single request (internal)
    async fn execute_request<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
        debug!(url = %url, "Fetching sheet data");

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    timeout_ms: self.request_config.timeout_ms,
                }
            } else {
                SourceError::Http(e)
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
            })
    }
}

/// Exponential backoff before the given retry, saturating so that
/// arbitrarily large configured retry counts never overflow.
fn backoff_delay(base_ms: u64, retry: u32) -> Duration {
    let factor = 2_u64.saturating_pow(retry.saturating_sub(1));
    Duration::from_millis(base_ms.saturating_mul(factor))
}

#[async_trait]
impl ReportSource for SheetClient {
    async fn fetch_reports(&self) -> SourceResult<Vec<RawRow>> {
        self.fetch_with_retries("reports").await
    }

    async fn fetch_known_names(&self) -> SourceResult<Vec<String>> {
        self.fetch_with_retries("names").await
    }
}
