//! Search index transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Client able to run a search request against a named index.
#[async_trait]
pub trait SearchIndexClient: Send + Sync {
    /// POST `body` to the `_search` endpoint of `index` and return the raw response.
    async fn search(&self, index: &str, body: &Value) -> Result<Value>;
}

/// Bounded exponential backoff for transient search index failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 2000,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Run `operation` until it succeeds, fails with a non-transient error or
    /// the attempts are used up.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff_ms = self.initial_backoff_ms;
        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        tracing::debug!(
                            operation = operation_name,
                            attempt,
                            "Succeeded after retry"
                        );
                    }
                    return Ok(result);
                }
                Err(error) if error.is_transient() && attempt < max_attempts => {
                    let delay_ms = backoff_ms.min(self.max_backoff_ms);
                    tracing::warn!(
                        operation = operation_name,
                        attempt,
                        backoff_ms = delay_ms,
                        %error,
                        "Transient failure, will retry after backoff"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    backoff_ms = backoff_ms.saturating_mul(2);
                }
                Err(error) => {
                    if attempt > 1 {
                        tracing::error!(operation = operation_name, attempt, %error, "Giving up");
                    }
                    return Err(error);
                }
            }
        }
    }
}

/// Elasticsearch-compatible HTTP search index.
pub struct HttpSearchIndex {
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
    client: Client,
}

impl HttpSearchIndex {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            retry: RetryPolicy::default(),
            client,
        })
    }

    /// Send `Authorization: ApiKey <key>` with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, index)
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        let mut request = self.client.post(url).json(body);
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("ApiKey {}", api_key));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::InvalidResponse(format!("Search response is not JSON: {}", e)))
    }
}

#[async_trait]
impl SearchIndexClient for HttpSearchIndex {
    async fn search(&self, index: &str, body: &Value) -> Result<Value> {
        let url = self.search_url(index);
        self.retry.run("search", || self.post(&url, body)).await
    }
}
