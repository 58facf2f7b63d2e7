//! GraphQL transport
//!
//! This module implements the HTTP side of the bar API: request/response
//! envelopes, client configuration, and the client itself. Queries retry
//! transient failures; mutations are sent exactly once.
//! Every request is a POST of `{"query", "operationName", "variables"}` to a
//! single endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::{Error, Result};

// =============================================================================
// Request Types
// =============================================================================

/// A single GraphQL operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    /// Operation document
    pub query: String,
    /// Operation name, when the document holds more than one operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// Variables object
    pub variables: serde_json::Value,
}

impl GraphqlRequest {
    /// Create a request with an empty variables object
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the operation name
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Add a single variable
    pub fn variable<T: Serialize>(mut self, key: impl Into<String>, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        if let serde_json::Value::Object(map) = &mut self.variables {
            map.insert(key.into(), value);
        }
        Ok(self)
    }

    /// Replace all variables with a serialized struct
    ///
    /// The value must serialize to a JSON object.
    pub fn variables<T: Serialize>(mut self, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        if !value.is_object() {
            return Err(Error::InvalidInput(
                "GraphQL variables must serialize to an object".to_string(),
            ));
        }
        self.variables = value;
        Ok(self)
    }

    fn label(&self) -> &str {
        self.operation_name.as_deref().unwrap_or("anonymous operation")
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlErrorEntry {
    /// Human-readable message
    pub message: String,
    /// Server-specific error classification, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Raw `{data, errors}` envelope as sent by the server
#[derive(Debug, Clone, Deserialize)]
struct GraphqlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

/// Successful GraphQL response
#[derive(Debug, Clone)]
pub struct GraphqlResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response data
    pub data: T,
}

impl<T> GraphqlResponse<T> {
    /// Create a new response
    pub fn new(status: u16, data: T) -> Self {
        Self { status, data }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the bar API client
#[derive(Debug, Clone)]
pub struct BarApiConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// API key sent as `x-api-key`
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
    /// Retry policy for queries; mutations are sent once
    pub retry: RetryConfig,
}

impl Default for BarApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:20002/graphql".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("Barfly/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl BarApiConfig {
    /// Create a new config for an endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for GraphQL operations
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    config: BarApiConfig,
}

impl GraphqlClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// - `Error::Network` - the underlying HTTP client could not be built
    pub fn new(config: BarApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &BarApiConfig {
        &self.config
    }

    /// Execute a read-only operation, retrying transient failures
    ///
    /// Retries follow the configured [`RetryConfig`].
    ///
    /// # Errors
    ///
    /// - `Error::Api` - non-2xx HTTP status
    /// - `Error::GraphQl` - the server returned an `errors` array
    /// - `Error::EmptyData` - neither data nor errors were returned
    /// - `Error::Network` / `Error::Json` - transport or decoding failure
    pub async fn query<T: DeserializeOwned>(
        &self,
        request: &GraphqlRequest,
    ) -> Result<GraphqlResponse<T>> {
        tracing::debug!(operation = request.label(), "executing GraphQL query");
        retry(self.config.retry.clone(), Error::is_retryable, || self.send_once(request)).await
    }

    /// Execute a mutation with a single attempt
    ///
    /// Mutations are never resent: a timed-out write may already have been
    /// applied, so retrying is left to the caller.
    ///
    /// # Errors
    ///
    /// Same as [`GraphqlClient::query`].
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        request: &GraphqlRequest,
    ) -> Result<GraphqlResponse<T>> {
        tracing::debug!(operation = request.label(), "executing GraphQL mutation");
        self.send_once(request).await
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        request: &GraphqlRequest,
    ) -> Result<GraphqlResponse<T>> {
        let mut builder = self.http.post(&self.config.endpoint).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.header("x-api-key", key);
        }
        for (key, value) in &self.config.default_headers {
            builder = builder.header(key, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status, operation = request.label(), "GraphQL request rejected");
            return Err(Error::Api { status, message });
        }

        let body = response.bytes().await?;
        let envelope: GraphqlEnvelope<T> = serde_json::from_slice(&body)?;

        if !envelope.errors.is_empty() {
            return Err(Error::GraphQl(
                envelope.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        match envelope.data {
            Some(data) => Ok(GraphqlResponse::new(status, data)),
            None => Err(Error::EmptyData(request.label().to_string())),
        }
    }
}

// =============================================================================
// Retry Logic with Exponential Backoff
// =============================================================================

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: usize,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier (e.g., 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Disable retries entirely
    pub fn none() -> Self {
        Self::new(0)
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    fn calculate_delay(&self, attempt: usize) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);

        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }
}

/// Retry an async operation with a configurable retry policy
///
/// `should_retry` decides per error whether another attempt is made; the
/// operation runs at most `max_retries + 1` times.
pub async fn retry<F, Fut, T, E>(
    config: RetryConfig,
    should_retry: impl Fn(&E) -> bool,
    mut operation: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut attempts = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                attempts += 1;

                if !should_retry(&err) || attempts > config.max_retries {
                    return Err(err);
                }

                let delay = config.calculate_delay(attempts - 1);
                tracing::debug!(attempt = attempts, ?delay, "retrying after transient failure");
                sleep(delay).await;
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_request_variables() {
        let req = GraphqlRequest::new("query GetBarMember { getBarMember { userId } }")
            .operation_name("GetBarMember")
            .variable("userId", &"user-1")
            .unwrap()
            .variable("barId", &"bar-9")
            .unwrap();

        assert_eq!(req.operation_name.as_deref(), Some("GetBarMember"));
        assert_eq!(req.variables["userId"], "user-1");
        assert_eq!(req.variables["barId"], "bar-9");
    }

    #[test]
    fn test_request_variables_must_be_object() {
        let result = GraphqlRequest::new("query { x }").variables(&vec![1, 2, 3]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let req = GraphqlRequest::new("query ListBars { x }").operation_name("ListBars");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["operationName"], "ListBars");
        assert!(json["variables"].is_object());
    }

    #[test]
    fn test_client_config_default() {
        let config = BarApiConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
        assert!(config.user_agent.starts_with("Barfly/"));
    }

    #[test]
    fn test_client_config_builder() {
        let config = BarApiConfig::new("https://api.example.com/graphql")
            .with_api_key("da2-secret")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("BarflyTest/1.0")
            .with_header("X-Custom", "value")
            .with_retry(RetryConfig::none());

        assert_eq!(config.endpoint, "https://api.example.com/graphql");
        assert_eq!(config.api_key.as_deref(), Some("da2-secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "BarflyTest/1.0");
        assert_eq!(config.default_headers.get("X-Custom"), Some(&"value".to_string()));
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_retry_config_calculate_delay() {
        let config = RetryConfig::new(3)
            .with_initial_delay(Duration::from_millis(100))
            .with_backoff_multiplier(2.0)
            .with_max_delay(Duration::from_millis(300));

        assert_eq!(config.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(config.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(config.calculate_delay(2), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_retry_success_after_retries() {
        let config = RetryConfig::new(3).with_initial_delay(Duration::from_millis(1));
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let result = retry(
            config,
            |_: &String| true,
            || {
                let c = counter_clone.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("temporary error".to_string())
                    } else {
                        Ok("success")
                    }
                }
            },
        )
        .await;

        assert_eq!(result, Ok("success"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_non_retryable_error() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let result = retry(
            RetryConfig::new(3),
            |err: &String| !err.contains("permanent"),
            || {
                let c = counter_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>("permanent error".to_string())
                }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_exhausted() {
        let config = RetryConfig::new(2).with_initial_delay(Duration::from_millis(1));
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let result = retry(
            config,
            |_: &String| true,
            || {
                let c = counter_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>("always fails".to_string())
                }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3); // Initial + 2 retries
    }
}
