//! Transport collaborator: the trait call-sites depend on and its HTTP
//! implementation.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::request::{ApiRequest, Method};

/// Maximum number of body bytes echoed into a status error message.
const STATUS_MESSAGE_LIMIT: usize = 200;

/// The opaque transport collaborator.
///
/// Everything above this seam (call wrappers, resource bindings, the cart
/// syncer) is written against the trait so tests can substitute a scripted
/// in-memory implementation.
#[async_trait]
pub trait ApiService: Send + Sync {
    /// Perform one request and return the decoded JSON response.
    async fn call(&self, request: &ApiRequest) -> Result<Value>;
}

/// Business-error envelope the server uses for explicit rejections.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// HTTP implementation of [`ApiService`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpApiService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiService {
    /// Create a client from the given configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ApiError::Network(format!("invalid user agent: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve an endpoint path against the base URL.
    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Decode a successful response or classify the failure.
    ///
    /// A 4xx carrying a decodable business envelope becomes
    /// [`ApiError::Business`]; 5xx becomes [`ApiError::Network`]; anything
    /// else non-2xx becomes [`ApiError::Status`].
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();

        if status.is_client_error()
            && let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body)
        {
            return Err(ApiError::Business {
                message: envelope.error.message,
                code: envelope.error.code,
            });
        }

        if status.is_server_error() {
            return Err(ApiError::Network(format!("server error {status_code}")));
        }

        let mut message = body;
        message.truncate(STATUS_MESSAGE_LIMIT);
        Err(ApiError::Status {
            status: status_code,
            message,
        })
    }
}

#[async_trait]
impl ApiService for HttpApiService {
    async fn call(&self, request: &ApiRequest) -> Result<Value> {
        request.validate()?;

        let url = self.url_for(&request.endpoint);
        debug!(method = %request.method, %url, "dispatching request");

        let mut builder = self.client.request(to_reqwest_method(request.method), &url);
        if request.method.has_body() {
            if !request.params.is_null() {
                builder = builder.json(&request.params);
            }
        } else if let Some(params) = request.params.as_object() {
            let pairs: Vec<(String, String)> = params
                .iter()
                .map(|(key, value)| (key.clone(), query_value(value)))
                .collect();
            builder = builder.query(&pairs);
        }

        let response = builder.send().await?;
        self.handle_response(response).await
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Render a JSON value as a query-string value. Strings are used verbatim,
/// everything else keeps its JSON rendering.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
