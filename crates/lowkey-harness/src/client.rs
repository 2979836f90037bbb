//! Request executor
//!
//! The only place the harness touches the network. Every call is logged;
//! transport failures and status mismatches come back as `HarnessError`
//! values so a failing request can only ever fail its own case.

use lowkey_common::{HarnessConfig, HarnessError, HarnessResult};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{error, info};

/// HTTP client bound to one API deployment
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: HarnessConfig,
}

impl ApiClient {
    /// Build a client using the configured base URL and per-request timeout
    pub fn new(config: &HarnessConfig) -> HarnessResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| HarnessError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Perform a request
    ///
    /// When `expected` is set, any other status is logged together with the
    /// raw body and returned as `HarnessError::UnexpectedStatus`.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        expected: Option<StatusCode>,
    ) -> HarnessResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.url(path);
        let mut builder = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(method = %method, path, error = %e, "Request failed");
                return Err(HarnessError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        info!(method = %method, path, status = status.as_u16(), "{method} {path} -> {}", status.as_u16());

        let text = response.text().await.map_err(|e| {
            error!(method = %method, path, error = %e, "Failed to read response body");
            HarnessError::Transport(e.to_string())
        })?;

        if let Some(expected) = expected {
            if status != expected {
                error!(
                    expected = expected.as_u16(),
                    actual = status.as_u16(),
                    "Expected status {}, got {}",
                    expected.as_u16(),
                    status.as_u16()
                );
                error!(body = %text, "Response: {text}");
                return Err(HarnessError::UnexpectedStatus {
                    expected: expected.as_u16(),
                    actual: status.as_u16(),
                    body: text,
                });
            }
        }

        Ok(ApiResponse { status, body: text })
    }

    /// GET expecting 200
    pub async fn get(&self, path: &str) -> HarnessResult<ApiResponse> {
        self.request::<()>(Method::GET, path, None, Some(StatusCode::OK))
            .await
    }

    /// POST a JSON body expecting 200
    pub async fn post<B>(&self, path: &str, body: &B) -> HarnessResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), Some(StatusCode::OK))
            .await
    }

    /// PUT a JSON body expecting 200
    pub async fn put<B>(&self, path: &str, body: &B) -> HarnessResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), Some(StatusCode::OK))
            .await
    }

    /// DELETE expecting 200
    pub async fn delete(&self, path: &str) -> HarnessResult<ApiResponse> {
        self.request::<()>(Method::DELETE, path, None, Some(StatusCode::OK))
            .await
    }
}

/// Raw response handed back to cases for parsing
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body into a typed entity
    ///
    /// Missing fields and malformed JSON surface as `HarnessError::Schema`.
    pub fn json<T: DeserializeOwned>(&self) -> HarnessResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| HarnessError::schema(format!("{e}; body: {}", self.body)))
    }

    /// Parse the body as untyped JSON
    pub fn value(&self) -> HarnessResult<Value> {
        self.json()
    }
}
