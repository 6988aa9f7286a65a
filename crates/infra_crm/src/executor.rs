//! Authenticated HTTP executor
//!
//! The single place where outbound requests acquire authentication, a
//! timeout, and outcome classification. Handlers describe calls as
//! [`ApiRequest`] values; everything transport-shaped lives here, so no
//! handler rebuilds headers or error handling.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use core_kernel::{ApiRequest, ApiResponse, CrmError, CrmTransport, HttpMethod};

use crate::credentials::CredentialResolver;

/// Production HubSpot API base.
pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

/// Fixed per-call budget; requests that exceed it fail as transport errors.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes single authenticated calls against the HubSpot API.
pub struct HubSpotExecutor {
    base_url: String,
    client: reqwest::Client,
    resolver: Arc<CredentialResolver>,
}

impl HubSpotExecutor {
    /// Creates an executor against `base_url` (no trailing slash expected).
    pub fn new(base_url: impl Into<String>, resolver: Arc<CredentialResolver>) -> Result<Self, CrmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|err| CrmError::internal(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            resolver,
        })
    }

    /// Executor against the production API base.
    pub fn production(resolver: Arc<CredentialResolver>) -> Result<Self, CrmError> {
        Self::new(DEFAULT_BASE_URL, resolver)
    }

    fn url_for(&self, request: &ApiRequest) -> String {
        if request.is_absolute() {
            request.target.clone()
        } else {
            format!("{}{}", self.base_url, request.target)
        }
    }

    fn method_for(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn classify_send_error(err: reqwest::Error) -> CrmError {
        if err.is_timeout() {
            CrmError::transport(format!("request timed out: {err}"))
        } else {
            CrmError::transport(err.to_string())
        }
    }
}

#[async_trait]
impl CrmTransport for HubSpotExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, CrmError> {
        let token = self.resolver.get_token().await?;
        let url = self.url_for(&request);

        debug!(method = %request.method, %url, "Executing CRM request");

        let mut builder = self
            .client
            .request(Self::method_for(request.method), &url)
            .bearer_auth(token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(Self::classify_send_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
            error!(status = status.as_u16(), %url, "CRM request rejected");
            return Err(CrmError::Api {
                status: status.as_u16(),
                reason,
                body,
            });
        }

        let body = if status == StatusCode::NO_CONTENT {
            serde_json::Value::Null
        } else {
            let text = response
                .text()
                .await
                .map_err(|err| CrmError::transport(format!("failed to read response body: {err}")))?;
            if text.is_empty() {
                serde_json::Value::Null
            } else {
                // Some endpoints answer 2xx with non-JSON bodies; hand those
                // back as raw text rather than failing the operation.
                serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
            }
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for HubSpotExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSpotExecutor")
            .field("base_url", &self.base_url)
            .finish()
    }
}
