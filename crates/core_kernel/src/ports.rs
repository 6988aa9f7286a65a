//! Transport port
//!
//! The seam between domain handlers and the outbound HTTP adapter. Handlers
//! construct an [`ApiRequest`] describing one remote call; the adapter owns
//! authentication, timeouts, and outcome classification. Keeping the port in
//! the kernel lets domain crates stay free of HTTP-client dependencies and
//! lets tests substitute a scripted transport.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CrmError;

/// HTTP methods the CRM API surface actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound call: method, target, query pairs, optional JSON body.
///
/// `target` is normally a path relative to the adapter's base URL; the
/// paginator's next-link idiom hands back absolute URLs, which the adapter
/// must use verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub target: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, target)
    }

    pub fn patch(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, target)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// True when the target is a full URL rather than a relative path.
    pub fn is_absolute(&self) -> bool {
        self.target.starts_with("http://") || self.target.starts_with("https://")
    }
}

/// Successful (2xx) outcome of one call.
///
/// Non-2xx responses are classified by the adapter into [`CrmError::Api`]
/// before they reach a handler; network failures and timeouts become
/// [`CrmError::Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Null` for bodiless responses such as 204.
    pub body: Value,
}

/// Port implemented by the outbound HTTP adapter.
#[async_trait]
pub trait CrmTransport: Send + Sync {
    /// Performs a single authenticated call against the remote CRM.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, CrmError>;
}
