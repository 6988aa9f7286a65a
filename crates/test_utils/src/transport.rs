//! Scripted transport double
//!
//! Stands in for the HTTP executor in handler tests: responses are queued up
//! front, every request is recorded for assertion, and nothing touches the
//! network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use core_kernel::{ApiRequest, ApiResponse, CrmError, CrmTransport};

/// A `CrmTransport` that replays scripted outcomes in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, CrmError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor scripting a single 200 response.
    pub fn with_response(body: Value) -> Self {
        let transport = Self::new();
        transport.enqueue_ok(200, body);
        transport
    }

    /// Queues a successful response.
    pub fn enqueue_ok(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status, body }));
    }

    /// Queues a failure.
    pub fn enqueue_err(&self, err: CrmError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The single recorded request; panics unless exactly one was made.
    pub fn only_request(&self) -> ApiRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request, saw {}", requests.len());
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl CrmTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, CrmError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(CrmError::internal(
                    "MockTransport exhausted: no scripted response remains",
                ))
            })
    }
}
