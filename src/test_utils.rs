//! Test helpers: an in-memory relay transport

use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Records every request and answers with queued responses in order.
/// Clones share the same queue and log.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a `200 OK` response with the given body
    pub(crate) fn push_body(&self, body: &str) {
        self.push_response(StatusCode::OK, body);
    }

    pub(crate) fn push_response(&self, status: StatusCode, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        });
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The body of the only request sent so far, parsed as JSON
    pub(crate) fn sent_json(&self) -> serde_json::Value {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        let body = requests[0].body.as_deref().expect("request has a body");
        serde_json::from_slice(body).expect("request body is JSON")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no mock response queued");
        Ok(response)
    }
}
