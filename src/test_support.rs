//! Scripted transport for unit tests

use crate::error::{Error, Result};
use crate::http::{RawResponse, RequestDescriptor, Transport};
use crate::types::JsonValue;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses in order and records every request
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with a JSON body
    pub fn json(self, body: JsonValue) -> Self {
        self.respond(RawResponse::json_body(200, &body))
    }

    /// Queue any response
    pub fn respond(self, response: RawResponse) -> Self {
        self.push(Ok(response))
    }

    /// Queue a transport failure
    pub fn fail(self, error: Error) -> Self {
        self.push(Err(error))
    }

    fn push(self, item: Result<RawResponse>) -> Self {
        self.responses.lock().unwrap().push_back(item);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        request.render_path()?;
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::network("no scripted response left")))
    }
}
