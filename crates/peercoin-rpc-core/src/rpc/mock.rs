use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::endpoint::Endpoint;
use crate::error::RpcError;

use super::Transport;

/// A mock transport for testing. Replays canned reply bodies (or failures)
/// in order and records every request body it was handed.
pub struct MockTransport {
    replies: RefCell<VecDeque<Result<String, RpcError>>>,
    requests: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
        }
    }

    /// Every request body seen so far, parsed as JSON.
    pub fn requests(&self) -> Vec<Value> {
        self.requests
            .borrow()
            .iter()
            .map(|body| serde_json::from_str(body).expect("dispatcher must send valid JSON"))
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<Result<String, RpcError>>,
}

impl MockTransportBuilder {
    pub fn with_reply(mut self, body: impl Into<String>) -> Self {
        self.replies.push_back(Ok(body.into()));
        self
    }

    pub fn with_failure(mut self, err: RpcError) -> Self {
        self.replies.push_back(Err(err));
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: RefCell::new(self.replies),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for MockTransport {
    fn post_json(&self, _endpoint: &Endpoint, body: String) -> Result<Vec<u8>, RpcError> {
        self.requests.borrow_mut().push(body);
        match self.replies.borrow_mut().pop_front() {
            Some(reply) => reply.map(String::into_bytes),
            None => Err(RpcError::InvalidResponse(
                "mock transport has no reply queued".to_owned(),
            )),
        }
    }
}
