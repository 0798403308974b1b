//! Peercoin daemon JSON-RPC layer.
//!
//! [`RpcClient`] queues calls and dispatches them through a [`Transport`].
//! The production transport is [`HttpTransport`] (blocking `reqwest`);
//! unit tests use `mock::MockTransport`.

mod client;
mod http_adapter;
pub mod methods;
#[cfg(test)]
pub mod mock;
pub mod protocol;

pub use client::RpcClient;
pub use http_adapter::HttpTransport;
pub use protocol::{RequestDescriptor, RpcResponse, WireCall, WireRequest};

use crate::endpoint::Endpoint;
use crate::error::RpcError;

/// Moves one framed request body to the daemon and returns the raw reply.
///
/// Implementations must not interpret the reply; decoding happens in the
/// dispatcher so every transport surfaces the same error taxonomy.
pub trait Transport {
    /// POST `body` as `application/json` to `endpoint`. Returns the reply
    /// body as raw bytes.
    fn post_json(&self, endpoint: &Endpoint, body: String) -> Result<Vec<u8>, RpcError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, endpoint: &Endpoint, body: String) -> Result<Vec<u8>, RpcError> {
        (**self).post_json(endpoint, body)
    }
}
