use std::time::Duration;

use reqwest::header;
use tracing::{debug, trace};

use crate::endpoint::Endpoint;
use crate::error::{CoreError, RpcError};

use super::Transport;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ==============================================================================
// HttpTransport: blocking HTTP POST for Peercoin daemon endpoints
// ==============================================================================

/// Blocking HTTP transport. One POST per `execute()`, Basic auth taken from
/// the endpoint credentials.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, CoreError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build a transport whose whole request (connect, send, read) must
    /// finish within `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(RpcError::Transport)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, endpoint: &Endpoint, body: String) -> Result<Vec<u8>, RpcError> {
        let url = endpoint.redacted();
        let credentials = endpoint.credentials();
        debug!(url = %url, body_len = body.len(), "rpc http post");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .basic_auth(credentials.username(), Some(credentials.password()))
            .body(body)
            .send()
            .map_err(RpcError::Transport)?;
        let status = response.status();

        let body = response.bytes().map_err(RpcError::Transport)?;
        debug!(url = %url, %status, body_len = body.len(), "rpc http response");
        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            trace!(url = %url, %status, body = %text, "rpc http error body");
        }

        Ok(body.to_vec())
    }
}
