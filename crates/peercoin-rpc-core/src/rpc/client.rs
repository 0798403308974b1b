use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::credentials;
use crate::endpoint::{Credentials, Endpoint, Network};
use crate::error::CoreError;

use super::http_adapter::HttpTransport;
use super::methods;
use super::protocol::{RequestDescriptor, RpcResponse, WireRequest};
use super::Transport;

/// Fluent JSON-RPC client for a Peercoin daemon.
///
/// Calls are queued with [`call`](Self::call) (or one of the generated
/// wrappers such as `get_block_count`) and sent by [`execute`](Self::execute):
/// one queued call goes out as a single JSON-RPC 1.1 request, two or more as
/// one JSON-RPC 2.0 batch.
///
/// ```no_run
/// use peercoin_rpc_core::{Network, RpcClient};
///
/// let mut client = RpcClient::new("localhost", None, Network::Mainnet)?;
/// client.authenticate("peercoinrpc", "secret")?;
/// let replies = client.get_info().get_block_count().execute()?;
/// # Ok::<(), peercoin_rpc_core::CoreError>(())
/// ```
///
/// A client is not meant to be shared across threads; each call chain owns
/// the queue until it is executed.
pub struct RpcClient<T: Transport = HttpTransport> {
    host: String,
    port: u16,
    network: Network,
    endpoint: Option<Endpoint>,
    pending: Vec<RequestDescriptor>,
    transport: T,
}

impl RpcClient<HttpTransport> {
    /// Create a client using the blocking HTTP transport.
    ///
    /// `port` falls back to the network's default RPC port.
    pub fn new(host: &str, port: Option<u16>, network: Network) -> Result<Self, CoreError> {
        Ok(Self::with_transport(host, port, network, HttpTransport::new()?))
    }
}

impl<T: Transport> RpcClient<T> {
    pub fn with_transport(host: &str, port: Option<u16>, network: Network, transport: T) -> Self {
        Self {
            host: host.to_owned(),
            port: port.unwrap_or_else(|| network.default_port()),
            network,
            endpoint: None,
            pending: Vec::new(),
            transport,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The authenticated endpoint, once one of the `authenticate*` methods
    /// has succeeded.
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.endpoint.is_some()
    }

    // ==========================================================================
    // Authentication
    // ==========================================================================

    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<(), CoreError> {
        self.set_credentials(Credentials::new(username, password)?)
    }

    /// Authenticate with the `rpcuser` / `rpcpassword` entries of a daemon
    /// config file.
    pub fn authenticate_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        self.set_credentials(credentials::from_config_file(path.as_ref())?)
    }

    /// Authenticate with a daemon cookie file (`username:password`).
    pub fn authenticate_from_cookie(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        self.set_credentials(credentials::from_cookie_file(path.as_ref())?)
    }

    pub fn set_credentials(&mut self, credentials: Credentials) -> Result<(), CoreError> {
        let endpoint = Endpoint::new(&self.host, self.port, credentials)?;
        debug!(
            host = %self.host,
            port = self.port,
            rpc.user = endpoint.credentials().username(),
            "rpc endpoint configured"
        );
        self.endpoint = Some(endpoint);
        Ok(())
    }

    // ==========================================================================
    // Call Queue
    // ==========================================================================

    /// Queue a call. The method name is lower-cased; params are positional.
    pub fn call(&mut self, method: &str, params: Vec<Value>) -> &mut Self {
        self.pending.push(RequestDescriptor::new(method, params));
        self
    }

    /// Queue a call by name, filling trailing defaults from the method
    /// catalog when the name is known. Unknown names are queued as given.
    pub fn call_named(&mut self, method: &str, args: Vec<Value>) -> Result<&mut Self, CoreError> {
        let params = match methods::lookup(method) {
            Some(spec) => spec.bind(args)?,
            None => args,
        };
        Ok(self.call(method, params))
    }

    pub fn pending(&self) -> &[RequestDescriptor] {
        &self.pending
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop every queued call without sending anything.
    pub fn clear(&mut self) -> &mut Self {
        self.pending.clear();
        self
    }

    // ==========================================================================
    // Dispatch
    // ==========================================================================

    /// Send every queued call in one HTTP request and decode the reply.
    ///
    /// The queue is drained before the request goes out, so it is empty
    /// afterwards whether the dispatch succeeded or not. Failing before
    /// dispatch (empty queue, no endpoint) leaves the queue as it was.
    pub fn execute(&mut self) -> Result<RpcResponse, CoreError> {
        if self.pending.is_empty() {
            return Err(CoreError::EmptyRequestQueue);
        }
        let Some(endpoint) = self.endpoint.as_ref() else {
            return Err(CoreError::EndpointNotConfigured);
        };

        let wire = WireRequest::frame(std::mem::take(&mut self.pending))?;
        debug!(
            rpc.batch = wire.is_batch(),
            rpc.calls = wire.len(),
            rpc.methods = ?wire.methods(),
            "rpc execute"
        );

        let body = wire.to_body()?;
        let reply = self.transport.post_json(endpoint, body)?;
        let response = RpcResponse::decode(&reply, &wire)?;
        Ok(response)
    }
}
