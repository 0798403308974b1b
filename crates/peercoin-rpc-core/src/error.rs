use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("username and/or password must not be empty")]
    InvalidCredentials,

    #[error("credential file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("at least one queued call is required to execute")]
    EmptyRequestQueue,

    #[error("endpoint is not configured; authenticate before executing")]
    EndpointNotConfigured,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid arguments for `{method}`: {message}")]
    InvalidArguments { method: String, message: String },

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// True when the daemon could not be reached or the body could not be read.
    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Rpc(RpcError::Transport(_)))
    }

    /// True when the response body was not the JSON shape the call expected.
    pub fn is_decode(&self) -> bool {
        matches!(self, CoreError::Rpc(RpcError::Decode(_)))
    }
}

/// Failures on the wire: transport, encoding, decoding, and JSON-RPC
/// envelope errors reported by the daemon.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("missing JSON-RPC batch item id={id}")]
    MissingBatchItem { id: u64 },
}
