//! JSON-RPC framing for the Peercoin daemon dialect.
//!
//! A single queued call goes out as a bare JSON-RPC 1.1 object without an
//! `id`. Two or more calls go out as a JSON-RPC 2.0 batch array where each
//! element's `id` is its zero-based position in the queue.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CoreError, RpcError};

const SINGLE_JSONRPC_VERSION: &str = "1.1";
const BATCH_JSONRPC_VERSION: &str = "2.0";

// ==============================================================================
// Request Side
// ==============================================================================

/// One queued RPC call: a lower-cased method name and its positional params.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: String,
    params: Vec<Value>,
}

impl RequestDescriptor {
    pub fn new(method: &str, params: Vec<Value>) -> Self {
        Self {
            method: method.to_lowercase(),
            params,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    fn into_wire(self, jsonrpc: &'static str, id: Option<u64>) -> WireCall {
        WireCall {
            method: self.method,
            params: self.params,
            jsonrpc,
            id,
        }
    }
}

/// A call as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireCall {
    pub method: String,
    pub params: Vec<Value>,
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

/// The serialized payload of one `execute()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireRequest {
    Single(WireCall),
    Batch(Vec<WireCall>),
}

impl WireRequest {
    /// Frame the drained queue. Order is preserved; nothing is deduplicated.
    pub fn frame(mut pending: Vec<RequestDescriptor>) -> Result<Self, CoreError> {
        if pending.is_empty() {
            return Err(CoreError::EmptyRequestQueue);
        }

        if pending.len() == 1 {
            let only = pending.swap_remove(0);
            return Ok(WireRequest::Single(
                only.into_wire(SINGLE_JSONRPC_VERSION, None),
            ));
        }

        let calls = pending
            .into_iter()
            .enumerate()
            .map(|(id, descriptor)| descriptor.into_wire(BATCH_JSONRPC_VERSION, Some(id as u64)))
            .collect();
        Ok(WireRequest::Batch(calls))
    }

    pub fn len(&self) -> usize {
        match self {
            WireRequest::Single(_) => 1,
            WireRequest::Batch(calls) => calls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, WireRequest::Batch(_))
    }

    /// Method names in wire order, for logging.
    pub fn methods(&self) -> Vec<&str> {
        match self {
            WireRequest::Single(call) => vec![call.method.as_str()],
            WireRequest::Batch(calls) => calls.iter().map(|c| c.method.as_str()).collect(),
        }
    }

    pub fn to_body(&self) -> Result<String, RpcError> {
        serde_json::to_string(self).map_err(RpcError::Encode)
    }
}

// ==============================================================================
// Response Side
// ==============================================================================

/// Decoded daemon reply. The content is whatever JSON the daemon sent;
/// per-item errors inside a batch are passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    Single(Value),
    Batch(Vec<Value>),
}

impl RpcResponse {
    /// Decode a response body for a request of the given shape.
    ///
    /// The body must be UTF-8 JSON; invalid bytes fail instead of being
    /// replaced.
    pub(crate) fn decode(body: &[u8], request: &WireRequest) -> Result<Self, RpcError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            RpcError::Decode(format!(
                "response is not valid JSON: {e}; body={}",
                String::from_utf8_lossy(body)
            ))
        })?;

        match request {
            WireRequest::Single(_) => Ok(RpcResponse::Single(value)),
            WireRequest::Batch(calls) => match value {
                Value::Array(items) => Ok(RpcResponse::Batch(items)),
                other => Err(RpcError::Decode(format!(
                    "expected JSON array for batch of {} calls; body={other}",
                    calls.len()
                ))),
            },
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, RpcResponse::Batch(_))
    }

    /// The raw decoded JSON. A batch becomes a JSON array.
    pub fn into_value(self) -> Value {
        match self {
            RpcResponse::Single(value) => value,
            RpcResponse::Batch(items) => Value::Array(items),
        }
    }

    /// Unwrap the `result` member of a single-call reply.
    pub fn into_result(self) -> Result<Value, CoreError> {
        match self {
            RpcResponse::Single(value) => unwrap_envelope(value),
            RpcResponse::Batch(items) => Err(RpcError::InvalidResponse(format!(
                "expected a single response, got a batch of {}",
                items.len()
            ))
            .into()),
        }
    }

    /// Unwrap every `result` member, in request order.
    ///
    /// Batch items are matched back to their request by `id`, so a daemon
    /// that answers out of order still yields results in queue order. The
    /// first item carrying a non-null `error` fails the whole call.
    pub fn into_results(self) -> Result<Vec<Value>, CoreError> {
        match self {
            RpcResponse::Single(value) => Ok(vec![unwrap_envelope(value)?]),
            RpcResponse::Batch(items) => {
                let expected = items.len() as u64;
                let mut by_id: HashMap<u64, Value> = HashMap::with_capacity(items.len());
                for item in items {
                    by_id.insert(batch_item_id(&item)?, item);
                }

                let mut ordered = Vec::with_capacity(by_id.len());
                for id in 0..expected {
                    let item = by_id.remove(&id).ok_or(RpcError::MissingBatchItem { id })?;
                    ordered.push(unwrap_envelope(item)?);
                }
                Ok(ordered)
            }
        }
    }
}

fn unwrap_envelope(value: Value) -> Result<Value, CoreError> {
    #[derive(serde::Deserialize)]
    struct Envelope {
        result: Option<Value>,
        error: Option<Value>,
    }

    let envelope: Envelope = serde_json::from_value(value).map_err(|e| {
        RpcError::InvalidResponse(format!("not a JSON-RPC response object: {e}"))
    })?;

    if let Some(err) = envelope.error {
        return Err(parse_jsonrpc_error(err));
    }

    Ok(envelope.result.unwrap_or(Value::Null))
}

/// Map the daemon's `error` member to a `CoreError`.
///
/// peercoind reports `{"code": -13, "message": "..."}`; anything else (a bare
/// string from a proxy, a missing code) is kept verbatim in `InvalidResponse`.
pub(crate) fn parse_jsonrpc_error(err: Value) -> CoreError {
    #[derive(serde::Deserialize)]
    struct DaemonError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<DaemonError>(err.clone()) {
        Ok(DaemonError { code, message }) => RpcError::ServerError { code, message }.into(),
        Err(_) => RpcError::InvalidResponse(format!("unrecognized daemon error: {err}")).into(),
    }
}

/// The queue position a batch reply item answers. Ids go out as integers;
/// numeric strings are accepted back.
pub(crate) fn batch_item_id(item: &Value) -> Result<u64, CoreError> {
    let id = item
        .get("id")
        .ok_or_else(|| RpcError::InvalidResponse(format!("batch item without id: {item}")))?;
    let position = match id {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    };
    position.ok_or_else(|| {
        RpcError::InvalidResponse(format!("batch item id is not a queue position: {id}")).into()
    })
}
