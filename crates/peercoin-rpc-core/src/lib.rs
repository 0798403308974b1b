pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod rpc;
#[cfg(test)]
mod test_util;

pub use endpoint::{Credentials, Endpoint, Network};
pub use error::{CoreError, RpcError};
pub use rpc::{HttpTransport, RpcClient, RpcResponse, Transport};
