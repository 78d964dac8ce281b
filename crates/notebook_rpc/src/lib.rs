//! JSON-RPC method surface for the notebook service.
//!
//! # Responsibility
//! - Define JSON-RPC 2.0 envelopes and error codes.
//! - Map method names onto typed note service calls through a closed table.
//!
//! # Invariants
//! - Dispatch never panics; every failure becomes an error response.
//! - Transport framing (HTTP, stdio) is the caller's concern.

pub mod dispatch;
pub mod method;
pub mod protocol;

pub use dispatch::{dispatch, handle_json, HELLO_RESULT};
pub use method::RpcMethod;
pub use protocol::{error_codes, RpcError, RpcRequest, RpcResponse, JSON_RPC_VERSION};
