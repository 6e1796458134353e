//! JSON-RPC 2.0 envelope types for the node transport.
//!
//! The remote node speaks plain JSON-RPC over HTTP. These types cover
//! the request and response envelopes; classifying a response into the
//! client error taxonomy happens in [`RpcResponse::into_result`].

use crate::LedgerError;
use serde::{Deserialize, Serialize};

/// Protocol version sent with every request.
const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC request envelope with positional parameters.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
	jsonrpc: &'a str,
	id: u64,
	method: &'a str,
	params: Vec<serde_json::Value>,
}

impl<'a> RpcRequest<'a> {
	/// Creates a request for the given method with positional parameters.
	pub fn new(id: u64, method: &'a str, params: Vec<serde_json::Value>) -> Self {
		Self {
			jsonrpc: JSONRPC_VERSION,
			id,
			method,
			params,
		}
	}
}

/// A JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
	/// The result payload, present on success.
	pub result: Option<T>,
	/// The error object, present on failure.
	pub error: Option<RpcErrorObject>,
}

/// A JSON-RPC error object returned by the node.
#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
	/// Numeric error code.
	pub code: i64,
	/// Human-readable message.
	pub message: String,
}

impl<T> RpcResponse<T> {
	/// Collapses the envelope into a result.
	///
	/// A node-side error object means the node received the request and
	/// rejected it, which classifies as an execution failure. An
	/// envelope with neither result nor error is malformed and
	/// classifies as a transport problem.
	pub fn into_result(self) -> Result<T, LedgerError> {
		if let Some(error) = self.error {
			return Err(LedgerError::Execution(format!(
				"node rejected request: {} (code {})",
				error.message, error.code
			)));
		}
		self.result.ok_or_else(|| {
			LedgerError::Network("malformed response: missing both result and error".to_string())
		})
	}
}
