//! HTTP transport implementation for the remote ledger node.
//!
//! This module provides the concrete [`LedgerInterface`] implementation
//! used outside of tests: JSON-RPC 2.0 over HTTP via reqwest, with a
//! per-request timeout that surfaces as a network error on expiry.

use crate::rpc::{RpcRequest, RpcResponse};
use crate::{LedgerError, LedgerInterface};
use async_trait::async_trait;
use ridehail_types::{SignedTransaction, TransactionResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// RPC method executing a signed transaction and returning its result.
const EXECUTE_METHOD: &str = "ridehail_executeTransaction";

/// HTTP-based ledger node client.
pub struct HttpLedger {
	/// Shared HTTP client with the configured timeout applied.
	client: reqwest::Client,
	/// Node endpoint URL.
	endpoint: String,
	/// Monotonic id for JSON-RPC request correlation.
	request_id: AtomicU64,
}

impl HttpLedger {
	/// Creates a new HTTP ledger client for the given endpoint.
	///
	/// The timeout applies to each request round trip, covering both
	/// connection setup and the node's execution of the transaction.
	pub fn new(endpoint: String, request_timeout: Duration) -> Result<Self, LedgerError> {
		let client = reqwest::Client::builder()
			.timeout(request_timeout)
			.build()
			.map_err(|e| LedgerError::Network(format!("failed to build HTTP client: {}", e)))?;
		Ok(Self {
			client,
			endpoint,
			request_id: AtomicU64::new(1),
		})
	}
}

#[async_trait]
impl LedgerInterface for HttpLedger {
	async fn submit_transaction(
		&self,
		tx: &SignedTransaction,
	) -> Result<TransactionResult, LedgerError> {
		let params = vec![
			serde_json::Value::String(tx.tx_bytes.clone()),
			serde_json::Value::String(tx.signature.clone()),
		];
		let id = self.request_id.fetch_add(1, Ordering::Relaxed);
		let request = RpcRequest::new(id, EXECUTE_METHOD, params);

		let response = self
			.client
			.post(&self.endpoint)
			.json(&request)
			.send()
			.await
			.map_err(|e| LedgerError::Network(format!("request failed: {}", e)))?;

		let status = response.status();
		if !status.is_success() {
			return Err(LedgerError::Network(format!("node returned HTTP {}", status)));
		}

		let envelope: RpcResponse<TransactionResult> = response
			.json()
			.await
			.map_err(|e| LedgerError::Network(format!("could not parse response: {}", e)))?;
		envelope.into_result()
	}
}
