//! Remote ledger client module for the ridehail client.
//!
//! This module handles submission of signed transactions to the remote
//! node and classification of the outcome. It provides the transport
//! abstraction, the HTTP implementation used in production, and a
//! service wrapper that signs, submits, and applies the retry policy
//! for transient network failures.

use async_trait::async_trait;
use ridehail_account::Actor;
use ridehail_types::{SignedTransaction, Transaction, TransactionResult};
use std::time::Duration;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

pub mod rpc;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
	/// Error that occurs when a transaction cannot be encoded for submission.
	#[error("Encoding failed: {0}")]
	Encoding(String),
	/// Error that occurs during network communication with the node.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when the node executed the transaction and reported failure.
	#[error("Execution failed: {0}")]
	Execution(String),
}

/// Trait defining the interface to a remote ledger node.
///
/// Implementations send the signed payload and block until the node
/// reports the execution outcome. The raw result bundle is returned
/// even when execution failed on-chain; interpreting the status is the
/// caller's concern. Implementations perform no retries themselves.
#[async_trait]
pub trait LedgerInterface: Send + Sync {
	/// Submits a signed transaction and waits for its execution outcome.
	///
	/// Transport, HTTP, and decode problems map to
	/// [`LedgerError::Network`]; a node-side rejection of the request
	/// itself maps to [`LedgerError::Execution`].
	async fn submit_transaction(
		&self,
		tx: &SignedTransaction,
	) -> Result<TransactionResult, LedgerError>;
}

/// Retry policy applied by [`LedgerService`] to transient failures.
///
/// Only network errors are retried; execution failures are permanent
/// because the node has already processed (and rejected) the
/// transaction, and object versions may have been consumed.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
	/// Total number of submission attempts, including the first.
	pub max_attempts: u32,
	/// Fixed delay between attempts.
	pub delay: Duration,
}

impl RetryPolicy {
	/// Creates a retry policy with the given attempt budget and delay.
	pub fn new(max_attempts: u32, delay: Duration) -> Self {
		Self {
			max_attempts,
			delay,
		}
	}
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			delay: Duration::from_secs(1),
		}
	}
}

/// Service that manages transaction submission to the remote node.
///
/// The LedgerService signs a transaction request with the submitting
/// actor's keypair, hands the signed form to the underlying transport,
/// retries transient network failures per the configured policy, and
/// converts a reported on-chain failure into [`LedgerError::Execution`].
pub struct LedgerService {
	/// The underlying ledger transport implementation.
	implementation: Box<dyn LedgerInterface>,
	/// Retry policy for transient network failures.
	retry: RetryPolicy,
}

impl LedgerService {
	/// Creates a new LedgerService with the specified implementation.
	pub fn new(implementation: Box<dyn LedgerInterface>, retry: RetryPolicy) -> Self {
		Self {
			implementation,
			retry,
		}
	}

	/// Signs and executes a transaction, returning the successful result.
	///
	/// This method:
	/// 1. Encodes the transaction into its canonical bytes
	/// 2. Signs the bytes with the submitting actor's keypair
	/// 3. Submits, retrying network errors up to the attempt budget
	/// 4. Maps a reported on-chain failure to an execution error
	pub async fn execute(
		&self,
		tx: &Transaction,
		signer: &Actor,
	) -> Result<TransactionResult, LedgerError> {
		let tx_bytes = tx
			.to_bytes()
			.map_err(|e| LedgerError::Encoding(e.to_string()))?;
		let signature = signer.sign(&tx_bytes);
		let signed = SignedTransaction::from_parts(&tx_bytes, &signature);

		let mut attempt = 1u32;
		let result = loop {
			match self.implementation.submit_transaction(&signed).await {
				Ok(result) => break result,
				Err(LedgerError::Network(reason)) if attempt < self.retry.max_attempts => {
					tracing::warn!(
						attempt = attempt,
						max_attempts = self.retry.max_attempts,
						reason = %reason,
						"Submission hit a network error, retrying"
					);
					tokio::time::sleep(self.retry.delay).await;
					attempt += 1;
				}
				Err(e) => return Err(e),
			}
		};

		match result.effects.failure_message() {
			Some(error) => Err(LedgerError::Execution(error.to_string())),
			None => Ok(result),
		}
	}
}
