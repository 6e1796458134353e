//! Transaction execution results reported by the remote node.
//!
//! The node returns the digest, the execution effects (success or a
//! failure status), and the ordered list of events the transaction
//! emitted. Events carry a qualified type name and an opaque JSON
//! payload; callers pull typed values out of a result with
//! [`TransactionResult::extract_event`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when extracting a typed event from a result.
#[derive(Debug, Error)]
pub enum EventError {
	/// Error that occurs when no event of the requested type was emitted.
	#[error("No event of type {0} in transaction result")]
	NotFound(String),
	/// Error that occurs when an event payload does not match the expected shape.
	#[error("Malformed payload for event {0}: {1}")]
	MalformedPayload(String, String),
}

/// Digest identifying a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDigest(pub String);

impl fmt::Display for TransactionDigest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Final execution status reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionStatus {
	/// The transaction executed successfully.
	Success,
	/// The node executed the transaction and it failed.
	Failure {
		/// The node's failure message (contract assertion, stale object, insufficient funds).
		error: String,
	},
}

/// Execution effects for one transaction.
///
/// An opaque result bundle from the client's perspective; only the
/// status is interpreted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEffects {
	/// Final execution status.
	#[serde(flatten)]
	pub status: ExecutionStatus,
}

impl TransactionEffects {
	/// True when the node reported successful execution.
	pub fn is_success(&self) -> bool {
		matches!(self.status, ExecutionStatus::Success)
	}

	/// The node's failure message, when execution failed.
	pub fn failure_message(&self) -> Option<&str> {
		match &self.status {
			ExecutionStatus::Success => None,
			ExecutionStatus::Failure { error } => Some(error),
		}
	}
}

/// A single event emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
	/// Qualified event type name, `package::module::Name`.
	#[serde(rename = "type")]
	pub event_type: String,
	/// Opaque JSON payload as emitted by the contract.
	pub payload: serde_json::Value,
}

/// Full result bundle for one submitted transaction.
///
/// Consumed once by the caller; results are never cached or retried at
/// this level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
	/// Digest of the submitted transaction.
	pub digest: TransactionDigest,
	/// Execution effects, including the final status.
	pub effects: TransactionEffects,
	/// Events emitted by this transaction, in emission order.
	#[serde(default)]
	pub events: Vec<EventRecord>,
}

impl TransactionResult {
	/// True when the node reported successful execution.
	pub fn is_success(&self) -> bool {
		self.effects.is_success()
	}

	/// Extracts the first event of the given type as a typed payload.
	///
	/// The search is scoped to this transaction's own events, so a
	/// caller can never pick up an event emitted by unrelated activity
	/// on the ledger.
	pub fn extract_event<T: DeserializeOwned>(&self, event_type: &str) -> Result<T, EventError> {
		let record = self
			.events
			.iter()
			.find(|event| event.event_type == event_type)
			.ok_or_else(|| EventError::NotFound(event_type.to_string()))?;
		serde_json::from_value(record.payload.clone())
			.map_err(|e| EventError::MalformedPayload(event_type.to_string(), e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[derive(Debug, Deserialize, PartialEq)]
	struct RequestPayload {
		ride_adr: String,
	}

	fn result_with_events(events: Vec<EventRecord>) -> TransactionResult {
		TransactionResult {
			digest: TransactionDigest("digest-1".to_string()),
			effects: TransactionEffects {
				status: ExecutionStatus::Success,
			},
			events,
		}
	}

	#[test]
	fn test_extract_event_typed() {
		let result = result_with_events(vec![
			EventRecord {
				event_type: "0x1::ride::Other".to_string(),
				payload: json!({ "noise": true }),
			},
			EventRecord {
				event_type: "0x1::ride::Ride_Request".to_string(),
				payload: json!({ "ride_adr": "0xabc" }),
			},
		]);

		let payload: RequestPayload = result.extract_event("0x1::ride::Ride_Request").unwrap();
		assert_eq!(payload.ride_adr, "0xabc");
	}

	#[test]
	fn test_extract_event_not_found() {
		let result = result_with_events(vec![]);
		let err = result
			.extract_event::<RequestPayload>("0x1::ride::Ride_Request")
			.unwrap_err();
		assert!(matches!(err, EventError::NotFound(_)));
	}

	#[test]
	fn test_extract_event_malformed_payload() {
		let result = result_with_events(vec![EventRecord {
			event_type: "0x1::ride::Ride_Request".to_string(),
			payload: json!({ "unexpected": 1 }),
		}]);
		let err = result
			.extract_event::<RequestPayload>("0x1::ride::Ride_Request")
			.unwrap_err();
		assert!(matches!(err, EventError::MalformedPayload(_, _)));
	}

	#[test]
	fn test_effects_wire_shape() {
		let success: TransactionEffects = serde_json::from_value(json!({
			"status": "success"
		}))
		.unwrap();
		assert!(success.is_success());
		assert_eq!(success.failure_message(), None);

		let failure: TransactionEffects = serde_json::from_value(json!({
			"status": "failure",
			"error": "MoveAbort: ride already completed"
		}))
		.unwrap();
		assert!(!failure.is_success());
		assert_eq!(
			failure.failure_message(),
			Some("MoveAbort: ride already completed")
		);
	}
}
