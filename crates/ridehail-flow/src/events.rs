//! Event payloads emitted by the ride contract.
//!
//! The contract announces the identifier of a newly created ride only
//! through the `Ride_Request` event; no entrypoint returns it directly.
//! Callers extract the payload from the request transaction's own
//! result, never from a global event query.

use crate::tx::RIDE_MODULE;
use ridehail_types::Address;
use serde::Deserialize;

/// Unqualified name of the event announcing a newly created ride.
pub const RIDE_REQUEST_EVENT: &str = "Ride_Request";

/// Payload of the `Ride_Request` event.
#[derive(Debug, Clone, Deserialize)]
pub struct RideRequestEvent {
	/// Address-like token naming the new ride instance.
	pub ride_adr: String,
}

/// Fully qualified `Ride_Request` event type for the deployed package.
pub fn ride_request_event_type(package: &Address) -> String {
	format!("{}::{}::{}", package, RIDE_MODULE, RIDE_REQUEST_EVENT)
}
