//! Transaction constructors for the ride contract entrypoints.
//!
//! One pure constructor per remote operation, each a one-to-one mapping
//! to a single entrypoint invocation with positional arguments. No
//! business validation happens here; the contract enforces its own
//! rules and violations surface as execution errors after submission.

use ridehail_config::ContractConfig;
use ridehail_types::{Address, CallArg, EntryTarget, Transaction, TransactionKind};

/// Module of the deployed package exposing the ride entrypoints.
pub const RIDE_MODULE: &str = "ride";

/// Qualified target for a function in the ride module.
fn ride_entry(contract: &ContractConfig, function: &str) -> EntryTarget {
	EntryTarget::new(contract.package_id, RIDE_MODULE, function)
}

/// Mints a new driver capability.
///
/// Admin-signed. The minted capability object is transferred to the
/// designated driver address.
pub fn create_driver(contract: &ContractConfig, sender: Address) -> Transaction {
	Transaction {
		sender,
		kind: TransactionKind::Call {
			target: ride_entry(contract, "create_driver"),
			arguments: vec![CallArg::object(contract.admin_cap)],
			result_recipient: Some(contract.driver_address),
		},
	}
}

/// Registers the driver capability against the shared ride storage.
///
/// Admin-signed.
pub fn send_driver_cap(contract: &ContractConfig, sender: Address) -> Transaction {
	Transaction::call(
		sender,
		ride_entry(contract, "send_driver_cap"),
		vec![
			CallArg::object(contract.admin_cap),
			CallArg::object(contract.ride_storage),
			CallArg::object(contract.driver_cap),
			CallArg::pure_address(contract.driver_address),
		],
	)
}

/// Requests a ride with the given estimated distance.
///
/// Rider-signed. The ride identifier for the new ride is only
/// announced through the emitted `Ride_Request` event.
pub fn request_ride(
	contract: &ContractConfig,
	sender: Address,
	estimate_distance: u64,
) -> Transaction {
	Transaction::call(
		sender,
		ride_entry(contract, "request_ride"),
		vec![
			CallArg::object(contract.ride_storage),
			CallArg::pure_u64(estimate_distance),
		],
	)
}

/// Accepts the ride named by `ride_id`.
///
/// Driver-signed.
pub fn accept_ride(contract: &ContractConfig, sender: Address, ride_id: Address) -> Transaction {
	Transaction::call(
		sender,
		ride_entry(contract, "accept_ride"),
		vec![
			CallArg::object(contract.ride_storage),
			CallArg::pure_address(ride_id),
		],
	)
}

/// Ends the ride named by `ride_id` with the actual distance traveled.
///
/// Driver-signed.
pub fn end_ride(
	contract: &ContractConfig,
	sender: Address,
	ride_id: Address,
	actual_distance: u64,
) -> Transaction {
	Transaction::call(
		sender,
		ride_entry(contract, "end_ride"),
		vec![
			CallArg::object(contract.ride_storage),
			CallArg::pure_address(ride_id),
			CallArg::pure_u64(actual_distance),
		],
	)
}

/// Transfers `amount` base units from `sender` to `recipient`.
///
/// Plain balance transfer, no contract call. Used to bootstrap test
/// actors before the lifecycle proper.
pub fn fund(sender: Address, recipient: Address, amount: u64) -> Transaction {
	Transaction::transfer(sender, recipient, amount)
}
