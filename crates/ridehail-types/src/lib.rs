//! Common types module for the ridehail client.
//!
//! This module defines the core data types shared across the client
//! crates: chain addresses, transaction requests and their signed wire
//! form, execution results with emitted events, and a secure wrapper
//! for sensitive configuration values.

/// Chain address representation and parsing.
pub mod address;
/// Execution results, effects, and emitted events.
pub mod execution;
/// Secure string type for sensitive configuration values.
pub mod secret_string;
/// Transaction requests and their signed wire encoding.
pub mod transaction;
/// Utility functions for display formatting.
pub mod utils;

pub use address::{Address, AddressError};
pub use execution::{
	EventError, EventRecord, ExecutionStatus, TransactionDigest, TransactionEffects,
	TransactionResult,
};
pub use secret_string::SecretString;
pub use transaction::{
	CallArg, EntryTarget, PureValue, SignedTransaction, Transaction, TransactionKind,
};
pub use utils::{truncate_id, without_0x_prefix};
