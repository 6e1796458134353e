//! Transaction request types and their signed wire encoding.
//!
//! A transaction is either a single entrypoint invocation against the
//! deployed contract or a plain balance transfer. Requests are built
//! fresh per operation and are immutable once submitted; the signed
//! form carries the canonical transaction bytes plus the signature
//! envelope, both base64-encoded.

use crate::address::Address;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified entrypoint name: package, module, and function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTarget {
	/// The deployed package the entrypoint lives in.
	pub package: Address,
	/// The module within the package.
	pub module: String,
	/// The function within the module.
	pub function: String,
}

impl EntryTarget {
	/// Creates a new entry target.
	pub fn new(package: Address, module: impl Into<String>, function: impl Into<String>) -> Self {
		Self {
			package,
			module: module.into(),
			function: function.into(),
		}
	}
}

impl fmt::Display for EntryTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}::{}", self.package, self.module, self.function)
	}
}

/// A primitive value passed by value to an entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PureValue {
	/// An unsigned 64-bit integer.
	U64(u64),
	/// A chain address.
	Address(Address),
}

/// A positional argument to an entrypoint call.
///
/// Object arguments reference on-ledger objects by address and are
/// resolved (and version-checked) by the node; pure arguments are
/// passed by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "arg", content = "value", rename_all = "snake_case")]
pub enum CallArg {
	/// A reference to an on-ledger object.
	Object(Address),
	/// A primitive passed by value.
	Pure(PureValue),
}

impl CallArg {
	/// Object argument referencing the on-ledger object at `address`.
	pub fn object(address: Address) -> Self {
		Self::Object(address)
	}

	/// Pure u64 argument.
	pub fn pure_u64(value: u64) -> Self {
		Self::Pure(PureValue::U64(value))
	}

	/// Pure address argument.
	pub fn pure_address(address: Address) -> Self {
		Self::Pure(PureValue::Address(address))
	}
}

/// The operation a transaction performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
	/// A single entrypoint invocation against the deployed contract.
	Call {
		/// The qualified entrypoint to invoke.
		target: EntryTarget,
		/// Positional arguments, in entrypoint order.
		arguments: Vec<CallArg>,
		/// Recipient for an object produced by the call, if any.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result_recipient: Option<Address>,
	},
	/// A balance transfer from the sender.
	Transfer {
		/// Recipient address.
		recipient: Address,
		/// Amount in base units.
		amount: u64,
	},
}

/// A transaction request: a sender plus the operation to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Address the transaction is sent, and signed, by.
	pub sender: Address,
	/// The operation to perform.
	pub kind: TransactionKind,
}

impl Transaction {
	/// Creates an entrypoint call transaction with no result recipient.
	pub fn call(sender: Address, target: EntryTarget, arguments: Vec<CallArg>) -> Self {
		Self {
			sender,
			kind: TransactionKind::Call {
				target,
				arguments,
				result_recipient: None,
			},
		}
	}

	/// Creates a balance transfer transaction.
	pub fn transfer(sender: Address, recipient: Address, amount: u64) -> Self {
		Self {
			sender,
			kind: TransactionKind::Transfer { recipient, amount },
		}
	}

	/// Canonical byte encoding, used both for signing and for submission.
	pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
		serde_json::to_vec(self)
	}
}

/// A transaction in signed wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
	/// Base64 of the canonical transaction bytes.
	pub tx_bytes: String,
	/// Base64 signature envelope authorizing the transaction.
	pub signature: String,
}

impl SignedTransaction {
	/// Encodes transaction bytes and signature envelope for the wire.
	pub fn from_parts(tx_bytes: &[u8], signature: &[u8]) -> Self {
		Self {
			tx_bytes: STANDARD.encode(tx_bytes),
			signature: STANDARD.encode(signature),
		}
	}
}
