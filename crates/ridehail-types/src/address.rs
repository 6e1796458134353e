//! Chain address types for the ridehail client.
//!
//! Addresses are 32-byte identifiers rendered as 0x-prefixed lowercase
//! hex. They name accounts, deployed packages, and on-ledger objects
//! alike; the client never inspects what an address points at, it only
//! forwards it.

use crate::utils::without_0x_prefix;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of bytes in a chain address.
pub const ADDRESS_LENGTH: usize = 32;

/// Errors that can occur when parsing an address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
	/// Error that occurs when the input is empty.
	#[error("Empty address")]
	Empty,
	/// Error that occurs when the input is not valid hex.
	#[error("Invalid hex encoding: {0}")]
	InvalidHex(String),
	/// Error that occurs when the input exceeds the address width.
	#[error("Invalid address length: expected at most 64 hex characters, got {0}")]
	InvalidLength(usize),
}

/// A 32-byte chain address.
///
/// Parses from 0x-prefixed or bare hex. Inputs shorter than the full
/// width are left-padded with zeros, matching how well-known object ids
/// are commonly abbreviated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
	/// Creates an address from raw bytes.
	pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
		Self(bytes)
	}

	/// Returns the raw address bytes.
	pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
		&self.0
	}
}

impl FromStr for Address {
	type Err = AddressError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let hex_str = without_0x_prefix(s.trim());
		if hex_str.is_empty() {
			return Err(AddressError::Empty);
		}
		if hex_str.len() > 2 * ADDRESS_LENGTH {
			return Err(AddressError::InvalidLength(hex_str.len()));
		}
		let padded = format!("{:0>width$}", hex_str, width = 2 * ADDRESS_LENGTH);
		let bytes = hex::decode(padded).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
		let mut out = [0u8; ADDRESS_LENGTH];
		out.copy_from_slice(&bytes);
		Ok(Self(out))
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Address({})", self)
	}
}

impl Serialize for Address {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}
