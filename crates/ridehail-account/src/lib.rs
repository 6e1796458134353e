//! Account management module for the ridehail client.
//!
//! This module resolves signing credentials for the three actors that
//! drive a run (admin, rider, driver). Key material comes from
//! configuration as a mnemonic phrase or an exported secret key; actors
//! with neither configured get a freshly generated ephemeral keypair.

use ridehail_types::{Address, SecretString};
use std::fmt;
use thiserror::Error;

pub mod keypair;

pub use keypair::Keypair;

/// Errors that can occur while resolving key material.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a mnemonic phrase is malformed.
	#[error("Invalid mnemonic: {0}")]
	InvalidMnemonic(String),
	/// Error that occurs when an exported secret key is malformed.
	#[error("Invalid secret key: {0}")]
	InvalidSecretKey(String),
	/// Error that occurs when an actor has more than one key source configured.
	#[error("Ambiguous key material for {0}: set a mnemonic or a secret key, not both")]
	AmbiguousKeyMaterial(ActorRole),
}

/// The role an actor plays in the ride lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
	/// Deployer-side actor holding the admin capability.
	Admin,
	/// The actor requesting a ride.
	Rider,
	/// The actor accepting and completing a ride.
	Driver,
}

impl fmt::Display for ActorRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ActorRole::Admin => "admin",
			ActorRole::Rider => "rider",
			ActorRole::Driver => "driver",
		};
		write!(f, "{}", name)
	}
}

/// A resolved actor: a role plus its signing keypair.
///
/// Lives for the duration of one run and is never persisted.
#[derive(Debug)]
pub struct Actor {
	role: ActorRole,
	keypair: Keypair,
}

impl Actor {
	/// Resolves an actor from its configured key material.
	///
	/// Exactly one of `mnemonic` and `secret_key` may be set; both set
	/// is rejected as ambiguous, and neither set yields an ephemeral
	/// actor with a freshly generated keypair.
	pub fn resolve(
		role: ActorRole,
		mnemonic: Option<&SecretString>,
		secret_key: Option<&SecretString>,
	) -> Result<Self, AccountError> {
		let keypair = match (mnemonic, secret_key) {
			(Some(_), Some(_)) => return Err(AccountError::AmbiguousKeyMaterial(role)),
			(Some(phrase), None) => Keypair::from_mnemonic(phrase.expose_secret())?,
			(None, Some(secret)) => Keypair::from_base64_secret(secret.expose_secret())?,
			(None, None) => Keypair::generate(),
		};
		Ok(Self { role, keypair })
	}

	/// The role this actor plays.
	pub fn role(&self) -> ActorRole {
		self.role
	}

	/// The actor's chain address.
	pub fn address(&self) -> Address {
		self.keypair.address()
	}

	/// Signs a message with the actor's keypair.
	pub fn sign(&self, message: &[u8]) -> Vec<u8> {
		self.keypair.sign(message)
	}
}
