//! Ed25519 keypairs and chain address derivation.
//!
//! A keypair comes from one of three sources: deterministic derivation
//! from a mnemonic phrase, import of an exported base64 secret key, or
//! fresh random generation for ephemeral actors. The chain address is
//! derived from the scheme flag and the public key.

use crate::AccountError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signer, SigningKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use rand::rngs::OsRng;
use ridehail_types::Address;
use sha3::{Digest, Sha3_256, Sha3_512};

/// Signature scheme flag byte for ed25519 keys.
pub const ED25519_FLAG: u8 = 0x00;

/// Length of a raw ed25519 secret key.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Length of an exported secret key carrying the leading scheme flag.
pub const FLAGGED_SECRET_KEY_LENGTH: usize = SECRET_KEY_LENGTH + 1;

/// Accepted mnemonic phrase lengths, in words.
const MNEMONIC_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Domain separator for mnemonic seed derivation.
const MNEMONIC_SEED_DOMAIN: &[u8] = b"ridehail-mnemonic-seed-v1";

/// An ed25519 signing keypair bound to a chain address.
#[derive(Debug)]
pub struct Keypair {
	signing_key: SigningKey,
}

impl Keypair {
	/// Derives a keypair deterministically from a mnemonic phrase.
	///
	/// The phrase is normalized (whitespace collapsed, lowercased)
	/// before hashing, so formatting differences do not change the
	/// derived address. The word count must be one of the standard
	/// mnemonic lengths.
	pub fn from_mnemonic(phrase: &str) -> Result<Self, AccountError> {
		let words: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
		if !MNEMONIC_WORD_COUNTS.contains(&words.len()) {
			return Err(AccountError::InvalidMnemonic(format!(
				"expected 12, 15, 18, 21 or 24 words, got {}",
				words.len()
			)));
		}

		let mut hasher = Sha3_512::new();
		hasher.update(MNEMONIC_SEED_DOMAIN);
		hasher.update(words.join(" ").as_bytes());
		let digest = hasher.finalize();

		let mut seed = [0u8; SECRET_KEY_LENGTH];
		seed.copy_from_slice(&digest[..SECRET_KEY_LENGTH]);
		Ok(Self {
			signing_key: SigningKey::from_bytes(&seed),
		})
	}

	/// Imports a keypair from an exported base64 secret key.
	///
	/// Accepts the flagged export format (scheme flag byte followed by
	/// the 32-byte key, with the flag stripped on import) as well as a
	/// raw 32-byte key.
	pub fn from_base64_secret(encoded: &str) -> Result<Self, AccountError> {
		let bytes = STANDARD
			.decode(encoded.trim())
			.map_err(|e| AccountError::InvalidSecretKey(format!("invalid base64: {}", e)))?;

		let raw: &[u8] = match bytes.len() {
			FLAGGED_SECRET_KEY_LENGTH => {
				if bytes[0] != ED25519_FLAG {
					return Err(AccountError::InvalidSecretKey(format!(
						"unsupported key scheme flag {:#04x}",
						bytes[0]
					)));
				}
				&bytes[1..]
			}
			SECRET_KEY_LENGTH => &bytes,
			other => {
				return Err(AccountError::InvalidSecretKey(format!(
					"expected {} or {} bytes, got {}",
					SECRET_KEY_LENGTH, FLAGGED_SECRET_KEY_LENGTH, other
				)))
			}
		};

		let mut seed = [0u8; SECRET_KEY_LENGTH];
		seed.copy_from_slice(raw);
		Ok(Self {
			signing_key: SigningKey::from_bytes(&seed),
		})
	}

	/// Generates a fresh random keypair for an ephemeral actor.
	pub fn generate() -> Self {
		Self {
			signing_key: SigningKey::generate(&mut OsRng),
		}
	}

	/// Derives the chain address for this keypair.
	///
	/// The address is the SHA3-256 digest of the scheme flag followed
	/// by the public key bytes.
	pub fn address(&self) -> Address {
		let mut hasher = Sha3_256::new();
		hasher.update([ED25519_FLAG]);
		hasher.update(self.signing_key.verifying_key().as_bytes());
		let digest = hasher.finalize();

		let mut bytes = [0u8; 32];
		bytes.copy_from_slice(&digest);
		Address::from_bytes(bytes)
	}

	/// Signs a message, returning the serialized signature envelope:
	/// scheme flag, 64-byte signature, then the 32-byte public key.
	pub fn sign(&self, message: &[u8]) -> Vec<u8> {
		let signature = self.signing_key.sign(message);

		let mut envelope = Vec::with_capacity(1 + SIGNATURE_LENGTH + PUBLIC_KEY_LENGTH);
		envelope.push(ED25519_FLAG);
		envelope.extend_from_slice(&signature.to_bytes());
		envelope.extend_from_slice(self.signing_key.verifying_key().as_bytes());
		envelope
	}
}
