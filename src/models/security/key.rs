//! Ed25519 keys and the signer seam used by transactions.

use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use std::{fmt, str::FromStr};

use crate::models::security::error::{SecurityError, SecurityResult};

/// DER (PKCS#8) prefix of an Ed25519 private key.
const PRIVATE_KEY_DER_PREFIX: &str = "302e020100300506032b657004220420";
/// DER (SPKI) prefix of an Ed25519 public key.
const PUBLIC_KEY_DER_PREFIX: &str = "302a300506032b6570032100";

/// Anything able to produce signatures over transaction body bytes.
///
/// Implemented by [`PrivateKey`]; external signers (HSMs, wallets) implement
/// it to take part in signing and transaction-id regeneration.
pub trait Signer: Send + Sync {
	fn public_key(&self) -> PublicKey;
	fn sign(&self, message: &[u8]) -> Vec<u8>;
}

/// Ed25519 private key.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
	pub fn generate_ed25519() -> Self {
		Self(SigningKey::from_bytes(&rand::random::<[u8; 32]>()))
	}

	/// Accepts the raw 32-byte seed or its 48-byte DER encoding.
	pub fn from_bytes(bytes: &[u8]) -> SecurityResult<Self> {
		let prefix = hex::decode(PRIVATE_KEY_DER_PREFIX).unwrap_or_default();
		let raw = match bytes.len() {
			32 => bytes,
			48 if bytes.starts_with(&prefix) => &bytes[prefix.len()..],
			len => {
				return Err(Box::new(SecurityError::parse_error(
					format!("invalid Ed25519 private key length {}", len),
					None,
					None,
				)))
			}
		};
		let mut seed = [0u8; 32];
		seed.copy_from_slice(raw);
		Ok(Self(SigningKey::from_bytes(&seed)))
	}

	pub fn public_key(&self) -> PublicKey {
		PublicKey(self.0.verifying_key())
	}

	pub fn to_bytes_raw(&self) -> [u8; 32] {
		self.0.to_bytes()
	}

	/// Hex of the DER encoding.
	pub fn to_string_der(&self) -> String {
		format!("{}{}", PRIVATE_KEY_DER_PREFIX, hex::encode(self.0.to_bytes()))
	}

	pub fn sign(&self, message: &[u8]) -> Vec<u8> {
		self.0.sign(message).to_bytes().to_vec()
	}
}

impl Signer for PrivateKey {
	fn public_key(&self) -> PublicKey {
		PrivateKey::public_key(self)
	}

	fn sign(&self, message: &[u8]) -> Vec<u8> {
		PrivateKey::sign(self, message)
	}
}

impl fmt::Debug for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("PrivateKey")
			.field(&self.public_key().to_string())
			.finish()
	}
}

impl FromStr for PrivateKey {
	type Err = Box<SecurityError>;

	/// Hex, raw or DER, with or without a `0x` prefix.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = decode_hex("private key", s)?;
		Self::from_bytes(&bytes)
	}
}

/// Ed25519 public key. The DER encoding is its stable wire identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
	/// Accepts the raw 32-byte key or its 44-byte DER encoding.
	pub fn from_bytes(bytes: &[u8]) -> SecurityResult<Self> {
		let prefix = hex::decode(PUBLIC_KEY_DER_PREFIX).unwrap_or_default();
		let raw = match bytes.len() {
			32 => bytes,
			44 if bytes.starts_with(&prefix) => &bytes[prefix.len()..],
			len => {
				return Err(Box::new(SecurityError::parse_error(
					format!("invalid Ed25519 public key length {}", len),
					None,
					None,
				)))
			}
		};
		let mut key = [0u8; 32];
		key.copy_from_slice(raw);
		VerifyingKey::from_bytes(&key).map(Self).map_err(|e| {
			Box::new(SecurityError::parse_error(
				"invalid Ed25519 public key",
				Some(Box::new(e)),
				None,
			))
		})
	}

	pub fn to_bytes_raw(&self) -> [u8; 32] {
		self.0.to_bytes()
	}

	pub fn to_bytes_der(&self) -> Vec<u8> {
		let mut bytes = hex::decode(PUBLIC_KEY_DER_PREFIX).unwrap_or_default();
		bytes.extend_from_slice(self.0.as_bytes());
		bytes
	}

	/// Checks an Ed25519 signature over `message`.
	pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
		let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
			return false;
		};
		self.0.verify(message, &signature).is_ok()
	}
}

impl fmt::Display for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&hex::encode(self.to_bytes_der()))
	}
}

impl fmt::Debug for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PublicKey({})", self)
	}
}

impl FromStr for PublicKey {
	type Err = Box<SecurityError>;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = decode_hex("public key", s)?;
		Self::from_bytes(&bytes)
	}
}

impl serde::Serialize for PublicKey {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> serde::Deserialize<'de> for PublicKey {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}

fn decode_hex(what: &str, s: &str) -> SecurityResult<Vec<u8>> {
	let trimmed = s.trim();
	let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
	hex::decode(trimmed).map_err(|e| {
		Box::new(SecurityError::parse_error(
			format!("{} is not valid hex", what),
			Some(Box::new(e)),
			None,
		))
	})
}

/// A signer backed by a closure, for keys that live outside this process.
pub struct FnSigner<F> {
	public_key: PublicKey,
	sign: F,
}

impl<F> FnSigner<F>
where
	F: Fn(&[u8]) -> Vec<u8> + Send + Sync,
{
	pub fn new(public_key: PublicKey, sign: F) -> Self {
		Self { public_key, sign }
	}
}

impl<F> Signer for FnSigner<F>
where
	F: Fn(&[u8]) -> Vec<u8> + Send + Sync,
{
	fn public_key(&self) -> PublicKey {
		self.public_key
	}

	fn sign(&self, message: &[u8]) -> Vec<u8> {
		(self.sign)(message)
	}
}
