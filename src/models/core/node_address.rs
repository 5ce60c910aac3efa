//! Address book entries describing consensus nodes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha384};
use std::fmt;

use crate::models::{AccountId, ConfigError};

/// One network address of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
	/// IPv4 address or host name. May be empty when only a domain is known.
	#[serde(default)]
	pub address: String,
	pub port: u16,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain_name: Option<String>,
}

impl Endpoint {
	pub fn new(address: impl Into<String>, port: u16) -> Self {
		Self {
			address: address.into(),
			port,
			domain_name: None,
		}
	}

	/// Host used to dial: the domain name when present, else the address.
	pub fn host(&self) -> Option<&str> {
		match self.domain_name.as_deref() {
			Some(domain) if !domain.is_empty() => Some(domain),
			_ if !self.address.is_empty() => Some(self.address.as_str()),
			_ => None,
		}
	}

	/// `host:port`, or `None` if the endpoint cannot be dialed.
	pub fn authority(&self) -> Option<String> {
		if self.port == 0 {
			return None;
		}
		self.host().map(|host| format!("{}:{}", host, self.port))
	}

	/// Parses `host:port`.
	pub fn parse(authority: &str) -> Result<Self, ConfigError> {
		let (host, port) = authority.rsplit_once(':').ok_or_else(|| {
			ConfigError::parse_error(
				format!("endpoint '{}' must be host:port", authority),
				None,
				None,
			)
		})?;
		let port = port.parse::<u16>().map_err(|e| {
			ConfigError::parse_error(
				format!("endpoint '{}' has an invalid port", authority),
				Some(Box::new(e)),
				None,
			)
		})?;
		if host.is_empty() {
			return Err(ConfigError::parse_error(
				format!("endpoint '{}' has an empty host", authority),
				None,
				None,
			));
		}
		Ok(Self::new(host, port))
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.address, self.port)?;
		if let Some(domain) = &self.domain_name {
			write!(f, " ({})", domain)?;
		}
		Ok(())
	}
}

/// A node's entry in the address book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAddress {
	pub node_id: u64,
	pub account_id: Option<AccountId>,
	/// Hex SHA-384 digest of the node's TLS certificate.
	#[serde(default)]
	pub cert_hash: String,
	#[serde(default)]
	pub addresses: Vec<Endpoint>,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub public_key: String,
}

impl NodeAddress {
	/// Checks a presented certificate (PEM or DER bytes, hashed as given)
	/// against the pinned digest. An entry without a digest pins nothing.
	pub fn verify_certificate(&self, certificate: &[u8]) -> bool {
		let expected = self.cert_hash.trim_start_matches("0x");
		if expected.is_empty() {
			return true;
		}
		let actual = hex::encode(Sha384::digest(certificate));
		actual.eq_ignore_ascii_case(expected)
	}
}

impl fmt::Display for NodeAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let addresses: Vec<String> = self.addresses.iter().map(ToString::to_string).collect();
		write!(
			f,
			"NodeAccountId: {} CertHash: {} NodeId: {} PubKey: {} Description: {} Addresses: [{}]",
			self.account_id
				.as_ref()
				.map(ToString::to_string)
				.unwrap_or_default(),
			self.cert_hash,
			self.node_id,
			self.public_key,
			self.description,
			addresses.join(", ")
		)
	}
}

/// The full address book, as fetched from a mirror node or loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAddressBook {
	pub node_addresses: Vec<NodeAddress>,
}

impl NodeAddressBook {
	pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
		Ok(serde_json::to_vec(self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
		Ok(serde_json::from_slice(bytes)?)
	}
}
