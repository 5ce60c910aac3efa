//! Ledger identifiers and the HIP-15 address checksum.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

use crate::models::ConfigError;

/// Identifies which ledger a client talks to. Feeds the entity checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerId(Vec<u8>);

impl LedgerId {
	pub fn mainnet() -> Self {
		Self(vec![0x00])
	}

	pub fn testnet() -> Self {
		Self(vec![0x01])
	}

	pub fn previewnet() -> Self {
		Self(vec![0x02])
	}

	pub fn from_bytes(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn is_mainnet(&self) -> bool {
		self.0 == [0x00]
	}

	pub fn is_testnet(&self) -> bool {
		self.0 == [0x01]
	}

	pub fn is_previewnet(&self) -> bool {
		self.0 == [0x02]
	}
}

impl fmt::Display for LedgerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_mainnet() {
			f.write_str("mainnet")
		} else if self.is_testnet() {
			f.write_str("testnet")
		} else if self.is_previewnet() {
			f.write_str("previewnet")
		} else {
			f.write_str(&hex::encode(&self.0))
		}
	}
}

impl FromStr for LedgerId {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"mainnet" => Ok(Self::mainnet()),
			"testnet" => Ok(Self::testnet()),
			"previewnet" => Ok(Self::previewnet()),
			other => hex::decode(other).map(Self).map_err(|e| {
				ConfigError::parse_error(
					format!("invalid ledger id '{}'", other),
					Some(Box::new(e)),
					None,
				)
			}),
		}
	}
}

impl Serialize for LedgerId {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for LedgerId {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}

const P3: u64 = 26 * 26 * 26;
const P5: u64 = 26 * 26 * 26 * 26 * 26;
const M: u64 = 1_000_003;
const W: u64 = 31;

/// HIP-15 checksum of an entity address such as `"0.0.123"`.
///
/// Returns five lowercase letters. Characters other than digits and `.`
/// never reach here because ids are formatted from integers.
pub fn entity_checksum(ledger_id: &LedgerId, address: &str) -> String {
	let digits: Vec<u64> = address
		.chars()
		.map(|c| match c {
			'.' => 10,
			c => c.to_digit(10).map(u64::from).unwrap_or(0),
		})
		.collect();

	let (mut s0, mut s1, mut s, mut sh) = (0u64, 0u64, 0u64, 0u64);
	for (i, d) in digits.iter().enumerate() {
		s = (W * s + d) % P3;
		if i % 2 == 0 {
			s0 = (s0 + d) % 11;
		} else {
			s1 = (s1 + d) % 11;
		}
	}

	for b in ledger_id.as_bytes().iter().chain([0u8; 6].iter()) {
		sh = (W * sh + u64::from(*b)) % P5;
	}

	let mut c = ((((digits.len() as u64 % 5) * 11 + s0) * 11 + s1) * P3 + s + sh) % P5;
	c = (c * M) % P5;

	let mut letters = [b'a'; 5];
	for slot in letters.iter_mut().rev() {
		*slot = b'a' + (c % 26) as u8;
		c /= 26;
	}
	letters.iter().map(|b| *b as char).collect()
}

/// Compares a user-supplied checksum with the one expected on `ledger_id`.
pub fn validate_entity_checksum(
	kind: &str,
	address: &str,
	checksum: Option<&str>,
	ledger_id: &LedgerId,
) -> Result<(), ConfigError> {
	let Some(given) = checksum else {
		return Ok(());
	};

	let expected = entity_checksum(ledger_id, address);
	if given == expected {
		Ok(())
	} else {
		Err(ConfigError::validation_error(
			format!(
				"{} {}-{} has an invalid checksum for {}",
				kind, address, given, ledger_id
			),
			None,
			Some(HashMap::from([
				("expected_checksum".to_string(), expected),
				("ledger".to_string(), ledger_id.to_string()),
			])),
		))
	}
}

/// Splits `"s.r.n"` or `"s.r.n-abcde"` into its parts.
pub fn parse_entity_id(
	kind: &str,
	s: &str,
) -> Result<(u64, u64, u64, Option<String>), ConfigError> {
	let malformed = || {
		ConfigError::parse_error(
			format!("malformed {} '{}', expected shard.realm.num", kind, s),
			None,
			None,
		)
	};

	let (address, checksum) = match s.split_once('-') {
		Some((address, checksum)) => {
			if checksum.len() != 5 || !checksum.chars().all(|c| c.is_ascii_lowercase()) {
				return Err(malformed());
			}
			(address, Some(checksum.to_string()))
		}
		None => (s, None),
	};

	let parts: Vec<&str> = address.split('.').collect();
	if parts.len() != 3 {
		return Err(malformed());
	}

	let mut nums = [0u64; 3];
	for (slot, part) in nums.iter_mut().zip(parts.iter()) {
		*slot = part.parse().map_err(|_| malformed())?;
	}

	Ok((nums[0], nums[1], nums[2], checksum))
}
