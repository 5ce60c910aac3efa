//! Serde helpers encoding byte fields as standard base64 strings.
//!
//! Use with `#[serde(with = "crate::utils::serde_base64")]`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&STANDARD.encode(bytes))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
	let raw = String::deserialize(deserializer)?;
	STANDARD.decode(raw).map_err(serde::de::Error::custom)
}

/// Same encoding for `Option<Vec<u8>>`.
pub mod option {
	use super::STANDARD;
	use base64::Engine as _;
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(
		bytes: &Option<Vec<u8>>,
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		match bytes {
			Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Option<Vec<u8>>, D::Error> {
		Option::<String>::deserialize(deserializer)?
			.map(|raw| STANDARD.decode(raw).map_err(serde::de::Error::custom))
			.transpose()
	}
}
