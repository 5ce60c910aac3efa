//! The `shard.realm.num` identifier family.

/// Declares a ledger entity identifier (`AccountId`, `TokenId`, ...).
///
/// The generated type parses `"0.0.123"` and `"0.0.123-abcde"`, displays
/// without the checksum, and compares/hashes on `(shard, realm, num)` only so
/// that a checksummed and a bare id address the same map entry. It
/// serializes as its string form.
#[macro_export]
macro_rules! impl_entity_id {
	($(#[$meta:meta])* $name:ident, $label:literal) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Default)]
		pub struct $name {
			pub shard: u64,
			pub realm: u64,
			pub num: u64,
			/// Checksum as written by the user, if any. Not part of identity.
			pub checksum: Option<String>,
		}

		impl $name {
			pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
				Self {
					shard,
					realm,
					num,
					checksum: None,
				}
			}

			/// Shorthand for `0.0.num`.
			pub const fn from_num(num: u64) -> Self {
				Self::new(0, 0, num)
			}

			/// Formats the id followed by its checksum for `ledger_id`.
			pub fn to_string_with_checksum(
				&self,
				ledger_id: &$crate::models::LedgerId,
			) -> String {
				format!(
					"{}-{}",
					self,
					$crate::models::entity_checksum(ledger_id, &self.to_string())
				)
			}

			/// Verifies the user-supplied checksum (if any) against `ledger_id`.
			pub fn validate_checksum(
				&self,
				ledger_id: &$crate::models::LedgerId,
			) -> Result<(), $crate::models::ConfigError> {
				$crate::models::validate_entity_checksum(
					$label,
					&self.to_string(),
					self.checksum.as_deref(),
					ledger_id,
				)
			}
		}

		impl PartialEq for $name {
			fn eq(&self, other: &Self) -> bool {
				(self.shard, self.realm, self.num) == (other.shard, other.realm, other.num)
			}
		}

		impl Eq for $name {}

		impl std::hash::Hash for $name {
			fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
				(self.shard, self.realm, self.num).hash(state);
			}
		}

		impl PartialOrd for $name {
			fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
				Some(self.cmp(other))
			}
		}

		impl Ord for $name {
			fn cmp(&self, other: &Self) -> std::cmp::Ordering {
				(self.shard, self.realm, self.num).cmp(&(other.shard, other.realm, other.num))
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
			}
		}

		impl std::str::FromStr for $name {
			type Err = $crate::models::ConfigError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				let (shard, realm, num, checksum) = $crate::models::parse_entity_id($label, s)?;
				Ok(Self {
					shard,
					realm,
					num,
					checksum,
				})
			}
		}

		impl ::serde::Serialize for $name {
			fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.collect_str(self)
			}
		}

		impl<'de> ::serde::Deserialize<'de> for $name {
			fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				let raw = String::deserialize(deserializer)?;
				raw.parse().map_err(::serde::de::Error::custom)
			}
		}
	};
}
