//! Transaction identity: payer plus a valid-start timestamp.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

use crate::models::{AccountId, ConfigError};

/// Seconds plus nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
	pub seconds: i64,
	pub nanos: u32,
}

impl Timestamp {
	pub fn now() -> Self {
		Self::from(Utc::now())
	}

	/// Clamps at the earliest representable instant.
	pub fn saturating_sub(self, duration: Duration) -> Self {
		Self::from_nanos(self.as_nanos().saturating_sub(duration_nanos(duration)))
	}

	/// Clamps at the latest representable instant.
	pub fn saturating_add(self, duration: Duration) -> Self {
		Self::from_nanos(self.as_nanos().saturating_add(duration_nanos(duration)))
	}

	fn as_nanos(self) -> i128 {
		i128::from(self.seconds) * NANOS_PER_SECOND + i128::from(self.nanos)
	}

	fn from_nanos(total: i128) -> Self {
		let total = total.clamp(
			i128::from(i64::MIN) * NANOS_PER_SECOND,
			i128::from(i64::MAX) * NANOS_PER_SECOND + (NANOS_PER_SECOND - 1),
		);
		Self {
			seconds: total.div_euclid(NANOS_PER_SECOND) as i64,
			nanos: total.rem_euclid(NANOS_PER_SECOND) as u32,
		}
	}
}

const NANOS_PER_SECOND: i128 = 1_000_000_000;

fn duration_nanos(duration: Duration) -> i128 {
	i128::try_from(duration.as_nanos()).unwrap_or(i128::MAX)
}

impl From<DateTime<Utc>> for Timestamp {
	fn from(value: DateTime<Utc>) -> Self {
		Self {
			seconds: value.timestamp(),
			nanos: value.timestamp_subsec_nanos(),
		}
	}
}

impl fmt::Display for Timestamp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{:09}", self.seconds, self.nanos)
	}
}

/// The ledger-wide identity of one transaction.
///
/// Two submissions with the same id are duplicates as far as the network is
/// concerned; retries after a `DUPLICATE_TRANSACTION` or `TRANSACTION_EXPIRED`
/// precheck need a fresh id from [`TransactionId::regenerate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionId {
	pub account_id: AccountId,
	pub valid_start: Timestamp,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub scheduled: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nonce: Option<i32>,
}

impl TransactionId {
	pub fn with_valid_start(account_id: AccountId, valid_start: Timestamp) -> Self {
		Self {
			account_id,
			valid_start,
			scheduled: false,
			nonce: None,
		}
	}

	/// Generates an id for `payer` whose valid start is backdated by a random
	/// 5 to 8 seconds to absorb clock drift between client and node.
	pub fn generate(payer: AccountId) -> Self {
		let backdate = rand::rng().random_range(5_000_000_000u64..8_000_000_000u64);
		let valid_start = Timestamp::now().saturating_sub(Duration::from_nanos(backdate));
		Self::with_valid_start(payer, valid_start)
	}

	/// Produces a new id for the same payer with a strictly later valid start.
	pub fn regenerate(&self) -> Self {
		let mut next = Self::generate(self.account_id.clone());
		if next.valid_start <= self.valid_start {
			next.valid_start = self.valid_start.saturating_add(Duration::from_nanos(1));
		}
		next.scheduled = self.scheduled;
		next
	}
}

impl fmt::Display for TransactionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}@{}", self.account_id, self.valid_start)?;
		if self.scheduled {
			f.write_str("?scheduled")?;
		}
		if let Some(nonce) = self.nonce {
			write!(f, "/{}", nonce)?;
		}
		Ok(())
	}
}

impl FromStr for TransactionId {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let malformed = || {
			ConfigError::parse_error(
				format!("malformed TransactionId '{}', expected account@seconds.nanos", s),
				None,
				None,
			)
		};

		let (rest, nonce) = match s.rsplit_once('/') {
			Some((rest, nonce)) => (rest, Some(nonce.parse::<i32>().map_err(|_| malformed())?)),
			None => (s, None),
		};
		let (rest, scheduled) = match rest.strip_suffix("?scheduled") {
			Some(rest) => (rest, true),
			None => (rest, false),
		};
		let (account, start) = rest.split_once('@').ok_or_else(malformed)?;
		let (seconds, nanos) = start.split_once('.').ok_or_else(malformed)?;

		let nanos: u32 = nanos.parse().map_err(|_| malformed())?;
		if nanos >= 1_000_000_000 {
			return Err(malformed());
		}

		Ok(Self {
			account_id: account.parse()?,
			valid_start: Timestamp {
				seconds: seconds.parse().map_err(|_| malformed())?,
				nanos,
			},
			scheduled,
			nonce,
		})
	}
}
