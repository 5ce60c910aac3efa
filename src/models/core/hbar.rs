//! Hbar amounts, stored as tinybars.

use serde::{Deserialize, Serialize};
use std::fmt;

const TINYBARS_PER_HBAR: i64 = 100_000_000;

#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Hbar(i64);

impl Hbar {
	pub const ZERO: Hbar = Hbar(0);

	/// Whole hbars.
	pub const fn new(hbars: i64) -> Self {
		Self(hbars * TINYBARS_PER_HBAR)
	}

	pub const fn from_tinybars(tinybars: i64) -> Self {
		Self(tinybars)
	}

	pub const fn to_tinybars(self) -> i64 {
		self.0
	}
}

impl fmt::Display for Hbar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0 % TINYBARS_PER_HBAR == 0 {
			write!(f, "{} ℏ", self.0 / TINYBARS_PER_HBAR)
		} else {
			write!(f, "{} tℏ", self.0)
		}
	}
}
