//! Fixed custom fees and the per-payer limits a transaction is willing to pay.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{AccountId, TokenId};

/// A fixed fee charged in hbar (no denomination) or in a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFixedFee {
	pub amount: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub denominating_token_id: Option<TokenId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee_collector_account_id: Option<AccountId>,
}

impl CustomFixedFee {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_amount(&mut self, amount: u64) -> &mut Self {
		self.amount = amount;
		self
	}

	pub fn set_denominating_token_id(&mut self, token_id: TokenId) -> &mut Self {
		self.denominating_token_id = Some(token_id);
		self
	}

	pub fn set_fee_collector_account_id(&mut self, account_id: AccountId) -> &mut Self {
		self.fee_collector_account_id = Some(account_id);
		self
	}
}

fn fmt_optional<T: fmt::Display>(value: &Option<T>) -> String {
	value
		.as_ref()
		.map(ToString::to_string)
		.unwrap_or_else(|| "none".to_string())
}

impl fmt::Display for CustomFixedFee {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"CustomFixedFee{{Amount: {}, DenominatingTokenId: {}, FeeCollectorAccountId: {}}}",
			self.amount,
			fmt_optional(&self.denominating_token_id),
			fmt_optional(&self.fee_collector_account_id)
		)
	}
}

/// Upper bound on custom fees a payer accepts (HIP-991).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFeeLimit {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payer_id: Option<AccountId>,
	#[serde(default)]
	pub custom_fees: Vec<CustomFixedFee>,
}

impl CustomFeeLimit {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_payer_id(&mut self, payer_id: AccountId) -> &mut Self {
		self.payer_id = Some(payer_id);
		self
	}

	pub fn payer_id(&self) -> Option<&AccountId> {
		self.payer_id.as_ref()
	}

	pub fn set_custom_fees(&mut self, custom_fees: Vec<CustomFixedFee>) -> &mut Self {
		self.custom_fees = custom_fees;
		self
	}

	pub fn add_custom_fee(&mut self, custom_fee: CustomFixedFee) -> &mut Self {
		self.custom_fees.push(custom_fee);
		self
	}

	pub fn custom_fees(&self) -> &[CustomFixedFee] {
		&self.custom_fees
	}
}

impl fmt::Display for CustomFeeLimit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let fees: Vec<String> = self.custom_fees.iter().map(ToString::to_string).collect();
		write!(
			f,
			"CustomFeeLimit{{PayerId: {}, CustomFees: [{}]}}",
			fmt_optional(&self.payer_id),
			fees.join(", ")
		)
	}
}
