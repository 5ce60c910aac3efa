use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
	models::{AccountId, ConfigError, CustomFixedFee, Hbar, LedgerId, PublicKey},
	services::{
		execute::ClientError,
		transaction::{Transaction, TransactionData},
		transport::RpcMethod,
	},
};

/// Roughly 90 days.
const DEFAULT_AUTO_RENEW_PERIOD_SECS: u64 = 7_890_000;

/// Creates a consensus topic.
pub type TopicCreateTransaction = Transaction<TopicCreateTransactionData>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCreateTransactionData {
	#[serde(default, skip_serializing_if = "String::is_empty")]
	topic_memo: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	admin_key: Option<PublicKey>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	submit_key: Option<PublicKey>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	fee_schedule_key: Option<PublicKey>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	fee_exempt_keys: Vec<PublicKey>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	custom_fees: Vec<CustomFixedFee>,
	/// Seconds.
	auto_renew_period: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	auto_renew_account_id: Option<AccountId>,
}

impl Default for TopicCreateTransactionData {
	fn default() -> Self {
		Self {
			topic_memo: String::new(),
			admin_key: None,
			submit_key: None,
			fee_schedule_key: None,
			fee_exempt_keys: Vec::new(),
			custom_fees: Vec::new(),
			auto_renew_period: DEFAULT_AUTO_RENEW_PERIOD_SECS,
			auto_renew_account_id: None,
		}
	}
}

impl TransactionData for TopicCreateTransactionData {
	const KIND: &'static str = "consensusCreateTopic";

	fn method(&self) -> RpcMethod {
		RpcMethod::new("ConsensusService", "createTopic")
	}

	fn initial_max_transaction_fee() -> Option<Hbar> {
		Some(Hbar::new(25))
	}

	fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), ConfigError> {
		if let Some(account_id) = &self.auto_renew_account_id {
			account_id.validate_checksum(ledger_id)?;
		}
		for fee in &self.custom_fees {
			if let Some(collector) = &fee.fee_collector_account_id {
				collector.validate_checksum(ledger_id)?;
			}
			if let Some(token_id) = &fee.denominating_token_id {
				token_id.validate_checksum(ledger_id)?;
			}
		}
		Ok(())
	}
}

impl Transaction<TopicCreateTransactionData> {
	pub fn topic_memo(&self) -> &str {
		&self.data().topic_memo
	}

	pub fn set_topic_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, ClientError> {
		self.data_mut()?.topic_memo = memo.into();
		Ok(self)
	}

	pub fn admin_key(&self) -> Option<PublicKey> {
		self.data().admin_key
	}

	pub fn set_admin_key(&mut self, key: PublicKey) -> Result<&mut Self, ClientError> {
		self.data_mut()?.admin_key = Some(key);
		Ok(self)
	}

	pub fn submit_key(&self) -> Option<PublicKey> {
		self.data().submit_key
	}

	pub fn set_submit_key(&mut self, key: PublicKey) -> Result<&mut Self, ClientError> {
		self.data_mut()?.submit_key = Some(key);
		Ok(self)
	}

	pub fn fee_schedule_key(&self) -> Option<PublicKey> {
		self.data().fee_schedule_key
	}

	pub fn set_fee_schedule_key(&mut self, key: PublicKey) -> Result<&mut Self, ClientError> {
		self.data_mut()?.fee_schedule_key = Some(key);
		Ok(self)
	}

	pub fn fee_exempt_keys(&self) -> &[PublicKey] {
		&self.data().fee_exempt_keys
	}

	pub fn set_fee_exempt_keys(&mut self, keys: Vec<PublicKey>) -> Result<&mut Self, ClientError> {
		self.data_mut()?.fee_exempt_keys = keys;
		Ok(self)
	}

	pub fn add_fee_exempt_key(&mut self, key: PublicKey) -> Result<&mut Self, ClientError> {
		self.data_mut()?.fee_exempt_keys.push(key);
		Ok(self)
	}

	pub fn custom_fees(&self) -> &[CustomFixedFee] {
		&self.data().custom_fees
	}

	pub fn set_custom_fees(&mut self, fees: Vec<CustomFixedFee>) -> Result<&mut Self, ClientError> {
		self.data_mut()?.custom_fees = fees;
		Ok(self)
	}

	pub fn add_custom_fee(&mut self, fee: CustomFixedFee) -> Result<&mut Self, ClientError> {
		self.data_mut()?.custom_fees.push(fee);
		Ok(self)
	}

	pub fn auto_renew_period(&self) -> Duration {
		Duration::from_secs(self.data().auto_renew_period)
	}

	pub fn set_auto_renew_period(&mut self, period: Duration) -> Result<&mut Self, ClientError> {
		self.data_mut()?.auto_renew_period = period.as_secs();
		Ok(self)
	}

	pub fn auto_renew_account_id(&self) -> Option<&AccountId> {
		self.data().auto_renew_account_id.as_ref()
	}

	pub fn set_auto_renew_account_id(
		&mut self,
		account_id: AccountId,
	) -> Result<&mut Self, ClientError> {
		self.data_mut()?.auto_renew_account_id = Some(account_id);
		Ok(self)
	}
}
