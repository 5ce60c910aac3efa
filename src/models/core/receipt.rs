//! Asynchronous outcomes of a submitted transaction.

use serde::{Deserialize, Serialize};

use crate::models::{
	AccountId, ContractId, FileId, Hbar, Status, Timestamp, TokenId, TopicId, TransactionId,
};

/// Summary outcome of a transaction once consensus has been reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
	pub status: Status,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction_id: Option<TransactionId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub account_id: Option<AccountId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_id: Option<FileId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub contract_id: Option<ContractId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub topic_id: Option<TopicId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_id: Option<TokenId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub topic_sequence_number: Option<u64>,
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		with = "crate::utils::serde_base64::option"
	)]
	pub topic_running_hash: Option<Vec<u8>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<TransactionReceipt>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub duplicates: Vec<TransactionReceipt>,
}

impl TransactionReceipt {
	pub fn new(status: Status) -> Self {
		Self {
			status,
			transaction_id: None,
			account_id: None,
			file_id: None,
			contract_id: None,
			topic_id: None,
			token_id: None,
			topic_sequence_number: None,
			topic_running_hash: None,
			children: Vec::new(),
			duplicates: Vec::new(),
		}
	}
}

/// The full record of a transaction: its receipt plus consensus details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
	pub receipt: TransactionReceipt,
	#[serde(default, with = "crate::utils::serde_base64")]
	pub transaction_hash: Vec<u8>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub consensus_timestamp: Option<Timestamp>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction_id: Option<TransactionId>,
	#[serde(default)]
	pub memo: String,
	#[serde(default)]
	pub transaction_fee: Hbar,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prng_number: Option<u32>,
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		with = "crate::utils::serde_base64::option"
	)]
	pub prng_bytes: Option<Vec<u8>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<TransactionRecord>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub duplicates: Vec<TransactionRecord>,
}
