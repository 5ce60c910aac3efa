//! Per-node transaction bodies and the signed envelope around them.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::{
	models::{AccountId, CustomFeeLimit, Hbar, PublicKey, TransactionId},
	utils::serde_base64,
};

/// What gets signed. One body exists per target node; the bodies of one
/// transaction differ only in `node_account_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody {
	pub transaction_id: TransactionId,
	pub node_account_id: AccountId,
	pub transaction_fee: Hbar,
	/// Seconds.
	pub transaction_valid_duration: u64,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub memo: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub max_custom_fees: Vec<CustomFeeLimit>,
	pub kind: String,
	pub data: Value,
}

impl TransactionBody {
	/// True when both bodies are equal apart from the addressed node.
	pub fn same_except_node(&self, other: &TransactionBody) -> bool {
		self.transaction_id == other.transaction_id
			&& self.transaction_fee == other.transaction_fee
			&& self.transaction_valid_duration == other.transaction_valid_duration
			&& self.memo == other.memo
			&& self.max_custom_fees == other.max_custom_fees
			&& self.kind == other.kind
			&& self.data == other.data
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignaturePair {
	pub public_key: PublicKey,
	#[serde(with = "serde_base64")]
	pub signature: Vec<u8>,
}

/// Signatures over one body, at most one per public key. Decoding a map
/// that repeats a key fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignatureMap(Vec<SignaturePair>);

impl SignatureMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a signature, replacing any earlier one from the same key.
	pub fn insert(&mut self, public_key: PublicKey, signature: Vec<u8>) {
		match self.0.iter_mut().find(|pair| pair.public_key == public_key) {
			Some(pair) => pair.signature = signature,
			None => self.0.push(SignaturePair {
				public_key,
				signature,
			}),
		}
	}

	pub fn get(&self, public_key: &PublicKey) -> Option<&[u8]> {
		self.0
			.iter()
			.find(|pair| pair.public_key == *public_key)
			.map(|pair| pair.signature.as_slice())
	}

	pub fn contains(&self, public_key: &PublicKey) -> bool {
		self.get(public_key).is_some()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &SignaturePair> {
		self.0.iter()
	}
}

impl<'de> Deserialize<'de> for SignatureMap {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let pairs = Vec::<SignaturePair>::deserialize(deserializer)?;
		let mut seen = HashSet::new();
		if let Some(pair) = pairs.iter().find(|pair| !seen.insert(pair.public_key)) {
			return Err(de::Error::custom(format!(
				"public key {} signs the same body twice",
				pair.public_key
			)));
		}
		Ok(Self(pairs))
	}
}

/// A body's exact bytes together with the signatures over them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
	#[serde(with = "serde_base64")]
	pub body_bytes: Vec<u8>,
	pub sig_map: SignatureMap,
}

impl SignedTransaction {
	pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
		serde_json::to_vec(self)
	}
}

/// Serialized form of a frozen transaction: one signed body per node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionList {
	pub transactions: Vec<SignedTransaction>,
}
