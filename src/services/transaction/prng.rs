use serde::{Deserialize, Serialize};

use crate::{
	models::Hbar,
	services::{
		execute::ClientError,
		transaction::{Transaction, TransactionData},
		transport::RpcMethod,
	},
};

/// Asks the network for a pseudorandom number in `[0, range)`, or for 384
/// random bits when no range is set.
pub type PrngTransaction = Transaction<PrngTransactionData>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrngTransactionData {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	range: Option<u32>,
}

impl TransactionData for PrngTransactionData {
	const KIND: &'static str = "utilPrng";

	fn method(&self) -> RpcMethod {
		RpcMethod::new("UtilService", "prng")
	}

	fn default_max_transaction_fee(&self) -> Hbar {
		Hbar::new(1)
	}
}

impl Transaction<PrngTransactionData> {
	pub fn range(&self) -> Option<u32> {
		self.data().range
	}

	pub fn set_range(&mut self, range: u32) -> Result<&mut Self, ClientError> {
		self.data_mut()?.range = Some(range);
		Ok(self)
	}
}
