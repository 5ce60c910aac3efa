use crate::{
	models::{AccountId, TransactionId, TransactionReceipt, TransactionRecord},
	services::{
		client::Client,
		execute::ClientError,
		query::{TransactionReceiptQuery, TransactionRecordQuery},
	},
};

/// What a node returned on accepting a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
	/// The node that accepted the transaction.
	pub node_id: AccountId,
	pub transaction_id: TransactionId,
	/// SHA-384 of the signed transaction sent to `node_id`.
	pub transaction_hash: Vec<u8>,
	/// When set, receipts and records with a non-success status are errors.
	pub validate_status: bool,
}

impl TransactionResponse {
	pub fn set_validate_status(&mut self, validate: bool) -> &mut Self {
		self.validate_status = validate;
		self
	}

	/// A receipt query for this transaction, addressed to the node that
	/// accepted it.
	pub fn get_receipt_query(&self) -> TransactionReceiptQuery {
		let mut query = TransactionReceiptQuery::new();
		query
			.set_transaction_id(self.transaction_id.clone())
			.set_node_account_id(self.node_id.clone())
			.set_validate_status(self.validate_status);
		query
	}

	pub fn get_record_query(&self) -> TransactionRecordQuery {
		let mut query = TransactionRecordQuery::new();
		query
			.set_transaction_id(self.transaction_id.clone())
			.set_node_account_id(self.node_id.clone())
			.set_validate_status(self.validate_status);
		query
	}

	/// Polls until the transaction reaches consensus.
	pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt, ClientError> {
		self.get_receipt_query().execute(client).await
	}

	/// Waits for the receipt, then fetches the record.
	pub async fn get_record(&self, client: &Client) -> Result<TransactionRecord, ClientError> {
		self.get_receipt(client).await?;
		self.get_record_query().execute(client).await
	}
}
