use serde_json::{json, Value};

use crate::{
	models::{Status, TransactionId, TransactionRecord},
	services::{
		execute::{AttemptOutcome, ClientError},
		query::{
			receipt::{classify_poll, outcome_status},
			Query, QueryData,
		},
		transport::RpcMethod,
	},
};

/// Fetches the full record of a transaction once it reached consensus.
pub type TransactionRecordQuery = Query<TransactionRecordQueryData>;

#[derive(Debug, Clone, Default)]
pub struct TransactionRecordQueryData {
	transaction_id: Option<TransactionId>,
	include_children: bool,
	include_duplicates: bool,
	validate_status: bool,
}

impl QueryData for TransactionRecordQueryData {
	type Response = TransactionRecord;

	const KIND: &'static str = "transactionGetRecord";

	fn method(&self) -> RpcMethod {
		RpcMethod::new("CryptoService", "getTxRecordByTxID")
	}

	fn params(&self) -> Result<Value, ClientError> {
		let transaction_id = self.transaction_id.as_ref().ok_or_else(|| {
			ClientError::configuration("record query needs a transaction id", None, None)
		})?;
		Ok(json!({
			"transactionID": transaction_id,
			"includeChildRecords": self.include_children,
			"includeDuplicates": self.include_duplicates,
		}))
	}

	fn transaction_id(&self) -> Option<TransactionId> {
		self.transaction_id.clone()
	}

	fn classify(&self, status: Status, response: &Value) -> AttemptOutcome {
		classify_poll(
			status,
			outcome_status(response.pointer("/transactionRecord/receipt/status")),
		)
	}

	fn make_response(&self, mut response: Value) -> Result<TransactionRecord, ClientError> {
		let record: TransactionRecord =
			serde_json::from_value(response["transactionRecord"].take())
				.map_err(|e| ClientError::decode("malformed record", Some(Box::new(e))))?;

		if self.validate_status && record.receipt.status != Status::Success {
			let transaction_id = self
				.transaction_id
				.clone()
				.or_else(|| record.transaction_id.clone())
				.ok_or_else(|| {
					ClientError::configuration("record query needs a transaction id", None, None)
				})?;
			return Err(ClientError::receipt_status(
				record.receipt.status,
				transaction_id,
			));
		}
		Ok(record)
	}
}

impl Query<TransactionRecordQueryData> {
	pub fn new() -> Self {
		Self::with_data(TransactionRecordQueryData::default())
	}

	pub fn transaction_id(&self) -> Option<&TransactionId> {
		self.data().transaction_id.as_ref()
	}

	pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> &mut Self {
		self.data_mut().transaction_id = Some(transaction_id);
		self
	}

	pub fn set_include_children(&mut self, include: bool) -> &mut Self {
		self.data_mut().include_children = include;
		self
	}

	pub fn set_include_duplicates(&mut self, include: bool) -> &mut Self {
		self.data_mut().include_duplicates = include;
		self
	}

	pub fn set_validate_status(&mut self, validate: bool) -> &mut Self {
		self.data_mut().validate_status = validate;
		self
	}
}
