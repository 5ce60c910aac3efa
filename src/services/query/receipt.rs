use serde_json::{json, Value};

use crate::{
	models::{Status, TransactionId, TransactionReceipt},
	services::{
		execute::{classify_precheck, AttemptOutcome, ClientError},
		query::{Query, QueryData},
		transport::RpcMethod,
	},
};

/// Polls for the receipt of a submitted transaction until it reaches
/// consensus.
pub type TransactionReceiptQuery = Query<TransactionReceiptQueryData>;

#[derive(Debug, Clone, Default)]
pub struct TransactionReceiptQueryData {
	transaction_id: Option<TransactionId>,
	include_children: bool,
	include_duplicates: bool,
	validate_status: bool,
}

/// Classification shared by receipt and record polling.
///
/// `RECEIPT_NOT_FOUND`, `RECORD_NOT_FOUND` and an `UNKNOWN` outcome mean the
/// transaction has not reached consensus yet; those are retried on the
/// call's own backoff without blaming the node.
pub(crate) fn classify_poll(precheck: Status, outcome: Option<Status>) -> AttemptOutcome {
	let not_ready = AttemptOutcome::Retry {
		penalize_node: false,
	};
	match precheck {
		Status::ReceiptNotFound | Status::RecordNotFound | Status::Unknown => not_ready,
		Status::Ok => match outcome.unwrap_or(Status::Unknown) {
			Status::Unknown | Status::Ok | Status::ReceiptNotFound | Status::RecordNotFound => {
				not_ready
			}
			Status::Busy | Status::PlatformNotActive => AttemptOutcome::Retry {
				penalize_node: true,
			},
			_ => AttemptOutcome::Success,
		},
		other => match classify_precheck(other) {
			AttemptOutcome::RegenerateTransactionId => AttemptOutcome::Failure,
			outcome => outcome,
		},
	}
}

pub(crate) fn outcome_status(value: Option<&Value>) -> Option<Status> {
	value.and_then(Value::as_str).map(Status::from_name)
}

impl QueryData for TransactionReceiptQueryData {
	type Response = TransactionReceipt;

	const KIND: &'static str = "transactionGetReceipt";

	fn method(&self) -> RpcMethod {
		RpcMethod::new("CryptoService", "getTransactionReceipts")
	}

	fn params(&self) -> Result<Value, ClientError> {
		let transaction_id = self.transaction_id.as_ref().ok_or_else(|| {
			ClientError::configuration("receipt query needs a transaction id", None, None)
		})?;
		Ok(json!({
			"transactionID": transaction_id,
			"includeChildReceipts": self.include_children,
			"includeDuplicates": self.include_duplicates,
		}))
	}

	fn transaction_id(&self) -> Option<TransactionId> {
		self.transaction_id.clone()
	}

	fn classify(&self, status: Status, response: &Value) -> AttemptOutcome {
		classify_poll(status, outcome_status(response.pointer("/receipt/status")))
	}

	fn make_response(&self, mut response: Value) -> Result<TransactionReceipt, ClientError> {
		let receipt: TransactionReceipt = serde_json::from_value(response["receipt"].take())
			.map_err(|e| ClientError::decode("malformed receipt", Some(Box::new(e))))?;

		if self.validate_status && receipt.status != Status::Success {
			let transaction_id = self
				.transaction_id
				.clone()
				.or_else(|| receipt.transaction_id.clone())
				.ok_or_else(|| {
					ClientError::configuration("receipt query needs a transaction id", None, None)
				})?;
			return Err(ClientError::receipt_status(receipt.status, transaction_id));
		}
		Ok(receipt)
	}
}

impl Query<TransactionReceiptQueryData> {
	pub fn new() -> Self {
		Self::with_data(TransactionReceiptQueryData::default())
	}

	pub fn transaction_id(&self) -> Option<&TransactionId> {
		self.data().transaction_id.as_ref()
	}

	pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> &mut Self {
		self.data_mut().transaction_id = Some(transaction_id);
		self
	}

	pub fn include_children(&self) -> bool {
		self.data().include_children
	}

	pub fn set_include_children(&mut self, include: bool) -> &mut Self {
		self.data_mut().include_children = include;
		self
	}

	pub fn include_duplicates(&self) -> bool {
		self.data().include_duplicates
	}

	pub fn set_include_duplicates(&mut self, include: bool) -> &mut Self {
		self.data_mut().include_duplicates = include;
		self
	}

	pub fn validate_status(&self) -> bool {
		self.data().validate_status
	}

	/// When set, a receipt with a status other than `SUCCESS` is returned
	/// as [`ClientError::ReceiptStatus`].
	pub fn set_validate_status(&mut self, validate: bool) -> &mut Self {
		self.data_mut().validate_status = validate;
		self
	}
}
