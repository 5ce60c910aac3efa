use serde_json::{json, Value};
use std::{collections::HashSet, fmt, time::Duration};
use tokio_util::sync::CancellationToken;

use crate::{
	models::{AccountId, ConfigError, LedgerId, Status, TransactionId},
	services::{
		client::Client,
		execute::{self, classify_precheck, AttemptOutcome, ClientError, Execute, RequestSettings},
		transport::RpcMethod,
	},
};

/// The operation-specific part of a query.
pub trait QueryData: Clone + fmt::Debug + Send + Sync + 'static {
	type Response: Send;

	/// Key of the query object inside the request params.
	const KIND: &'static str;

	fn method(&self) -> RpcMethod;

	fn params(&self) -> Result<Value, ClientError>;

	fn transaction_id(&self) -> Option<TransactionId> {
		None
	}

	fn classify(&self, status: Status, _response: &Value) -> AttemptOutcome {
		classify_precheck(status)
	}

	fn make_response(&self, response: Value) -> Result<Self::Response, ClientError>;

	fn validate_checksums(&self, _ledger_id: &LedgerId) -> Result<(), ConfigError> {
		Ok(())
	}
}

/// A free query against the consensus network. Queries are not pre-built:
/// the request is assembled for whichever node each attempt selects.
#[derive(Debug, Clone)]
pub struct Query<D> {
	data: D,
	node_account_ids: Option<Vec<AccountId>>,
	settings: RequestSettings,
}

impl<D: QueryData + Default> Default for Query<D> {
	fn default() -> Self {
		Self::with_data(D::default())
	}
}

impl<D: QueryData> Query<D> {
	pub fn with_data(data: D) -> Self {
		Self {
			data,
			node_account_ids: None,
			settings: RequestSettings::default(),
		}
	}

	pub fn data(&self) -> &D {
		&self.data
	}

	pub(crate) fn data_mut(&mut self) -> &mut D {
		&mut self.data
	}

	pub fn node_account_ids(&self) -> Option<&[AccountId]> {
		self.node_account_ids.as_deref()
	}

	/// Restricts the query to these nodes. The list must be non-empty and
	/// name each node once.
	pub fn set_node_account_ids(
		&mut self,
		node_account_ids: Vec<AccountId>,
	) -> Result<&mut Self, ClientError> {
		if node_account_ids.is_empty() {
			return Err(ClientError::configuration(
				"node account ids must not be empty",
				None,
				None,
			));
		}
		let mut seen = HashSet::new();
		if let Some(duplicate) = node_account_ids.iter().find(|id| !seen.insert(*id)) {
			return Err(ClientError::configuration(
				format!("node {} is listed twice", duplicate),
				None,
				None,
			));
		}
		self.node_account_ids = Some(node_account_ids);
		Ok(self)
	}

	pub fn set_node_account_id(&mut self, node_account_id: AccountId) -> &mut Self {
		self.node_account_ids = Some(vec![node_account_id]);
		self
	}

	pub fn request_settings(&self) -> &RequestSettings {
		&self.settings
	}

	pub fn set_max_attempts(&mut self, max_attempts: u32) -> &mut Self {
		self.settings.max_attempts = Some(max_attempts);
		self
	}

	pub fn set_min_backoff(&mut self, min_backoff: Duration) -> &mut Self {
		self.settings.min_backoff = Some(min_backoff);
		self
	}

	pub fn set_max_backoff(&mut self, max_backoff: Duration) -> &mut Self {
		self.settings.max_backoff = Some(max_backoff);
		self
	}

	pub fn set_grpc_deadline(&mut self, deadline: Duration) -> &mut Self {
		self.settings.grpc_deadline = Some(deadline);
		self
	}

	pub fn set_request_timeout(&mut self, timeout: Duration) -> &mut Self {
		self.settings.request_timeout = Some(timeout);
		self
	}

	pub fn set_cancellation_token(&mut self, token: CancellationToken) -> &mut Self {
		self.settings.cancellation = Some(token);
		self
	}

	pub async fn execute(&mut self, client: &Client) -> Result<D::Response, ClientError> {
		if client.auto_validate_checksums() {
			if let Some(ledger_id) = client.ledger_id() {
				self.data.validate_checksums(&ledger_id)?;
				for node in self.node_account_ids.iter().flatten() {
					node.validate_checksum(&ledger_id)?;
				}
			}
		}
		execute::execute(client, self).await
	}
}

impl<D: QueryData> Execute for Query<D> {
	type Response = D::Response;

	fn name(&self) -> &'static str {
		D::KIND
	}

	fn settings(&self) -> &RequestSettings {
		&self.settings
	}

	fn node_account_ids(&self) -> Option<&[AccountId]> {
		self.node_account_ids.as_deref()
	}

	fn method(&self) -> RpcMethod {
		self.data.method()
	}

	fn transaction_id(&self) -> Option<TransactionId> {
		self.data.transaction_id()
	}

	fn build_request(&self, _node: &AccountId) -> Result<Value, ClientError> {
		let mut params = json!({ "header": { "responseType": "ANSWER_ONLY" } });
		params[D::KIND] = self.data.params()?;
		Ok(params)
	}

	fn response_status(&self, response: &Value) -> Result<Status, ClientError> {
		let code = response
			.pointer("/header/nodeTransactionPrecheckCode")
			.and_then(Value::as_str)
			.ok_or_else(|| ClientError::decode("query response carries no precheck code", None))?;
		Ok(Status::from_name(code))
	}

	fn classify(&self, status: Status, response: &Value) -> AttemptOutcome {
		self.data.classify(status, response)
	}

	fn make_response(&self, response: Value, _node: &AccountId) -> Result<D::Response, ClientError> {
		self.data.make_response(response)
	}
}
