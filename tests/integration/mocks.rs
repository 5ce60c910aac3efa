use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mockall::mock;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::{collections::VecDeque, sync::Arc};

use hiero_sdk::{
	models::{AccountId, PrivateKey},
	services::{
		client::{Client, ClientSettings},
		network::{Network, NetworkConfig, Node},
		transport::{NodeTransport, RpcMethod, TransportError},
	},
};

// Mock implementation of a node transport.
// Used where a test needs call expectations on the raw dispatches.
mock! {
	pub NodeTransport {}

	#[async_trait]
	impl NodeTransport for NodeTransport {
		async fn send_request(
			&self,
			node: &Node,
			method: RpcMethod,
			params: Value,
		) -> Result<Value, TransportError>;
	}
}

/// One request as seen by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct Dispatch {
	pub node: AccountId,
	pub method: String,
	pub params: Value,
}

/// Answers dispatches from a fixed script, in order, and records them.
///
/// Once the script runs out every dispatch fails with a non-retryable error.
#[derive(Default)]
pub struct ScriptedTransport {
	responses: Mutex<VecDeque<Result<Value, TransportError>>>,
	dispatches: Mutex<Vec<Dispatch>>,
}

impl ScriptedTransport {
	pub fn new(responses: impl IntoIterator<Item = Result<Value, TransportError>>) -> Arc<Self> {
		Arc::new(Self {
			responses: Mutex::new(responses.into_iter().collect()),
			dispatches: Mutex::new(Vec::new()),
		})
	}

	pub fn dispatches(&self) -> Vec<Dispatch> {
		self.dispatches.lock().clone()
	}

	pub fn count(&self) -> usize {
		self.dispatches.lock().len()
	}

	pub fn nodes(&self) -> Vec<AccountId> {
		self.dispatches
			.lock()
			.iter()
			.map(|dispatch| dispatch.node.clone())
			.collect()
	}
}

#[async_trait]
impl NodeTransport for ScriptedTransport {
	async fn send_request(
		&self,
		node: &Node,
		method: RpcMethod,
		params: Value,
	) -> Result<Value, TransportError> {
		self.dispatches.lock().push(Dispatch {
			node: node.account_id().clone(),
			method: method.to_string(),
			params,
		});
		self.responses.lock().pop_front().unwrap_or_else(|| {
			Err(TransportError::network(
				"scripted transport ran out of responses",
				false,
				None,
				None,
			))
		})
	}
}

/// Transaction submission response with the given precheck code.
pub fn precheck(code: &str) -> Result<Value, TransportError> {
	Ok(json!({ "nodeTransactionPrecheckCode": code }))
}

/// Query response whose header carries `code` and nothing else.
pub fn query_precheck(code: &str) -> Result<Value, TransportError> {
	Ok(json!({ "header": { "nodeTransactionPrecheckCode": code } }))
}

/// Receipt query response with precheck `OK` and the given outcome.
pub fn receipt(status: &str) -> Result<Value, TransportError> {
	Ok(json!({
		"header": { "nodeTransactionPrecheckCode": "OK" },
		"receipt": { "status": status }
	}))
}

pub fn connection_refused() -> Result<Value, TransportError> {
	Err(TransportError::network("connection refused", true, None, None))
}

pub fn operator_id() -> AccountId {
	AccountId::from_num(1001)
}

pub fn node_ids(nums: &[u64]) -> Vec<AccountId> {
	nums.iter().copied().map(AccountId::from_num).collect()
}

/// A network of plaintext nodes `0.0.<num>`, one private address each.
pub fn test_network(nums: &[u64]) -> Network {
	let addresses: Vec<String> = nums
		.iter()
		.map(|num| format!("10.0.0.{}:50211", num))
		.collect();
	Network::from_addresses(
		addresses
			.iter()
			.map(String::as_str)
			.zip(node_ids(nums)),
		NetworkConfig::default(),
	)
	.unwrap()
}

pub fn test_client(transport: Arc<dyn NodeTransport>, nums: &[u64]) -> Client {
	test_client_with(transport, nums, ClientSettings::default())
}

pub fn test_client_with(
	transport: Arc<dyn NodeTransport>,
	nums: &[u64],
	settings: ClientSettings,
) -> Client {
	Client::builder()
		.network(test_network(nums))
		.transport(transport)
		.operator(operator_id(), PrivateKey::generate_ed25519())
		.settings(settings)
		.build()
		.unwrap()
}

/// Decodes the body carried by a transaction submission.
pub fn submitted_body(params: &Value) -> Value {
	let signed = STANDARD
		.decode(params["signedTransactionBytes"].as_str().unwrap())
		.unwrap();
	let signed: Value = serde_json::from_slice(&signed).unwrap();
	let body = STANDARD.decode(signed["bodyBytes"].as_str().unwrap()).unwrap();
	serde_json::from_slice(&body).unwrap()
}

/// Number of signatures carried by a transaction submission.
pub fn submitted_signature_count(params: &Value) -> usize {
	let signed = STANDARD
		.decode(params["signedTransactionBytes"].as_str().unwrap())
		.unwrap();
	let signed: Value = serde_json::from_slice(&signed).unwrap();
	signed["sigMap"].as_array().map(Vec::len).unwrap_or(0)
}
