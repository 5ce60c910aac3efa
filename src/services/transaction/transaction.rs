//! The transaction lifecycle: mutable fields, freeze, signatures, bytes and
//! execution.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use sha2::{Digest, Sha384};
use std::{
	collections::{BTreeMap, HashMap, HashSet},
	fmt,
	sync::Arc,
	time::Duration,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
	models::{
		AccountId, CustomFeeLimit, FnSigner, Hbar, PrivateKey, PublicKey, Signer, Status,
		TransactionId,
	},
	services::{
		client::Client,
		execute::{self, ClientError, Execute, RequestSettings},
		transaction::{
			body::{SignatureMap, SignedTransaction, TransactionBody, TransactionList},
			TransactionData, TransactionResponse,
		},
		transport::RpcMethod,
	},
	utils::constants::DEFAULT_TRANSACTION_VALID_DURATION,
};

/// Where a transaction is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
	Mutable,
	Frozen,
	Signed,
	Executed,
}

/// Everything fixed by `freeze`.
#[derive(Clone)]
struct FrozenTransaction {
	transaction_id: TransactionId,
	/// The id came from the caller (or from bytes) rather than from the client.
	transaction_id_explicit: bool,
	node_account_ids: Vec<AccountId>,
	transaction_fee: Hbar,
	/// Encoded bodies, indexed like `node_account_ids`.
	bodies: Vec<Vec<u8>>,
	signatures: Vec<SignatureMap>,
	/// Signers that can sign again after the id is regenerated.
	signers: Vec<Arc<dyn Signer>>,
	/// Raw signatures were added that no retained signer can reproduce.
	external_signatures: bool,
}

impl FrozenTransaction {
	fn node_index(&self, node: &AccountId) -> Option<usize> {
		self.node_account_ids.iter().position(|id| id == node)
	}

	fn signed_transaction(&self, index: usize) -> SignedTransaction {
		SignedTransaction {
			body_bytes: self.bodies[index].clone(),
			sig_map: self.signatures[index].clone(),
		}
	}

	fn hash(&self, index: usize) -> Result<Vec<u8>, ClientError> {
		let bytes = self
			.signed_transaction(index)
			.to_bytes()
			.context("failed to encode signed transaction")?;
		Ok(Sha384::digest(bytes).to_vec())
	}

	fn sign_all(&mut self, signer: &dyn Signer) {
		let public_key = signer.public_key();
		for (body, signatures) in self.bodies.iter().zip(self.signatures.iter_mut()) {
			signatures.insert(public_key, signer.sign(body));
		}
	}
}

impl fmt::Debug for FrozenTransaction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FrozenTransaction")
			.field("transaction_id", &self.transaction_id)
			.field("node_account_ids", &self.node_account_ids)
			.field("transaction_fee", &self.transaction_fee)
			.field(
				"signers",
				&self
					.signers
					.iter()
					.map(|signer| signer.public_key())
					.collect::<Vec<_>>(),
			)
			.field("external_signatures", &self.external_signatures)
			.finish()
	}
}

/// A transaction of operation kind `D`.
///
/// Fields can be changed until the transaction is frozen. Freezing fixes the
/// transaction id, the target nodes and one encoded body per node; after
/// that only signatures can be added.
#[derive(Debug, Clone)]
pub struct Transaction<D> {
	data: D,
	transaction_id: Option<TransactionId>,
	node_account_ids: Option<Vec<AccountId>>,
	max_transaction_fee: Option<Hbar>,
	transaction_valid_duration: Duration,
	memo: String,
	max_custom_fees: Vec<CustomFeeLimit>,
	regenerate_transaction_id: Option<bool>,
	settings: RequestSettings,
	frozen: Option<FrozenTransaction>,
	executed: bool,
}

impl<D: TransactionData> Default for Transaction<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D: TransactionData> Transaction<D> {
	pub fn new() -> Self {
		Self::with_data(D::default())
	}

	pub fn with_data(data: D) -> Self {
		Self {
			data,
			transaction_id: None,
			node_account_ids: None,
			max_transaction_fee: D::initial_max_transaction_fee(),
			transaction_valid_duration: DEFAULT_TRANSACTION_VALID_DURATION,
			memo: String::new(),
			max_custom_fees: Vec::new(),
			regenerate_transaction_id: None,
			settings: RequestSettings::default(),
			frozen: None,
			executed: false,
		}
	}

	fn require_not_frozen(&self) -> Result<(), ClientError> {
		if self.frozen.is_some() {
			return Err(ClientError::frozen_state(format!(
				"{} is immutable once frozen",
				D::KIND
			)));
		}
		Ok(())
	}

	fn frozen_mut(&mut self) -> Result<&mut FrozenTransaction, ClientError> {
		self.frozen.as_mut().ok_or_else(|| {
			ClientError::frozen_state(format!("{} must be frozen first", D::KIND))
		})
	}

	fn frozen_ref(&self) -> Result<&FrozenTransaction, ClientError> {
		self.frozen.as_ref().ok_or_else(|| {
			ClientError::frozen_state(format!("{} must be frozen first", D::KIND))
		})
	}

	pub fn data(&self) -> &D {
		&self.data
	}

	/// Mutable access to the operation fields, refused once frozen.
	pub fn data_mut(&mut self) -> Result<&mut D, ClientError> {
		self.require_not_frozen()?;
		Ok(&mut self.data)
	}

	pub fn state(&self) -> TransactionState {
		match &self.frozen {
			_ if self.executed => TransactionState::Executed,
			None => TransactionState::Mutable,
			Some(frozen) if frozen.signatures.iter().any(|map| !map.is_empty()) => {
				TransactionState::Signed
			}
			Some(_) => TransactionState::Frozen,
		}
	}

	pub fn is_frozen(&self) -> bool {
		self.frozen.is_some()
	}

	/// The frozen id, else the one set by the caller.
	pub fn transaction_id(&self) -> Option<TransactionId> {
		match &self.frozen {
			Some(frozen) => Some(frozen.transaction_id.clone()),
			None => self.transaction_id.clone(),
		}
	}

	pub fn set_transaction_id(
		&mut self,
		transaction_id: TransactionId,
	) -> Result<&mut Self, ClientError> {
		self.require_not_frozen()?;
		self.transaction_id = Some(transaction_id);
		Ok(self)
	}

	pub fn node_account_ids(&self) -> Option<&[AccountId]> {
		match &self.frozen {
			Some(frozen) => Some(&frozen.node_account_ids),
			None => self.node_account_ids.as_deref(),
		}
	}

	pub fn set_node_account_ids(
		&mut self,
		node_account_ids: Vec<AccountId>,
	) -> Result<&mut Self, ClientError> {
		self.require_not_frozen()?;
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

	pub fn max_transaction_fee(&self) -> Option<Hbar> {
		match &self.frozen {
			Some(frozen) => Some(frozen.transaction_fee),
			None => self.max_transaction_fee,
		}
	}

	pub fn set_max_transaction_fee(&mut self, fee: Hbar) -> Result<&mut Self, ClientError> {
		self.require_not_frozen()?;
		if fee < Hbar::ZERO {
			return Err(ClientError::configuration(
				"max transaction fee must be non-negative",
				None,
				Some(HashMap::from([("fee".to_string(), fee.to_string())])),
			));
		}
		self.max_transaction_fee = Some(fee);
		Ok(self)
	}

	pub fn transaction_valid_duration(&self) -> Duration {
		self.transaction_valid_duration
	}

	pub fn set_transaction_valid_duration(
		&mut self,
		duration: Duration,
	) -> Result<&mut Self, ClientError> {
		self.require_not_frozen()?;
		self.transaction_valid_duration = duration;
		Ok(self)
	}

	pub fn transaction_memo(&self) -> &str {
		&self.memo
	}

	pub fn set_transaction_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, ClientError> {
		self.require_not_frozen()?;
		self.memo = memo.into();
		Ok(self)
	}

	pub fn max_custom_fees(&self) -> &[CustomFeeLimit] {
		&self.max_custom_fees
	}

	pub fn set_max_custom_fees(
		&mut self,
		max_custom_fees: Vec<CustomFeeLimit>,
	) -> Result<&mut Self, ClientError> {
		self.require_not_frozen()?;
		self.max_custom_fees = max_custom_fees;
		Ok(self)
	}

	pub fn add_max_custom_fee(&mut self, limit: CustomFeeLimit) -> Result<&mut Self, ClientError> {
		self.require_not_frozen()?;
		self.max_custom_fees.push(limit);
		Ok(self)
	}

	pub fn regenerate_transaction_id(&self) -> Option<bool> {
		self.regenerate_transaction_id
	}

	/// Overrides the client's regeneration default for this transaction.
	pub fn set_regenerate_transaction_id(&mut self, regenerate: bool) -> &mut Self {
		self.regenerate_transaction_id = Some(regenerate);
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

	/// Freezes without a client. The transaction id and node list must
	/// already be set; the fee falls back to the operation's default.
	pub fn freeze(&mut self) -> Result<&mut Self, ClientError> {
		if self.frozen.is_some() {
			return Ok(self);
		}
		let transaction_id = self.transaction_id.clone().ok_or_else(|| {
			ClientError::configuration(
				"freezing without a client requires a transaction id",
				None,
				None,
			)
		})?;
		let node_account_ids = self.node_account_ids.clone().ok_or_else(|| {
			ClientError::configuration(
				"freezing without a client requires node account ids",
				None,
				None,
			)
		})?;
		let fee = self
			.max_transaction_fee
			.unwrap_or_else(|| self.data.default_max_transaction_fee());
		self.freeze_inner(transaction_id, true, node_account_ids, fee)
	}

	/// Freezes against a client. A missing id is generated for the operator,
	/// missing nodes are drawn from the client's network, and checksums are
	/// checked when the client asks for it.
	pub async fn freeze_with(&mut self, client: &Client) -> Result<&mut Self, ClientError> {
		if self.frozen.is_some() {
			return Ok(self);
		}

		let (transaction_id, explicit) = match &self.transaction_id {
			Some(id) => (id.clone(), true),
			None => {
				let payer = client.operator_account_id().ok_or_else(|| {
					ClientError::configuration(
						"no transaction id set and the client has no operator",
						None,
						None,
					)
				})?;
				(TransactionId::generate(payer), false)
			}
		};

		let node_account_ids = match &self.node_account_ids {
			Some(ids) => ids.clone(),
			None => {
				let count = client.network().nodes_per_transaction().await;
				client
					.network()
					.select_nodes(count)
					.await?
					.iter()
					.map(|node| node.account_id().clone())
					.collect()
			}
		};

		if client.auto_validate_checksums() {
			if let Some(ledger_id) = client.ledger_id() {
				transaction_id.account_id.validate_checksum(&ledger_id)?;
				for node in &node_account_ids {
					node.validate_checksum(&ledger_id)?;
				}
				self.data.validate_checksums(&ledger_id)?;
			}
		}

		let fee = self
			.max_transaction_fee
			.or_else(|| client.default_max_transaction_fee())
			.unwrap_or_else(|| self.data.default_max_transaction_fee());
		self.freeze_inner(transaction_id, explicit, node_account_ids, fee)
	}

	fn freeze_inner(
		&mut self,
		transaction_id: TransactionId,
		explicit: bool,
		node_account_ids: Vec<AccountId>,
		transaction_fee: Hbar,
	) -> Result<&mut Self, ClientError> {
		self.data.validate()?;
		let bodies = self.encode_bodies(&transaction_id, &node_account_ids, transaction_fee)?;
		debug!(
			kind = D::KIND,
			transaction_id = %transaction_id,
			nodes = node_account_ids.len(),
			"frozen transaction"
		);

		self.frozen = Some(FrozenTransaction {
			transaction_id,
			transaction_id_explicit: explicit,
			signatures: vec![SignatureMap::new(); bodies.len()],
			node_account_ids,
			transaction_fee,
			bodies,
			signers: Vec::new(),
			external_signatures: false,
		});
		Ok(self)
	}

	fn encode_bodies(
		&self,
		transaction_id: &TransactionId,
		node_account_ids: &[AccountId],
		transaction_fee: Hbar,
	) -> Result<Vec<Vec<u8>>, ClientError> {
		let data = serde_json::to_value(&self.data)
			.with_context(|| format!("failed to encode {} fields", D::KIND))?;

		node_account_ids
			.iter()
			.map(|node| {
				let body = TransactionBody {
					transaction_id: transaction_id.clone(),
					node_account_id: node.clone(),
					transaction_fee,
					transaction_valid_duration: self.transaction_valid_duration.as_secs(),
					memo: self.memo.clone(),
					max_custom_fees: self.max_custom_fees.clone(),
					kind: D::KIND.to_string(),
					data: data.clone(),
				};
				let bytes = serde_json::to_vec(&body)
					.with_context(|| format!("failed to encode {} body for node {}", D::KIND, node))?;
				Ok::<_, ClientError>(bytes)
			})
			.collect()
	}

	pub fn sign(&mut self, private_key: &PrivateKey) -> Result<&mut Self, ClientError> {
		self.sign_with_signer(Arc::new(private_key.clone()))
	}

	/// Signs through a closure, e.g. one that forwards to a hardware wallet.
	pub fn sign_with<F>(&mut self, public_key: PublicKey, sign: F) -> Result<&mut Self, ClientError>
	where
		F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
	{
		self.sign_with_signer(Arc::new(FnSigner::new(public_key, sign)))
	}

	/// Signs every body. Signing again with the same key replaces its
	/// earlier signatures. The signer is kept so the transaction can be
	/// signed again if its id is regenerated.
	pub fn sign_with_signer(&mut self, signer: Arc<dyn Signer>) -> Result<&mut Self, ClientError> {
		if self.executed {
			return Err(ClientError::frozen_state(format!(
				"{} was already executed",
				D::KIND
			)));
		}
		let frozen = self.frozen_mut()?;
		let public_key = signer.public_key();
		frozen.sign_all(signer.as_ref());
		frozen
			.signers
			.retain(|existing| existing.public_key() != public_key);
		frozen.signers.push(signer);
		Ok(self)
	}

	/// Adds a signature produced elsewhere. Only valid for a transaction
	/// frozen for a single node; see [`Self::add_signature_for_node`].
	pub fn add_signature(
		&mut self,
		public_key: PublicKey,
		signature: Vec<u8>,
	) -> Result<&mut Self, ClientError> {
		let node = match self.frozen_ref()?.node_account_ids.as_slice() {
			[node] => node.clone(),
			nodes => {
				return Err(ClientError::frozen_state(format!(
					"add_signature needs a transaction frozen for one node, this one has {}",
					nodes.len()
				)))
			}
		};
		self.add_signature_for_node(&node, public_key, signature)
	}

	pub fn add_signature_for_node(
		&mut self,
		node: &AccountId,
		public_key: PublicKey,
		signature: Vec<u8>,
	) -> Result<&mut Self, ClientError> {
		if self.executed {
			return Err(ClientError::frozen_state(format!(
				"{} was already executed",
				D::KIND
			)));
		}
		let frozen = self.frozen_mut()?;
		let index = frozen.node_index(node).ok_or_else(|| {
			ClientError::configuration(
				format!("transaction was not frozen for node {}", node),
				None,
				None,
			)
		})?;
		frozen.signatures[index].insert(public_key, signature);
		frozen.external_signatures = true;
		Ok(self)
	}

	/// Signature map of every node's body.
	pub fn signatures(&self) -> Result<BTreeMap<AccountId, SignatureMap>, ClientError> {
		let frozen = self.frozen_ref()?;
		Ok(frozen
			.node_account_ids
			.iter()
			.cloned()
			.zip(frozen.signatures.iter().cloned())
			.collect())
	}

	/// The encoded bodies, indexed like [`Self::node_account_ids`].
	pub fn body_bytes(&self) -> Result<Vec<Vec<u8>>, ClientError> {
		Ok(self.frozen_ref()?.bodies.clone())
	}

	/// SHA-384 of the first node's signed transaction.
	pub fn transaction_hash(&self) -> Result<Vec<u8>, ClientError> {
		self.frozen_ref()?.hash(0)
	}

	pub fn transaction_hash_per_node(&self) -> Result<BTreeMap<AccountId, Vec<u8>>, ClientError> {
		let frozen = self.frozen_ref()?;
		frozen
			.node_account_ids
			.iter()
			.enumerate()
			.map(|(index, node)| Ok::<_, ClientError>((node.clone(), frozen.hash(index)?)))
			.collect()
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, ClientError> {
		let frozen = self.frozen_ref()?;
		let list = TransactionList {
			transactions: (0..frozen.bodies.len())
				.map(|index| frozen.signed_transaction(index))
				.collect(),
		};
		Ok(serde_json::to_vec(&list).context("failed to encode transaction list")?)
	}

	/// Restores a frozen transaction. The body bytes are kept exactly as
	/// read, so `to_bytes` reproduces the input.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClientError> {
		let decode_error = |msg: &str, error: serde_json::Error| {
			ClientError::decode(msg.to_string(), Some(Box::new(error)))
		};

		let list: TransactionList = serde_json::from_slice(bytes)
			.map_err(|e| decode_error("malformed transaction list", e))?;
		if list.transactions.is_empty() {
			return Err(ClientError::decode("transaction list is empty", None));
		}

		let bodies = list
			.transactions
			.iter()
			.map(|signed| {
				serde_json::from_slice::<TransactionBody>(&signed.body_bytes)
					.map_err(|e| decode_error("malformed transaction body", e))
			})
			.collect::<Result<Vec<_>, _>>()?;

		let first = &bodies[0];
		if first.kind != D::KIND {
			return Err(ClientError::decode(
				format!("expected a {} transaction, found {}", D::KIND, first.kind),
				None,
			));
		}
		if let Some(other) = bodies.iter().skip(1).find(|body| !first.same_except_node(body)) {
			return Err(ClientError::decode(
				format!(
					"bodies for nodes {} and {} disagree",
					first.node_account_id, other.node_account_id
				),
				None,
			));
		}
		let mut seen = HashSet::new();
		if let Some(body) = bodies.iter().find(|body| !seen.insert(&body.node_account_id)) {
			return Err(ClientError::decode(
				format!("node {} appears twice", body.node_account_id),
				None,
			));
		}

		let data: D = serde_json::from_value(first.data.clone())
			.map_err(|e| decode_error("malformed operation fields", e))?;
		data.validate().map_err(|e| {
			ClientError::decode(format!("invalid {} fields", D::KIND), Some(Box::new(e)))
		})?;
		let node_account_ids: Vec<AccountId> =
			bodies.iter().map(|body| body.node_account_id.clone()).collect();

		let mut transaction = Self::with_data(data);
		transaction.transaction_id = Some(first.transaction_id.clone());
		transaction.node_account_ids = Some(node_account_ids.clone());
		transaction.max_transaction_fee = Some(first.transaction_fee);
		transaction.transaction_valid_duration =
			Duration::from_secs(first.transaction_valid_duration);
		transaction.memo = first.memo.clone();
		transaction.max_custom_fees = first.max_custom_fees.clone();

		let signatures: Vec<SignatureMap> = list
			.transactions
			.iter()
			.map(|signed| signed.sig_map.clone())
			.collect();
		transaction.frozen = Some(FrozenTransaction {
			transaction_id: first.transaction_id.clone(),
			transaction_id_explicit: true,
			node_account_ids,
			transaction_fee: first.transaction_fee,
			external_signatures: signatures.iter().any(|map| !map.is_empty()),
			signatures,
			bodies: list
				.transactions
				.into_iter()
				.map(|signed| signed.body_bytes)
				.collect(),
			signers: Vec::new(),
		});
		Ok(transaction)
	}

	/// Freezes (when needed), signs with the operator and submits.
	///
	/// A transaction can be executed successfully once; a failed execution
	/// may be retried.
	pub async fn execute(&mut self, client: &Client) -> Result<TransactionResponse, ClientError> {
		if self.executed {
			return Err(ClientError::configuration(
				format!("{} was already executed", D::KIND),
				None,
				None,
			));
		}
		if self.frozen.is_none() {
			self.freeze_with(client).await?;
		}

		if let Some(operator) = client.operator() {
			let signed_by_operator = self
				.frozen_ref()?
				.signatures
				.iter()
				.all(|map| map.contains(&operator.public_key));
			if !signed_by_operator {
				self.sign_with_signer(operator.signer)?;
			}
		}

		let response = execute::execute(client, self).await?;
		self.executed = true;
		Ok(response)
	}
}

impl<D: TransactionData> Execute for Transaction<D> {
	type Response = TransactionResponse;

	fn name(&self) -> &'static str {
		D::KIND
	}

	fn settings(&self) -> &RequestSettings {
		&self.settings
	}

	fn node_account_ids(&self) -> Option<&[AccountId]> {
		self.frozen
			.as_ref()
			.map(|frozen| frozen.node_account_ids.as_slice())
	}

	fn method(&self) -> RpcMethod {
		self.data.method()
	}

	fn transaction_id(&self) -> Option<TransactionId> {
		Transaction::transaction_id(self)
	}

	fn build_request(&self, node: &AccountId) -> Result<Value, ClientError> {
		let frozen = self.frozen_ref()?;
		let index = frozen.node_index(node).ok_or_else(|| {
			ClientError::configuration(
				format!("transaction was not frozen for node {}", node),
				None,
				None,
			)
		})?;
		let bytes = frozen
			.signed_transaction(index)
			.to_bytes()
			.context("failed to encode signed transaction")?;
		Ok(json!({ "signedTransactionBytes": STANDARD.encode(bytes) }))
	}

	fn response_status(&self, response: &Value) -> Result<Status, ClientError> {
		let code = response
			.get("nodeTransactionPrecheckCode")
			.and_then(Value::as_str)
			.ok_or_else(|| ClientError::decode("response carries no precheck code", None))?;
		Ok(Status::from_name(code))
	}

	fn regenerate_transaction_id(&mut self, client: &Client) -> Result<bool, ClientError> {
		let override_setting = self.regenerate_transaction_id;
		let frozen = self.frozen_ref()?;
		if frozen.external_signatures {
			return Ok(false);
		}
		let allowed = override_setting.unwrap_or(
			!frozen.transaction_id_explicit && client.default_regenerate_transaction_id(),
		);
		if !allowed {
			return Ok(false);
		}

		let transaction_id = frozen.transaction_id.regenerate();
		let bodies =
			self.encode_bodies(&transaction_id, &frozen.node_account_ids, frozen.transaction_fee)?;

		let frozen = self.frozen_mut()?;
		frozen.transaction_id = transaction_id;
		frozen.signatures = vec![SignatureMap::new(); bodies.len()];
		frozen.bodies = bodies;
		for signer in frozen.signers.clone() {
			frozen.sign_all(signer.as_ref());
		}
		Ok(true)
	}

	fn make_response(
		&self,
		_response: Value,
		node: &AccountId,
	) -> Result<TransactionResponse, ClientError> {
		let frozen = self.frozen_ref()?;
		let index = frozen.node_index(node).ok_or_else(|| {
			ClientError::configuration(
				format!("transaction was not frozen for node {}", node),
				None,
				None,
			)
		})?;
		Ok(TransactionResponse {
			node_id: node.clone(),
			transaction_id: frozen.transaction_id.clone(),
			transaction_hash: frozen.hash(index)?,
			validate_status: false,
		})
	}
}
