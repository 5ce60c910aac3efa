use parking_lot::RwLock;
use std::{
	collections::HashMap,
	fmt,
	path::Path,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
	time::Duration,
};
use tracing::{debug, info};

use crate::{
	models::{
		AccountId, ClientConfig, ConfigLoader, Hbar, LedgerId, MirrorNetworkSpec,
		NetworkSpec, PrivateKey, PublicKey, Signer,
	},
	services::{
		execute::ClientError,
		network::{MirrorNetwork, Network, NetworkConfig},
		query::AddressBookQuery,
		transport::{HttpNodeTransport, NodeTransport},
	},
	utils::constants::{
		DEFAULT_GRPC_DEADLINE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF,
		DEFAULT_REQUEST_TIMEOUT, MAINNET_MIRROR, MAINNET_NODES, PREVIEWNET_MIRROR,
		PREVIEWNET_NODES, TESTNET_MIRROR, TESTNET_NODES,
	},
};

/// Client-wide defaults applied to every request that doesn't override them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
	pub max_attempts: u32,
	pub min_backoff: Duration,
	pub max_backoff: Duration,
	pub request_timeout: Duration,
	pub grpc_deadline: Duration,
	/// Used when a transaction sets no fee of its own.
	pub default_max_transaction_fee: Option<Hbar>,
	pub auto_validate_checksums: bool,
	pub default_regenerate_transaction_id: bool,
}

impl Default for ClientSettings {
	fn default() -> Self {
		Self {
			max_attempts: DEFAULT_MAX_ATTEMPTS,
			min_backoff: DEFAULT_MIN_BACKOFF,
			max_backoff: DEFAULT_MAX_BACKOFF,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			grpc_deadline: DEFAULT_GRPC_DEADLINE,
			default_max_transaction_fee: None,
			auto_validate_checksums: false,
			default_regenerate_transaction_id: true,
		}
	}
}

/// Default payer and signer.
#[derive(Clone)]
pub struct Operator {
	pub account_id: AccountId,
	pub public_key: PublicKey,
	pub signer: Arc<dyn Signer>,
}

impl fmt::Debug for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Operator")
			.field("account_id", &self.account_id)
			.field("public_key", &self.public_key)
			.finish()
	}
}

struct ClientInner {
	network: Network,
	mirror: RwLock<Option<MirrorNetwork>>,
	transport: Arc<dyn NodeTransport>,
	operator: RwLock<Option<Operator>>,
	settings: RwLock<ClientSettings>,
	closed: AtomicBool,
}

/// Entry point for submitting transactions and queries.
///
/// Cloning is cheap and every clone shares the same networks, operator and
/// settings, so one client can serve many concurrent callers.
#[derive(Clone)]
pub struct Client {
	inner: Arc<ClientInner>,
}

#[derive(Default)]
pub struct ClientBuilder {
	network: Option<Network>,
	mirror: Option<MirrorNetwork>,
	transport: Option<Arc<dyn NodeTransport>>,
	operator: Option<Operator>,
	settings: ClientSettings,
	ledger_id: Option<LedgerId>,
}

impl ClientBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn network(mut self, network: Network) -> Self {
		self.network = Some(network);
		self
	}

	pub fn mirror_network(mut self, mirror: MirrorNetwork) -> Self {
		self.mirror = Some(mirror);
		self
	}

	/// Replaces the HTTP transport, e.g. with a test double.
	pub fn transport(mut self, transport: Arc<dyn NodeTransport>) -> Self {
		self.transport = Some(transport);
		self
	}

	pub fn operator(mut self, account_id: AccountId, private_key: PrivateKey) -> Self {
		self.operator = Some(Operator {
			account_id,
			public_key: private_key.public_key(),
			signer: Arc::new(private_key),
		});
		self
	}

	pub fn operator_with_signer(mut self, account_id: AccountId, signer: Arc<dyn Signer>) -> Self {
		self.operator = Some(Operator {
			account_id,
			public_key: signer.public_key(),
			signer,
		});
		self
	}

	pub fn settings(mut self, settings: ClientSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn ledger_id(mut self, ledger_id: LedgerId) -> Self {
		self.ledger_id = Some(ledger_id);
		self
	}

	pub fn build(self) -> Result<Client, ClientError> {
		let network = self.network.ok_or_else(|| {
			ClientError::configuration("a client needs a consensus network", None, None)
		})?;
		if self.settings.min_backoff > self.settings.max_backoff {
			return Err(ClientError::configuration(
				"minBackoff exceeds maxBackoff",
				None,
				None,
			));
		}
		if self.settings.max_attempts == 0 {
			return Err(ClientError::configuration(
				"maxAttempts must be at least 1",
				None,
				None,
			));
		}
		if self.ledger_id.is_some() {
			network.set_ledger_id(self.ledger_id);
		}

		Ok(Client {
			inner: Arc::new(ClientInner {
				network,
				mirror: RwLock::new(self.mirror),
				transport: self
					.transport
					.unwrap_or_else(|| Arc::new(HttpNodeTransport::default())),
				operator: RwLock::new(self.operator),
				settings: RwLock::new(self.settings),
				closed: AtomicBool::new(false),
			}),
		})
	}
}

fn named_nodes(name: &str) -> Result<&'static [(&'static str, u64)], ClientError> {
	match name {
		"mainnet" => Ok(MAINNET_NODES),
		"testnet" => Ok(TESTNET_NODES),
		"previewnet" => Ok(PREVIEWNET_NODES),
		_ => Err(ClientError::configuration(
			format!("unknown network '{}'", name),
			None,
			None,
		)),
	}
}

fn named_mirror(name: &str) -> Result<&'static str, ClientError> {
	match name {
		"mainnet" => Ok(MAINNET_MIRROR),
		"testnet" => Ok(TESTNET_MIRROR),
		"previewnet" => Ok(PREVIEWNET_MIRROR),
		_ => Err(ClientError::configuration(
			format!("unknown mirror network '{}'", name),
			None,
			None,
		)),
	}
}

impl Client {
	pub fn builder() -> ClientBuilder {
		ClientBuilder::new()
	}

	pub fn for_mainnet() -> Result<Self, ClientError> {
		Self::from_config(&ClientConfig::named("mainnet"))
	}

	pub fn for_testnet() -> Result<Self, ClientError> {
		Self::from_config(&ClientConfig::named("testnet"))
	}

	pub fn for_previewnet() -> Result<Self, ClientError> {
		Self::from_config(&ClientConfig::named("previewnet"))
	}

	/// A client for an explicit `host:port -> node account` map.
	pub fn for_network<'a, I>(addresses: I) -> Result<Self, ClientError>
	where
		I: IntoIterator<Item = (&'a str, AccountId)>,
	{
		let network = Network::from_addresses(addresses, NetworkConfig::default())?;
		ClientBuilder::new().network(network).build()
	}

	/// Loads, resolves and validates a JSON config file.
	pub fn from_config_file(path: &Path) -> Result<Self, ClientError> {
		let config = ClientConfig::load_from_path(path)?;
		Self::from_config(&config)
	}

	pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
		let config = config.resolve_secrets()?;
		config.validate()?;

		let defaults = ClientSettings::default();
		let settings = ClientSettings {
			max_attempts: config.max_attempts.unwrap_or(defaults.max_attempts),
			min_backoff: config
				.min_backoff_ms
				.map(Duration::from_millis)
				.unwrap_or(defaults.min_backoff),
			max_backoff: config
				.max_backoff_ms
				.map(Duration::from_millis)
				.unwrap_or(defaults.max_backoff),
			request_timeout: config
				.request_timeout_ms
				.map(Duration::from_millis)
				.unwrap_or(defaults.request_timeout),
			grpc_deadline: config
				.grpc_deadline_ms
				.map(Duration::from_millis)
				.unwrap_or(defaults.grpc_deadline),
			default_max_transaction_fee: config
				.default_max_transaction_fee_tinybars
				.map(Hbar::from_tinybars),
			auto_validate_checksums: config
				.auto_validate_checksums
				.unwrap_or(defaults.auto_validate_checksums),
			default_regenerate_transaction_id: config
				.default_regenerate_transaction_id
				.unwrap_or(defaults.default_regenerate_transaction_id),
		};

		let network_config = NetworkConfig {
			min_backoff: settings.min_backoff,
			max_backoff: settings.max_backoff,
			connect_timeout: settings.grpc_deadline,
			max_nodes_per_transaction: config.max_nodes_per_transaction,
			transport_security: config.transport_security.unwrap_or(false),
		};
		let network = match &config.network {
			NetworkSpec::Named(name) => Network::from_addresses(
				named_nodes(name)?
					.iter()
					.map(|(address, num)| (*address, AccountId::from_num(*num))),
				network_config,
			)?,
			NetworkSpec::Nodes(nodes) => Network::from_addresses(
				nodes
					.iter()
					.map(|(address, account_id)| (address.as_str(), account_id.clone())),
				network_config,
			)?,
		};

		let mut builder = ClientBuilder::new().network(network).settings(settings);
		if let Some(ledger_id) = config.resolved_ledger_id() {
			builder = builder.ledger_id(ledger_id);
		}
		match &config.mirror_network {
			Some(MirrorNetworkSpec::Named(name)) => {
				builder = builder.mirror_network(MirrorNetwork::new(&[named_mirror(name)?.to_string()])?);
			}
			Some(MirrorNetworkSpec::Addresses(addresses)) => {
				builder = builder.mirror_network(MirrorNetwork::new(addresses)?);
			}
			None => {}
		}
		if let Some(operator) = &config.operator {
			let private_key: PrivateKey = operator.private_key.as_str().parse()?;
			builder = builder.operator(operator.account_id.clone(), private_key);
		}

		let client = builder.build()?;
		info!(
			nodes = config_node_count(&config),
			operator = ?client.operator_account_id().map(|id| id.to_string()),
			"client created from config"
		);
		Ok(client)
	}

	pub fn network(&self) -> &Network {
		&self.inner.network
	}

	pub fn transport(&self) -> Arc<dyn NodeTransport> {
		self.inner.transport.clone()
	}

	pub fn mirror_network(&self) -> Option<MirrorNetwork> {
		self.inner.mirror.read().clone()
	}

	/// Replaces the mirror network. The previous one is closed.
	pub fn set_mirror_network(&self, addresses: &[String]) -> Result<(), ClientError> {
		let mirror = MirrorNetwork::new(addresses)?;
		if let Some(previous) = self.inner.mirror.write().replace(mirror) {
			previous.close();
		}
		Ok(())
	}

	/// Reconciles the consensus network with an explicit address map.
	pub async fn set_network<'a, I>(&self, addresses: I) -> Result<(), ClientError>
	where
		I: IntoIterator<Item = (&'a str, AccountId)>,
	{
		self.ensure_open()?;
		self.inner.network.set_addresses(addresses).await?;
		Ok(())
	}

	/// Fetches the address book from the mirror network and applies it.
	pub async fn update_network_from_address_book(&self) -> Result<(), ClientError> {
		self.ensure_open()?;
		let book = AddressBookQuery::new().execute(self).await?;
		debug!(entries = book.node_addresses.len(), "applying address book");
		self.inner.network.apply_address_book(&book).await?;
		Ok(())
	}

	pub fn ledger_id(&self) -> Option<LedgerId> {
		self.inner.network.ledger_id()
	}

	pub fn set_ledger_id(&self, ledger_id: Option<LedgerId>) {
		self.inner.network.set_ledger_id(ledger_id);
	}

	pub fn operator(&self) -> Option<Operator> {
		self.inner.operator.read().clone()
	}

	pub fn operator_account_id(&self) -> Option<AccountId> {
		self.inner
			.operator
			.read()
			.as_ref()
			.map(|operator| operator.account_id.clone())
	}

	pub fn operator_public_key(&self) -> Option<PublicKey> {
		self.inner
			.operator
			.read()
			.as_ref()
			.map(|operator| operator.public_key)
	}

	pub fn set_operator(&self, account_id: AccountId, private_key: PrivateKey) {
		*self.inner.operator.write() = Some(Operator {
			account_id,
			public_key: private_key.public_key(),
			signer: Arc::new(private_key),
		});
	}

	pub fn set_operator_with_signer(&self, account_id: AccountId, signer: Arc<dyn Signer>) {
		*self.inner.operator.write() = Some(Operator {
			account_id,
			public_key: signer.public_key(),
			signer,
		});
	}

	/// Snapshot of the current settings.
	pub fn settings(&self) -> ClientSettings {
		self.inner.settings.read().clone()
	}

	pub fn default_max_transaction_fee(&self) -> Option<Hbar> {
		self.inner.settings.read().default_max_transaction_fee
	}

	pub fn set_default_max_transaction_fee(&self, fee: Hbar) -> Result<(), ClientError> {
		if fee < Hbar::ZERO {
			return Err(ClientError::configuration(
				"default max transaction fee must be non-negative",
				None,
				Some(HashMap::from([("fee".to_string(), fee.to_string())])),
			));
		}
		self.inner.settings.write().default_max_transaction_fee = Some(fee);
		Ok(())
	}

	pub fn set_max_attempts(&self, max_attempts: u32) -> Result<(), ClientError> {
		if max_attempts == 0 {
			return Err(ClientError::configuration(
				"maxAttempts must be at least 1",
				None,
				None,
			));
		}
		self.inner.settings.write().max_attempts = max_attempts;
		Ok(())
	}

	/// Sets the lower backoff bound for the client and every node.
	pub async fn set_min_backoff(&self, min_backoff: Duration) -> Result<(), ClientError> {
		let max_backoff = self.inner.settings.read().max_backoff;
		self.inner
			.network
			.set_backoff_bounds(min_backoff, max_backoff)
			.await?;
		self.inner.settings.write().min_backoff = min_backoff;
		Ok(())
	}

	/// Sets the upper backoff bound for the client and every node.
	pub async fn set_max_backoff(&self, max_backoff: Duration) -> Result<(), ClientError> {
		let min_backoff = self.inner.settings.read().min_backoff;
		self.inner
			.network
			.set_backoff_bounds(min_backoff, max_backoff)
			.await?;
		self.inner.settings.write().max_backoff = max_backoff;
		Ok(())
	}

	pub fn set_request_timeout(&self, request_timeout: Duration) {
		self.inner.settings.write().request_timeout = request_timeout;
	}

	pub fn set_grpc_deadline(&self, grpc_deadline: Duration) {
		self.inner.settings.write().grpc_deadline = grpc_deadline;
	}

	pub fn set_auto_validate_checksums(&self, enabled: bool) {
		self.inner.settings.write().auto_validate_checksums = enabled;
	}

	pub fn auto_validate_checksums(&self) -> bool {
		self.inner.settings.read().auto_validate_checksums
	}

	pub fn set_default_regenerate_transaction_id(&self, enabled: bool) {
		self.inner.settings.write().default_regenerate_transaction_id = enabled;
	}

	pub fn default_regenerate_transaction_id(&self) -> bool {
		self.inner.settings.read().default_regenerate_transaction_id
	}

	pub fn set_max_nodes_per_transaction(&self, max: Option<usize>) {
		self.inner.network.set_max_nodes_per_transaction(max);
	}

	/// Closes every node channel and the mirror network. Later calls are no-ops.
	pub async fn close(&self) {
		if self.inner.closed.swap(true, Ordering::SeqCst) {
			return;
		}
		let closed_nodes = self.inner.network.close().await;
		if let Some(mirror) = self.inner.mirror.read().as_ref() {
			mirror.close();
		}
		info!(closed_nodes, "client closed");
	}

	pub fn is_closed(&self) -> bool {
		self.inner.closed.load(Ordering::SeqCst)
	}

	pub(crate) fn ensure_open(&self) -> Result<(), ClientError> {
		if self.is_closed() {
			return Err(ClientError::configuration("client is closed", None, None));
		}
		Ok(())
	}
}

fn config_node_count(config: &ClientConfig) -> usize {
	match &config.network {
		NetworkSpec::Named(name) => named_nodes(name).map(|nodes| nodes.len()).unwrap_or(0),
		NetworkSpec::Nodes(nodes) => nodes.len(),
	}
}

impl fmt::Debug for Client {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Client")
			.field("operator", &*self.inner.operator.read())
			.field("settings", &*self.inner.settings.read())
			.field("mirror", &self.inner.mirror.read().is_some())
			.field("closed", &self.is_closed())
			.finish()
	}
}
