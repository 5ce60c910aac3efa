//! The live set of consensus nodes with selection and reconciliation.
//!
//! Membership sits behind an async `RwLock` so that an address book update
//! can swap nodes while other calls are selecting. Nodes are handed out as
//! `Arc<Node>`, so a node removed by an update stays usable by any request
//! already holding it.

use parking_lot::RwLock as SyncRwLock;
use std::{
	collections::{BTreeMap, HashMap, HashSet},
	sync::Arc,
	time::Duration,
};
use tokio::{sync::RwLock, time::Instant};
use tracing::{debug, info};

use crate::{
	models::{AccountId, ConfigError, Endpoint, LedgerId, NodeAddressBook},
	services::network::Node,
	utils::constants::{DEFAULT_GRPC_DEADLINE, DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF},
};

/// Port used by nodes without transport security, and its TLS counterpart.
const PLAINTEXT_NODE_PORT: u16 = 50211;
const TLS_NODE_PORT: u16 = 50212;

/// Tunables applied to every node of a [`Network`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
	pub min_backoff: Duration,
	pub max_backoff: Duration,
	pub connect_timeout: Duration,
	pub max_nodes_per_transaction: Option<usize>,
	/// Dial nodes on their TLS port.
	pub transport_security: bool,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			min_backoff: DEFAULT_MIN_BACKOFF,
			max_backoff: DEFAULT_MAX_BACKOFF,
			connect_timeout: DEFAULT_GRPC_DEADLINE,
			max_nodes_per_transaction: None,
			transport_security: false,
		}
	}
}

/// Node identity plus everything needed to (re)build it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeEntry {
	account_id: AccountId,
	endpoints: Vec<Endpoint>,
	cert_hash: Option<String>,
}

#[derive(Debug)]
pub struct Network {
	nodes: Arc<RwLock<HashMap<AccountId, Arc<Node>>>>,
	config: SyncRwLock<NetworkConfig>,
	ledger_id: SyncRwLock<Option<LedgerId>>,
}

impl Network {
	/// Builds a network from `host:port -> account` pairs. Several addresses
	/// for one account become endpoints of a single node.
	pub fn from_addresses<'a, I>(addresses: I, config: NetworkConfig) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = (&'a str, AccountId)>,
	{
		let entries = entries_from_addresses(addresses)?;
		Self::from_entries(entries, config)
	}

	/// Builds a network from an address book.
	pub fn from_address_book(
		book: &NodeAddressBook,
		config: NetworkConfig,
	) -> Result<Self, ConfigError> {
		Self::from_entries(entries_from_book(book)?, config)
	}

	fn from_entries(entries: Vec<NodeEntry>, config: NetworkConfig) -> Result<Self, ConfigError> {
		let mut nodes = HashMap::with_capacity(entries.len());
		for entry in entries {
			let node = build_node(&entry, &config)?;
			nodes.insert(entry.account_id, Arc::new(node));
		}

		Ok(Self {
			nodes: Arc::new(RwLock::new(nodes)),
			config: SyncRwLock::new(config),
			ledger_id: SyncRwLock::new(None),
		})
	}

	pub fn config(&self) -> NetworkConfig {
		self.config.read().clone()
	}

	pub fn ledger_id(&self) -> Option<LedgerId> {
		self.ledger_id.read().clone()
	}

	pub fn set_ledger_id(&self, ledger_id: Option<LedgerId>) {
		*self.ledger_id.write() = ledger_id;
	}

	pub async fn len(&self) -> usize {
		self.nodes.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.nodes.read().await.is_empty()
	}

	pub async fn node(&self, account_id: &AccountId) -> Option<Arc<Node>> {
		self.nodes.read().await.get(account_id).cloned()
	}

	/// All nodes, ordered by account id.
	pub async fn nodes(&self) -> Vec<Arc<Node>> {
		let mut nodes: Vec<Arc<Node>> = self.nodes.read().await.values().cloned().collect();
		nodes.sort_by(|a, b| a.account_id().cmp(b.account_id()));
		nodes
	}

	pub async fn node_account_ids(&self) -> Vec<AccountId> {
		let mut ids: Vec<AccountId> = self.nodes.read().await.keys().cloned().collect();
		ids.sort();
		ids
	}

	/// `host:port -> account` view of the current membership.
	pub async fn addresses(&self) -> BTreeMap<String, AccountId> {
		self.nodes
			.read()
			.await
			.values()
			.map(|node| (node.authority().to_string(), node.account_id().clone()))
			.collect()
	}

	/// Picks the node for the next attempt of a call.
	///
	/// Candidates are the `restrict` set when given (nodes not in the network
	/// are ignored), else the whole network. Healthy nodes always win over
	/// nodes in backoff: an untried healthy node first, then a healthy node
	/// already tried in this call, least recently used in both cases. Only
	/// when every candidate is backing off is the least recently failed one
	/// returned instead of failing.
	pub async fn select_node(
		&self,
		restrict: Option<&[AccountId]>,
		tried: &HashSet<AccountId>,
	) -> Result<Arc<Node>, ConfigError> {
		let candidates = self.candidates(restrict).await?;

		let now = Instant::now();
		let (healthy, backing_off): (Vec<Arc<Node>>, Vec<Arc<Node>>) =
			candidates.into_iter().partition(|node| node.is_healthy_at(now));

		let least_recently_used = |a: &&Arc<Node>, b: &&Arc<Node>| {
			a.last_used()
				.cmp(&b.last_used())
				.then_with(|| a.account_id().cmp(b.account_id()))
		};
		let untried = healthy
			.iter()
			.filter(|node| !tried.contains(node.account_id()))
			.min_by(least_recently_used);
		if let Some(node) = untried.or_else(|| healthy.iter().min_by(least_recently_used)) {
			return Ok(Arc::clone(node));
		}

		backing_off
			.into_iter()
			.min_by(|a, b| {
				a.last_failure()
					.cmp(&b.last_failure())
					.then_with(|| a.account_id().cmp(b.account_id()))
			})
			.ok_or_else(|| ConfigError::validation_error("network has no nodes", None, None))
	}

	async fn candidates(
		&self,
		restrict: Option<&[AccountId]>,
	) -> Result<Vec<Arc<Node>>, ConfigError> {
		let nodes = self.nodes.read().await;
		let candidates: Vec<Arc<Node>> = match restrict {
			Some(ids) => ids.iter().filter_map(|id| nodes.get(id).cloned()).collect(),
			None => nodes.values().cloned().collect(),
		};

		if candidates.is_empty() {
			let msg = match restrict {
				Some(ids) => format!(
					"none of the nodes [{}] are part of the network",
					ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
				),
				None => "network has no nodes".to_string(),
			};
			return Err(ConfigError::validation_error(msg, None, None));
		}
		Ok(candidates)
	}

	/// Returns up to `count` distinct healthy nodes, least recently used
	/// first. Falls back to the single least recently failed node when none
	/// is healthy.
	pub async fn select_nodes(&self, count: usize) -> Result<Vec<Arc<Node>>, ConfigError> {
		let nodes = self.nodes().await;
		if nodes.is_empty() {
			return Err(ConfigError::validation_error("network has no nodes", None, None));
		}

		let now = Instant::now();
		let mut healthy: Vec<Arc<Node>> = nodes
			.iter()
			.filter(|node| node.is_healthy_at(now))
			.cloned()
			.collect();

		if healthy.is_empty() {
			let fallback = nodes
				.into_iter()
				.min_by(|a, b| a.last_failure().cmp(&b.last_failure()));
			return Ok(fallback.into_iter().collect());
		}

		healthy.sort_by(|a, b| a.last_used().cmp(&b.last_used()));
		healthy.truncate(count.max(1));
		Ok(healthy)
	}

	/// How many nodes a transaction is frozen for when none are given: a third
	/// of the healthy nodes, at least one, capped by the configured maximum.
	pub async fn nodes_per_transaction(&self) -> usize {
		let now = Instant::now();
		let healthy = self
			.nodes
			.read()
			.await
			.values()
			.filter(|node| node.is_healthy_at(now))
			.count();
		let count = healthy.div_ceil(3).max(1);
		match self.config.read().max_nodes_per_transaction {
			Some(max) => count.min(max.max(1)),
			None => count,
		}
	}

	/// Reconciles membership with an address book.
	///
	/// Unchanged nodes are kept as they are, changed nodes are rebuilt with
	/// their health carried over, new nodes are added and nodes missing from
	/// the book are removed. Removed nodes are not closed: a request holding
	/// one finishes on it and the channel goes away with the last reference.
	/// Applying the same book twice is a no-op. An empty book is rejected.
	pub async fn apply_address_book(&self, book: &NodeAddressBook) -> Result<(), ConfigError> {
		self.apply_entries(entries_from_book(book)?).await
	}

	/// Reconciles membership with `host:port -> account` pairs.
	pub async fn set_addresses<'a, I>(&self, addresses: I) -> Result<(), ConfigError>
	where
		I: IntoIterator<Item = (&'a str, AccountId)>,
	{
		self.apply_entries(entries_from_addresses(addresses)?).await
	}

	async fn apply_entries(&self, entries: Vec<NodeEntry>) -> Result<(), ConfigError> {
		if entries.is_empty() {
			return Err(ConfigError::validation_error(
				"refusing to apply an empty node list",
				None,
				None,
			));
		}

		let config = self.config();
		let mut nodes = self.nodes.write().await;
		let mut next = HashMap::with_capacity(entries.len());
		let (mut added, mut updated) = (0usize, 0usize);

		for entry in entries {
			match nodes.get(&entry.account_id) {
				Some(existing)
					if existing.endpoints() == dial_endpoints(&entry, &config).as_slice()
						&& existing.cert_hash() == entry.cert_hash.as_deref() =>
				{
					next.insert(entry.account_id, Arc::clone(existing));
				}
				Some(existing) => {
					let node = build_node(&entry, &config)?;
					node.inherit_health(existing);
					updated += 1;
					next.insert(entry.account_id, Arc::new(node));
				}
				None => {
					let node = build_node(&entry, &config)?;
					added += 1;
					next.insert(entry.account_id, Arc::new(node));
				}
			}
		}

		let removed = nodes
			.keys()
			.filter(|account_id| !next.contains_key(*account_id))
			.count();

		*nodes = next;
		if added + updated + removed > 0 {
			info!(added, updated, removed, total = nodes.len(), "network membership updated");
		} else {
			debug!("network membership unchanged");
		}
		Ok(())
	}

	/// Updates backoff bounds on the network and every node in it.
	pub async fn set_backoff_bounds(
		&self,
		min_backoff: Duration,
		max_backoff: Duration,
	) -> Result<(), ConfigError> {
		if min_backoff > max_backoff {
			return Err(ConfigError::validation_error(
				"minBackoff exceeds maxBackoff",
				None,
				Some(HashMap::from([
					("minBackoffMs".to_string(), min_backoff.as_millis().to_string()),
					("maxBackoffMs".to_string(), max_backoff.as_millis().to_string()),
				])),
			));
		}
		{
			let mut config = self.config.write();
			config.min_backoff = min_backoff;
			config.max_backoff = max_backoff;
		}
		for node in self.nodes.read().await.values() {
			node.set_backoff_bounds(min_backoff, max_backoff);
		}
		Ok(())
	}

	pub fn set_max_nodes_per_transaction(&self, max: Option<usize>) {
		self.config.write().max_nodes_per_transaction = max;
	}

	/// Closes every node channel. Returns how many channels this call closed.
	pub async fn close(&self) -> usize {
		self.nodes
			.read()
			.await
			.values()
			.filter(|node| node.close())
			.count()
	}
}

/// Endpoints as they will be dialed under `config`.
fn dial_endpoints(entry: &NodeEntry, config: &NetworkConfig) -> Vec<Endpoint> {
	if !config.transport_security {
		return entry.endpoints.clone();
	}
	entry
		.endpoints
		.iter()
		.cloned()
		.map(|mut endpoint| {
			if endpoint.port == PLAINTEXT_NODE_PORT {
				endpoint.port = TLS_NODE_PORT;
			}
			endpoint
		})
		.collect()
}

fn build_node(entry: &NodeEntry, config: &NetworkConfig) -> Result<Node, ConfigError> {
	Node::new(
		entry.account_id.clone(),
		dial_endpoints(entry, config),
		entry.cert_hash.clone(),
		config.min_backoff,
		config.max_backoff,
		config.connect_timeout,
	)
}

fn entries_from_addresses<'a, I>(addresses: I) -> Result<Vec<NodeEntry>, ConfigError>
where
	I: IntoIterator<Item = (&'a str, AccountId)>,
{
	let mut grouped: BTreeMap<AccountId, Vec<Endpoint>> = BTreeMap::new();
	for (address, account_id) in addresses {
		grouped
			.entry(account_id)
			.or_default()
			.push(Endpoint::parse(address)?);
	}

	Ok(grouped
		.into_iter()
		.map(|(account_id, endpoints)| NodeEntry {
			account_id,
			endpoints,
			cert_hash: None,
		})
		.collect())
}

fn entries_from_book(book: &NodeAddressBook) -> Result<Vec<NodeEntry>, ConfigError> {
	book.node_addresses
		.iter()
		.map(|address| {
			let account_id = address.account_id.clone().ok_or_else(|| {
				ConfigError::validation_error(
					format!("address book entry for node {} has no account id", address.node_id),
					None,
					None,
				)
			})?;
			Ok(NodeEntry {
				account_id,
				endpoints: address.addresses.clone(),
				cert_hash: Some(address.cert_hash.clone()).filter(|hash| !hash.is_empty()),
			})
		})
		.collect()
}
