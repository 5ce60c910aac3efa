//! A single consensus node: its endpoints, lazily created channel and health.
//!
//! Health bookkeeping follows a doubling backoff. Each failure doubles the
//! node's backoff (bounded by the configured maximum) and excludes the node
//! from selection until `now + backoff`. A success resets the backoff to the
//! configured minimum.

use parking_lot::Mutex;
use reqwest_middleware::ClientWithMiddleware;
use std::{
	sync::atomic::{AtomicBool, Ordering},
	time::Duration,
};
use tokio::time::Instant;
use url::Url;

use crate::{
	models::{AccountId, ConfigError, Endpoint},
	services::transport::TransportError,
	utils::{constants::TLS_PORTS, http::create_node_channel_client},
};

/// Connection to one node, shared by every request routed to it.
#[derive(Clone, Debug)]
pub struct NodeChannel {
	pub client: ClientWithMiddleware,
	pub url: Url,
}

#[derive(Debug, Clone)]
struct NodeHealth {
	min_backoff: Duration,
	max_backoff: Duration,
	current_backoff: Duration,
	readmit_time: Option<Instant>,
	last_used: Option<Instant>,
	last_failure: Option<Instant>,
	failures: u64,
}

impl NodeHealth {
	fn new(min_backoff: Duration, max_backoff: Duration) -> Self {
		Self {
			min_backoff,
			max_backoff,
			current_backoff: min_backoff,
			readmit_time: None,
			last_used: None,
			last_failure: None,
			failures: 0,
		}
	}
}

#[derive(Debug)]
pub struct Node {
	account_id: AccountId,
	endpoints: Vec<Endpoint>,
	authority: String,
	cert_hash: Option<String>,
	connect_timeout: Duration,
	health: Mutex<NodeHealth>,
	channel: Mutex<Option<NodeChannel>>,
	closed: AtomicBool,
}

impl Node {
	/// Creates a node from its endpoints.
	///
	/// The first endpoint with a usable host is the one dialed. A node with no
	/// dialable endpoint is a configuration error.
	pub fn new(
		account_id: AccountId,
		endpoints: Vec<Endpoint>,
		cert_hash: Option<String>,
		min_backoff: Duration,
		max_backoff: Duration,
		connect_timeout: Duration,
	) -> Result<Self, ConfigError> {
		let authority = endpoints
			.iter()
			.find_map(Endpoint::authority)
			.ok_or_else(|| {
				ConfigError::validation_error(
					format!("node {} has no dialable endpoint", account_id),
					None,
					None,
				)
			})?;

		Ok(Self {
			account_id,
			endpoints,
			authority,
			cert_hash: cert_hash.filter(|hash| !hash.is_empty()),
			connect_timeout,
			health: Mutex::new(NodeHealth::new(min_backoff, max_backoff)),
			channel: Mutex::new(None),
			closed: AtomicBool::new(false),
		})
	}

	pub fn account_id(&self) -> &AccountId {
		&self.account_id
	}

	pub fn endpoints(&self) -> &[Endpoint] {
		&self.endpoints
	}

	/// `host:port` this node is dialed at.
	pub fn authority(&self) -> &str {
		&self.authority
	}

	pub fn cert_hash(&self) -> Option<&str> {
		self.cert_hash.as_deref()
	}

	/// Whether the channel to this node uses TLS.
	pub fn is_tls(&self) -> bool {
		self.authority
			.rsplit_once(':')
			.and_then(|(_, port)| port.parse::<u16>().ok())
			.map(|port| TLS_PORTS.contains(&port))
			.unwrap_or(false)
	}

	/// Base URL of the node channel.
	pub fn url(&self) -> Result<Url, TransportError> {
		let scheme = if self.is_tls() { "https" } else { "http" };
		let raw = format!("{}://{}", scheme, self.authority);
		Url::parse(&raw).map_err(|e| {
			TransportError::network(
				format!("invalid node address {}", raw),
				false,
				Some(Box::new(e)),
				None,
			)
		})
	}

	/// Returns the node channel, creating it on first use.
	pub fn channel(&self) -> Result<NodeChannel, TransportError> {
		if self.is_closed() {
			return Err(TransportError::network(
				format!("channel to node {} is closed", self.account_id),
				false,
				None,
				None,
			));
		}

		let mut channel = self.channel.lock();
		if let Some(existing) = channel.as_ref() {
			return Ok(existing.clone());
		}

		let client = create_node_channel_client(self.connect_timeout).map_err(|e| {
			TransportError::network(
				format!("failed to create channel to node {}", self.account_id),
				false,
				Some(Box::new(e)),
				None,
			)
		})?;
		let created = NodeChannel {
			client,
			url: self.url()?,
		};
		*channel = Some(created.clone());
		Ok(created)
	}

	pub fn has_channel(&self) -> bool {
		self.channel.lock().is_some()
	}

	/// Tears down the channel. Returns `true` only for the call that closed it.
	pub fn close(&self) -> bool {
		if self.closed.swap(true, Ordering::SeqCst) {
			return false;
		}
		self.channel.lock().take();
		true
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	/// A node is healthy once its readmit time has passed.
	pub fn is_healthy(&self) -> bool {
		self.is_healthy_at(Instant::now())
	}

	pub fn is_healthy_at(&self, now: Instant) -> bool {
		match self.health.lock().readmit_time {
			Some(readmit) => now >= readmit,
			None => true,
		}
	}

	pub fn mark_used(&self) {
		self.health.lock().last_used = Some(Instant::now());
	}

	pub fn record_failure(&self) {
		let now = Instant::now();
		let mut health = self.health.lock();
		let doubled = health
			.current_backoff
			.saturating_mul(2)
			.max(Duration::from_millis(1));
		health.current_backoff = doubled.min(health.max_backoff);
		health.readmit_time = Some(now + health.current_backoff);
		health.last_failure = Some(now);
		health.failures += 1;
	}

	pub fn record_success(&self) {
		let mut health = self.health.lock();
		health.current_backoff = health.min_backoff;
		health.readmit_time = None;
	}

	pub fn current_backoff(&self) -> Duration {
		self.health.lock().current_backoff
	}

	pub fn readmit_time(&self) -> Option<Instant> {
		self.health.lock().readmit_time
	}

	pub fn last_used(&self) -> Option<Instant> {
		self.health.lock().last_used
	}

	pub fn last_failure(&self) -> Option<Instant> {
		self.health.lock().last_failure
	}

	/// Total failures recorded since the node was created.
	pub fn failure_count(&self) -> u64 {
		self.health.lock().failures
	}

	/// Replaces the backoff bounds, clamping the current backoff into them.
	pub fn set_backoff_bounds(&self, min_backoff: Duration, max_backoff: Duration) {
		let mut health = self.health.lock();
		health.min_backoff = min_backoff;
		health.max_backoff = max_backoff;
		health.current_backoff = health.current_backoff.clamp(min_backoff, max_backoff);
	}

	/// Carries health bookkeeping over from the node this one replaces.
	pub(crate) fn inherit_health(&self, previous: &Node) {
		let previous = previous.health.lock().clone();
		let mut health = self.health.lock();
		health.current_backoff = previous
			.current_backoff
			.clamp(health.min_backoff, health.max_backoff);
		health.readmit_time = previous.readmit_time;
		health.last_used = previous.last_used;
		health.last_failure = previous.last_failure;
		health.failures = previous.failures;
	}
}
