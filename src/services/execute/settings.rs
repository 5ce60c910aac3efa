//! Per-request overrides of the client's retry tunables.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::services::client::ClientSettings;

/// Overrides carried by a single transaction or query. Unset values fall
/// back to the client's settings when the request runs.
#[derive(Debug, Clone, Default)]
pub struct RequestSettings {
	pub max_attempts: Option<u32>,
	pub min_backoff: Option<Duration>,
	pub max_backoff: Option<Duration>,
	/// Bound on a single round trip to one node.
	pub grpc_deadline: Option<Duration>,
	/// Bound on the whole call, every attempt and sleep included.
	pub request_timeout: Option<Duration>,
	pub cancellation: Option<CancellationToken>,
}

/// Settings of one call after applying request overrides to client defaults.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
	pub max_attempts: u32,
	pub min_backoff: Duration,
	pub max_backoff: Duration,
	pub grpc_deadline: Duration,
	pub request_timeout: Duration,
	pub cancellation: Option<CancellationToken>,
}

impl RequestSettings {
	pub fn resolve(&self, defaults: &ClientSettings) -> ResolvedSettings {
		let min_backoff = self.min_backoff.unwrap_or(defaults.min_backoff);
		let max_backoff = self.max_backoff.unwrap_or(defaults.max_backoff).max(min_backoff);

		ResolvedSettings {
			max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts).max(1),
			min_backoff,
			max_backoff,
			grpc_deadline: self.grpc_deadline.unwrap_or(defaults.grpc_deadline),
			request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
			cancellation: self.cancellation.clone(),
		}
	}
}
