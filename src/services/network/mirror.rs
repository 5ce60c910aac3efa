//! Read-only mirror node network.
//!
//! Mirror nodes serve REST queries such as the address book. One URL is
//! active at a time; connection failures and rate limiting rotate to the next
//! URL, at most once per configured URL for a single request.

use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
	time::Duration,
};
use tokio::sync::{Mutex, RwLock};

use crate::{
	models::{ConfigError, Endpoint},
	services::transport::{TransientErrorRetryStrategy, TransportError, ROTATE_ON_ERROR_CODES},
	utils::http::{create_retryable_http_client, RetryConfig},
};

/// Outcome of one request against one mirror URL.
#[derive(Debug)]
enum SingleRequestAttemptOutcome {
	/// Got a response (status might still be an error)
	Success(reqwest::Response),
	/// Error during send (connection, timeout)
	NetworkError(reqwest_middleware::Error),
}

#[derive(Clone, Debug)]
pub struct MirrorNetwork {
	active_url: Arc<RwLock<String>>,
	fallback_urls: Arc<RwLock<Vec<String>>>,
	addresses: Vec<String>,
	client: ClientWithMiddleware,
	rotation_lock: Arc<Mutex<()>>,
	closed: Arc<AtomicBool>,
}

/// Base URL for a mirror address: `host:443` is https, other ports are http,
/// and values that already carry a scheme are used as given.
pub fn mirror_base_url(address: &str) -> Result<String, ConfigError> {
	if address.starts_with("http://") || address.starts_with("https://") {
		return Ok(address.trim_end_matches('/').to_string());
	}
	let endpoint = Endpoint::parse(address)?;
	let scheme = if endpoint.port == 443 { "https" } else { "http" };
	Ok(format!("{}://{}:{}", scheme, endpoint.address, endpoint.port))
}

impl MirrorNetwork {
	pub fn new(addresses: &[String]) -> Result<Self, ConfigError> {
		Self::with_retry_config(addresses, &RetryConfig::default())
	}

	pub fn with_retry_config(
		addresses: &[String],
		retry_config: &RetryConfig,
	) -> Result<Self, ConfigError> {
		let urls = addresses
			.iter()
			.map(|address| mirror_base_url(address))
			.collect::<Result<Vec<_>, _>>()?;
		let (active, fallbacks) = urls.split_first().ok_or_else(|| {
			ConfigError::validation_error("mirror network needs at least one address", None, None)
		})?;

		let base_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(8)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(10))
			.build()
			.map_err(|e| {
				ConfigError::validation_error(
					"failed to create mirror HTTP client",
					Some(Box::new(e)),
					None,
				)
			})?;
		let client = create_retryable_http_client(
			retry_config,
			base_client,
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self {
			active_url: Arc::new(RwLock::new(active.clone())),
			fallback_urls: Arc::new(RwLock::new(fallbacks.to_vec())),
			addresses: addresses.to_vec(),
			client,
			rotation_lock: Arc::new(Mutex::new(())),
			closed: Arc::new(AtomicBool::new(false)),
		})
	}

	/// Addresses as configured.
	pub fn addresses(&self) -> &[String] {
		&self.addresses
	}

	pub async fn active_url(&self) -> String {
		self.active_url.read().await.clone()
	}

	/// Marks the mirror network closed. Returns `true` only for the first call.
	pub fn close(&self) -> bool {
		!self.closed.swap(true, Ordering::SeqCst)
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	/// Rotates to the next fallback URL, moving the active one to the back.
	async fn try_rotate_url(&self) -> Result<String, TransportError> {
		let _guard = self.rotation_lock.lock().await;
		let initial_active_url = self.active_url.read().await.clone();
		let current_fallbacks_snapshot = self.fallback_urls.read().await.clone();

		let new_url = match current_fallbacks_snapshot
			.iter()
			.find(|&url| *url != initial_active_url)
		{
			Some(url) => url.clone(),
			None => {
				let msg = format!(
					"No fallback URLs available. Current active: '{}'",
					initial_active_url
				);
				return Err(TransportError::url_rotation(msg, None, None));
			}
		};

		let mut active_url_guard = self.active_url.write().await;
		let mut fallback_urls_guard = self.fallback_urls.write().await;
		let mut next_fallback_urls: Vec<String> = fallback_urls_guard
			.iter()
			.filter(|url| **url != new_url)
			.cloned()
			.collect();
		next_fallback_urls.push(initial_active_url.clone());

		tracing::debug!(
			from = %initial_active_url,
			to = %new_url,
			"rotated mirror URL"
		);

		*fallback_urls_guard = next_fallback_urls;
		*active_url_guard = new_url.clone();
		Ok(new_url)
	}

	async fn try_request_on_url(&self, url: &str) -> SingleRequestAttemptOutcome {
		match self.client.get(url).send().await {
			Ok(response) => SingleRequestAttemptOutcome::Success(response),
			Err(network_error) => {
				tracing::warn!("Network error while querying mirror: {}", network_error);
				SingleRequestAttemptOutcome::NetworkError(network_error)
			}
		}
	}

	/// GETs `path_and_query` (e.g. `/api/v1/network/nodes?limit=25`) from the
	/// active mirror URL and parses the JSON body.
	pub async fn get_json(&self, path_and_query: &str) -> Result<Value, TransportError> {
		if self.is_closed() {
			return Err(TransportError::network(
				"mirror network is closed",
				false,
				None,
				None,
			));
		}

		let max_rotations = self.addresses.len().saturating_sub(1);
		let mut rotations = 0;

		loop {
			let base_url = self.active_url.read().await.clone();
			let url = format!("{}{}", base_url, path_and_query);
			tracing::debug!(url = %url, "querying mirror node");

			match self.try_request_on_url(&url).await {
				SingleRequestAttemptOutcome::Success(response) => {
					let status = response.status();
					if status.is_success() {
						return response.json().await.map_err(|e| {
							TransportError::response_parse(
								"Failed to parse mirror JSON response",
								Some(Box::new(e)),
								Some(HashMap::from([("url".to_string(), url.clone())])),
							)
						});
					}

					let error_body = response.text().await.unwrap_or_default();
					tracing::warn!("Request to {} failed with status {}", url, status);

					if !ROTATE_ON_ERROR_CODES.contains(&status.as_u16()) || rotations >= max_rotations
					{
						return Err(TransportError::http(status, url, error_body, None, None));
					}
					match self.try_rotate_url().await {
						Ok(_) => rotations += 1,
						Err(rotation_error) => {
							return Err(TransportError::http(
								status,
								url,
								error_body,
								Some(Box::new(rotation_error)),
								None,
							))
						}
					}
				}
				SingleRequestAttemptOutcome::NetworkError(network_error) => {
					if rotations >= max_rotations {
						return Err(TransportError::network(
							format!("mirror request to {} failed", url),
							true,
							Some(Box::new(network_error)),
							None,
						));
					}
					match self.try_rotate_url().await {
						Ok(_) => rotations += 1,
						Err(rotation_error) => {
							return Err(TransportError::network(
								network_error.to_string(),
								true,
								Some(Box::new(rotation_error)),
								None,
							))
						}
					}
				}
			}
		}
	}
}
