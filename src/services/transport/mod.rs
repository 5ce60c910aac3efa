//! Transports that carry requests to consensus nodes and mirror nodes.
//!
//! Consensus node requests are JSON-RPC 2.0 envelopes POSTed to the node's
//! channel. The execute loop only sees the [`NodeTransport`] trait so tests
//! can script node behavior without a network.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpNodeTransport;

use async_trait::async_trait;
use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde_json::{json, Value};
use std::fmt;

use crate::services::network::Node;

/// HTTP status codes that trigger mirror endpoint rotation
/// - 429: Too Many Requests - indicates rate limiting from the current endpoint
pub const ROTATE_ON_ERROR_CODES: [u16; 1] = [429];

/// Remote procedure addressed by a request: a service and one of its methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RpcMethod {
	pub service: &'static str,
	pub method: &'static str,
}

impl RpcMethod {
	pub const fn new(service: &'static str, method: &'static str) -> Self {
		Self { service, method }
	}
}

impl fmt::Display for RpcMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.service, self.method)
	}
}

/// Carries one request to one node and returns the JSON-RPC `result`.
///
/// Implementations must not retry on their own: every dispatch has to be
/// visible to the execute loop so it can be counted and rotated.
#[async_trait]
pub trait NodeTransport: Send + Sync {
	async fn send_request(
		&self,
		node: &Node,
		method: RpcMethod,
		params: Value,
	) -> Result<Value, TransportError>;
}

/// Wraps params into a JSON-RPC 2.0 request envelope.
pub fn build_request_envelope(method: RpcMethod, params: Value) -> Value {
	json!({
		"jsonrpc": "2.0",
		"id": 1,
		"method": method.to_string(),
		"params": params
	})
}

/// Extracts the `result` member of a JSON-RPC response.
///
/// An `error` member becomes a non-retryable [`TransportError::Rpc`].
pub fn parse_response_envelope(url: &str, response: Value) -> Result<Value, TransportError> {
	let mut response = match response {
		Value::Object(map) => map,
		other => {
			return Err(TransportError::response_parse(
				format!("expected a JSON-RPC object from {}, got {}", url, other),
				None,
				None,
			))
		}
	};

	if let Some(error) = response.remove("error") {
		let code = error.get("code").and_then(Value::as_i64).unwrap_or(-32603);
		let message = error
			.get("message")
			.and_then(Value::as_str)
			.unwrap_or("unknown error")
			.to_string();
		return Err(TransportError::rpc(
			code,
			message,
			Some(std::collections::HashMap::from([(
				"url".to_string(),
				url.to_string(),
			)])),
		));
	}

	response.remove("result").ok_or_else(|| {
		TransportError::response_parse(
			format!("response from {} has neither result nor error", url),
			None,
			None,
		)
	})
}

/// Whether a middleware-level failure is transient (connect, reset, timeout).
pub(crate) fn is_transient_failure(error: &reqwest_middleware::Error) -> bool {
	matches!(default_on_request_failure(error), Some(Retryable::Transient))
}

/// A default retry strategy that retries on requests based on the status code
/// This can be used to customise the retry strategy
pub struct TransientErrorRetryStrategy;
impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(success) => default_on_request_success(success),
			Err(error) => default_on_request_failure(error),
		}
	}
}
