//! Error types for node and mirror transports
//!
//! Covers network failures, per-attempt timeouts, HTTP status failures,
//! JSON-RPC error objects, response parsing and mirror URL rotation.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
	/// HTTP error
	#[error("HTTP error: status {status_code} for URL {url}")]
	Http {
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		context: ErrorContext,
	},

	/// Connection level failure (refused, reset, TLS, ...)
	#[error("Network error: {context}")]
	Network {
		retryable: bool,
		context: ErrorContext,
	},

	/// The per-attempt deadline elapsed before the node answered
	#[error("Timeout: {0}")]
	Timeout(ErrorContext),

	/// The node answered with a JSON-RPC error object
	#[error("RPC error {code}: {context}")]
	Rpc { code: i64, context: ErrorContext },

	/// JSON parsing error
	#[error("Failed to parse JSON response: {0}")]
	ResponseParse(ErrorContext),

	/// URL rotation error
	#[error("URL rotation failed: {0}")]
	UrlRotation(ErrorContext),
}

// Attempt-level failures are not logged on construction; the execute loop
// logs each one with its node and attempt number.
impl TransportError {
	pub fn http(
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let msg = format!("HTTP error: status {} for URL {}", status_code, url);

		Self::Http {
			status_code,
			url,
			body,
			context: ErrorContext::new(msg, source, metadata),
		}
	}

	pub fn network(
		msg: impl Into<String>,
		retryable: bool,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network {
			retryable,
			context: ErrorContext::new(msg, source, metadata),
		}
	}

	pub fn timeout(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Timeout(ErrorContext::new(msg, source, metadata))
	}

	pub fn rpc(
		code: i64,
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Rpc {
			code,
			context: ErrorContext::new(msg, None, metadata),
		}
	}

	pub fn response_parse(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParse(ErrorContext::new(msg, source, metadata))
	}

	pub fn url_rotation(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UrlRotation(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Whether the failure is worth another attempt on a different node.
	///
	/// Server-side HTTP failures (5xx), 408 and 429 are transient. RPC error
	/// objects and parse failures are deterministic and are
	/// surfaced immediately.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Http { status_code, .. } => {
				status_code.is_server_error()
					|| *status_code == reqwest::StatusCode::REQUEST_TIMEOUT
					|| *status_code == reqwest::StatusCode::TOO_MANY_REQUESTS
			}
			Self::Network { retryable, .. } => *retryable,
			Self::Timeout(_) => true,
			Self::Rpc { .. }
			| Self::ResponseParse(_)
			| Self::UrlRotation(_) => false,
		}
	}
}

impl TraceableError for TransportError {
	fn trace_id(&self) -> String {
		match self {
			Self::Http { context, .. } => context.trace_id.clone(),
			Self::Network { context, .. } => context.trace_id.clone(),
			Self::Timeout(ctx) => ctx.trace_id.clone(),
			Self::Rpc { context, .. } => context.trace_id.clone(),
			Self::ResponseParse(ctx) => ctx.trace_id.clone(),
			Self::UrlRotation(ctx) => ctx.trace_id.clone(),
		}
	}
}
