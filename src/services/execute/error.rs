//! Errors surfaced to callers of `execute`, `freeze` and friends.
//!
//! Every variant carries an [`ErrorContext`] so the trace id of the last
//! attempt failure survives wrapping into an exhaustion error.

use std::{collections::HashMap, fmt};
use thiserror::Error;
use uuid::Uuid;

use crate::{
	models::{AccountId, ConfigError, SecurityError, Status, TransactionId},
	services::transport::TransportError,
	utils::logging::error::{ErrorContext, TraceableError},
};

/// Why a call was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
	/// The caller's cancellation token fired.
	Token,
	/// The call's overall request timeout elapsed.
	DeadlineExceeded,
}

impl fmt::Display for CancelReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Token => write!(f, "cancelled by caller"),
			Self::DeadlineExceeded => write!(f, "request timeout elapsed"),
		}
	}
}

#[derive(Debug, Error)]
pub enum ClientError {
	/// No usable node, malformed identifiers, invalid settings, closed client
	#[error("Configuration error: {0}")]
	Configuration(ErrorContext),

	/// A lifecycle rule was broken: mutation after freeze, signing before freeze, ...
	#[error("Frozen state error: {0}")]
	FrozenState(ErrorContext),

	/// A transport failure that retrying cannot fix
	#[error("Transport error on node {node} after {attempts} attempt(s): {context}")]
	Transport {
		attempts: u32,
		node: AccountId,
		#[source]
		context: ErrorContext,
	},

	/// The node rejected the request during precheck
	#[error("Precheck failed with status {status}: {context}")]
	Precheck {
		status: Status,
		transaction_id: Option<TransactionId>,
		node: Option<AccountId>,
		#[source]
		context: ErrorContext,
	},

	/// The transaction reached consensus with a non-success status
	#[error("Receipt for transaction {transaction_id} has status {status}: {context}")]
	ReceiptStatus {
		status: Status,
		transaction_id: TransactionId,
		#[source]
		context: ErrorContext,
	},

	/// Every allowed attempt was used; the source is the last failure
	#[error("Attempts exhausted after {attempts} attempt(s): {context}")]
	AttemptsExhausted {
		attempts: u32,
		last_node: Option<AccountId>,
		#[source]
		context: ErrorContext,
	},

	/// The call was cancelled before it could complete
	#[error("Cancelled ({reason}): {context}")]
	Cancelled {
		reason: CancelReason,
		#[source]
		context: ErrorContext,
	},

	/// A response or serialized transaction could not be decoded
	#[error("Decode error: {0}")]
	Decode(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ClientError {
	pub fn configuration(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Configuration(ErrorContext::new(msg, source, metadata))
	}

	pub fn frozen_state(msg: impl Into<String>) -> Self {
		Self::FrozenState(ErrorContext::new(msg, None, None))
	}

	pub fn transport(attempts: u32, node: AccountId, error: TransportError) -> Self {
		let msg = format!("request to node {} failed", node);
		Self::Transport {
			attempts,
			node,
			context: ErrorContext::new_with_log(msg, Some(Box::new(error)), None),
		}
	}

	pub fn precheck(
		status: Status,
		transaction_id: Option<TransactionId>,
		node: Option<AccountId>,
	) -> Self {
		let mut metadata = HashMap::new();
		if let Some(id) = &transaction_id {
			metadata.insert("transaction_id".to_string(), id.to_string());
		}
		if let Some(node) = &node {
			metadata.insert("node".to_string(), node.to_string());
		}
		Self::Precheck {
			status,
			transaction_id,
			node,
			context: ErrorContext::new(
				format!("node returned {}", status),
				None,
				Some(metadata),
			),
		}
	}

	pub fn receipt_status(status: Status, transaction_id: TransactionId) -> Self {
		Self::ReceiptStatus {
			status,
			context: ErrorContext::new(
				format!("transaction {} failed with {}", transaction_id, status),
				None,
				None,
			),
			transaction_id,
		}
	}

	pub fn attempts_exhausted(
		attempts: u32,
		last_node: Option<AccountId>,
		last_error: Option<ClientError>,
	) -> Self {
		let metadata = last_node
			.as_ref()
			.map(|node| HashMap::from([("last_node".to_string(), node.to_string())]));
		Self::AttemptsExhausted {
			attempts,
			last_node,
			context: ErrorContext::new_with_log(
				"no attempt succeeded",
				last_error.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
				metadata,
			),
		}
	}

	pub fn cancelled(reason: CancelReason, attempts: u32) -> Self {
		Self::Cancelled {
			reason,
			context: ErrorContext::new(
				format!("stopped after {} attempt(s)", attempts),
				None,
				None,
			),
		}
	}

	pub fn decode(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
	) -> Self {
		Self::Decode(ErrorContext::new(msg, source, None))
	}

	/// Status code carried by precheck and receipt errors.
	pub fn status(&self) -> Option<Status> {
		match self {
			Self::Precheck { status, .. } | Self::ReceiptStatus { status, .. } => Some(*status),
			_ => None,
		}
	}
}

impl TraceableError for ClientError {
	fn trace_id(&self) -> String {
		match self {
			Self::Configuration(ctx) | Self::FrozenState(ctx) | Self::Decode(ctx) => {
				ctx.trace_id.clone()
			}
			Self::Transport { context, .. }
			| Self::Precheck { context, .. }
			| Self::ReceiptStatus { context, .. }
			| Self::AttemptsExhausted { context, .. }
			| Self::Cancelled { context, .. } => context.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

impl From<ConfigError> for ClientError {
	fn from(error: ConfigError) -> Self {
		Self::configuration(error.to_string(), Some(Box::new(error)), None)
	}
}

impl From<Box<SecurityError>> for ClientError {
	fn from(error: Box<SecurityError>) -> Self {
		Self::configuration(
			error.to_string(),
			Some(error as Box<dyn std::error::Error + Send + Sync>),
			None,
		)
	}
}
