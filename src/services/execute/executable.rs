//! The retry loop shared by every transaction and query.
//!
//! One call walks `select node -> build -> dispatch -> classify` until the
//! response is terminal, the attempt budget is spent, or the call is
//! cancelled. Transport failures and retryable prechecks penalize the node
//! that produced them; "not ready yet" answers back off on a per-call
//! schedule without touching node health.

use serde_json::Value;
use std::collections::HashSet;
use tokio::time::{sleep, sleep_until, timeout, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::{
	models::{AccountId, Status, TransactionId},
	services::{
		client::Client,
		execute::{CancelReason, ClientError, RequestSettings},
		transport::{RpcMethod, TransportError},
	},
	utils::http::exponential_backoff,
};

/// How the loop proceeds after a completed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
	/// Hand the response to the caller.
	Success,
	/// Try again. When `penalize_node` is set the node is put into backoff
	/// and the sleep follows its backoff; otherwise the call's own
	/// exponential schedule is used.
	Retry { penalize_node: bool },
	/// Try again right away under a fresh transaction id.
	RegenerateTransactionId,
	/// Surface the status to the caller as a precheck error.
	Failure,
}

/// Default classification of a precheck status.
pub fn classify_precheck(status: Status) -> AttemptOutcome {
	match status {
		Status::Ok => AttemptOutcome::Success,
		Status::Busy | Status::PlatformNotActive | Status::PlatformTransactionNotCreated => {
			AttemptOutcome::Retry {
				penalize_node: true,
			}
		}
		Status::TransactionExpired | Status::DuplicateTransaction => {
			AttemptOutcome::RegenerateTransactionId
		}
		_ => AttemptOutcome::Failure,
	}
}

/// A request the retry loop can drive.
///
/// Implementors describe one operation kind: which remote procedure it calls,
/// how the per-node request is built, and how the response is read.
pub trait Execute {
	type Response: Send;

	/// Short name used in logs.
	fn name(&self) -> &'static str;

	fn settings(&self) -> &RequestSettings;

	/// Nodes this request may be sent to. `None` lets the network choose.
	fn node_account_ids(&self) -> Option<&[AccountId]>;

	fn method(&self) -> RpcMethod;

	fn transaction_id(&self) -> Option<TransactionId> {
		None
	}

	/// The `params` of the JSON-RPC call addressed to `node`.
	fn build_request(&self, node: &AccountId) -> Result<Value, ClientError>;

	/// Precheck status carried by a response.
	fn response_status(&self, response: &Value) -> Result<Status, ClientError>;

	fn classify(&self, status: Status, _response: &Value) -> AttemptOutcome {
		classify_precheck(status)
	}

	/// Moves the request to a fresh transaction id. Returns `false` when the
	/// request cannot be regenerated, which ends the call with the status
	/// that asked for it.
	fn regenerate_transaction_id(&mut self, _client: &Client) -> Result<bool, ClientError> {
		Ok(false)
	}

	fn make_response(
		&self,
		response: Value,
		node: &AccountId,
	) -> Result<Self::Response, ClientError>;
}

async fn cancelled(token: Option<&CancellationToken>) {
	match token {
		Some(token) => token.cancelled().await,
		None => std::future::pending().await,
	}
}

async fn deadline_elapsed(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => sleep_until(deadline).await,
		None => std::future::pending().await,
	}
}

fn check_cancelled(
	token: Option<&CancellationToken>,
	deadline: Option<Instant>,
	attempts: u32,
) -> Result<(), ClientError> {
	if token.is_some_and(|token| token.is_cancelled()) {
		return Err(ClientError::cancelled(CancelReason::Token, attempts));
	}
	if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
		return Err(ClientError::cancelled(CancelReason::DeadlineExceeded, attempts));
	}
	Ok(())
}

/// Sleeps for `delay` unless the call is cancelled or its deadline passes first.
async fn backoff(
	delay: Duration,
	token: Option<&CancellationToken>,
	deadline: Option<Instant>,
	attempts: u32,
) -> Result<(), ClientError> {
	tokio::select! {
		biased;
		_ = cancelled(token) => Err(ClientError::cancelled(CancelReason::Token, attempts)),
		_ = deadline_elapsed(deadline) => {
			Err(ClientError::cancelled(CancelReason::DeadlineExceeded, attempts))
		}
		_ = sleep(delay) => Ok(()),
	}
}

/// Runs `request` against the client's network until it reaches a terminal
/// outcome.
#[instrument(skip_all, fields(request = %request.name()))]
pub async fn execute<E>(client: &Client, request: &mut E) -> Result<E::Response, ClientError>
where
	E: Execute + Send,
{
	client.ensure_open()?;

	let settings = request.settings().resolve(&client.settings());
	let token = settings.cancellation.clone();
	let token = token.as_ref();
	let deadline = Instant::now().checked_add(settings.request_timeout);
	let network = client.network();
	let transport = client.transport();
	let method = request.method();

	let mut not_ready_delays = exponential_backoff(settings.min_backoff, settings.max_backoff);
	let mut tried: HashSet<AccountId> = HashSet::new();
	let mut last_error: Option<ClientError> = None;
	let mut last_node: Option<AccountId> = None;

	for attempt in 1..=settings.max_attempts {
		check_cancelled(token, deadline, attempt - 1)?;

		let node = network
			.select_node(request.node_account_ids(), &tried)
			.await?;
		let node_id = node.account_id().clone();
		tried.insert(node_id.clone());
		last_node = Some(node_id.clone());
		node.mark_used();

		let params = request.build_request(&node_id)?;
		debug!(attempt, node = %node_id, method = %method, "dispatching request");

		let result = tokio::select! {
			biased;
			_ = cancelled(token) => {
				return Err(ClientError::cancelled(CancelReason::Token, attempt));
			}
			_ = deadline_elapsed(deadline) => {
				return Err(ClientError::cancelled(CancelReason::DeadlineExceeded, attempt));
			}
			result = timeout(
				settings.grpc_deadline,
				transport.send_request(&node, method, params),
			) => result.unwrap_or_else(|_| {
				Err(TransportError::timeout(
					format!("no response within {:?}", settings.grpc_deadline),
					None,
					None,
				))
			}),
		};

		let delay = match result {
			Err(error) if error.is_retryable() => {
				node.record_failure();
				warn!(
					attempt,
					node = %node_id,
					backoff = ?node.current_backoff(),
					"transport failure: {}",
					error
				);
				last_error = Some(ClientError::transport(attempt, node_id, error));
				node.current_backoff().min(settings.max_backoff)
			}
			Err(error) => return Err(ClientError::transport(attempt, node_id, error)),
			Ok(response) => {
				let status = request.response_status(&response)?;
				match request.classify(status, &response) {
					AttemptOutcome::Success => {
						node.record_success();
						return request.make_response(response, &node_id);
					}
					AttemptOutcome::Failure => {
						node.record_success();
						return Err(ClientError::precheck(
							status,
							request.transaction_id(),
							Some(node_id),
						));
					}
					AttemptOutcome::RegenerateTransactionId => {
						node.record_success();
						let previous = request.transaction_id();
						if !request.regenerate_transaction_id(client)? {
							return Err(ClientError::precheck(status, previous, Some(node_id)));
						}
						debug!(
							attempt,
							status = %status,
							transaction_id = ?request.transaction_id().map(|id| id.to_string()),
							"regenerated transaction id"
						);
						last_error = Some(ClientError::precheck(status, previous, Some(node_id)));
						continue;
					}
					AttemptOutcome::Retry { penalize_node } => {
						let error =
							ClientError::precheck(status, request.transaction_id(), Some(node_id));
						last_error = Some(error);
						if penalize_node {
							node.record_failure();
							warn!(attempt, status = %status, "node is busy, backing off");
							node.current_backoff().min(settings.max_backoff)
						} else {
							debug!(attempt, status = %status, "response not ready");
							not_ready_delays.next().unwrap_or(settings.max_backoff)
						}
					}
				}
			}
		};

		if attempt < settings.max_attempts {
			backoff(delay, token, deadline, attempt).await?;
		}
	}

	Err(ClientError::attempts_exhausted(
		settings.max_attempts,
		last_node,
		last_error,
	))
}
