use async_trait::async_trait;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::integration::mocks::{
	node_ids, precheck, test_client, test_client_with, ScriptedTransport,
};
use hiero_sdk::{
	models::AccountId,
	services::{
		client::ClientSettings,
		execute::{CancelReason, ClientError},
		network::Node,
		transaction::PrngTransaction,
		transport::{NodeTransport, RpcMethod, TransportError},
	},
};

/// Never answers requests sent to `0.0.3`; every other node accepts.
struct StallingTransport;

#[async_trait]
impl NodeTransport for StallingTransport {
	async fn send_request(
		&self,
		node: &Node,
		_method: RpcMethod,
		_params: Value,
	) -> Result<Value, TransportError> {
		if node.account_id() == &AccountId::from_num(3) {
			std::future::pending::<()>().await;
		}
		precheck("OK")
	}
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_token_prevents_dispatch() {
	let transport = ScriptedTransport::new([precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let token = CancellationToken::new();
	token.cancel();

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3]))
		.unwrap()
		.set_cancellation_token(token);

	let error = transaction.execute(&client).await.unwrap_err();

	assert!(matches!(
		error,
		ClientError::Cancelled {
			reason: CancelReason::Token,
			..
		}
	));
	assert_eq!(transport.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_backoff() {
	let transport = ScriptedTransport::new((0..10).map(|_| precheck("BUSY")));
	let client = test_client(transport.clone(), &[3, 4, 5]);

	let token = CancellationToken::new();
	let canceller = token.clone();
	tokio::spawn(async move {
		tokio::time::sleep(Duration::from_millis(100)).await;
		canceller.cancel();
	});

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4, 5]))
		.unwrap()
		.set_cancellation_token(token);

	let error = transaction.execute(&client).await.unwrap_err();

	assert!(matches!(
		error,
		ClientError::Cancelled {
			reason: CancelReason::Token,
			..
		}
	));
	assert_eq!(transport.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_request_timeout_bounds_the_whole_call() {
	let transport = ScriptedTransport::new((0..10).map(|_| precheck("BUSY")));
	let client = test_client(transport.clone(), &[3, 4, 5]);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4, 5]))
		.unwrap()
		.set_max_attempts(10)
		.set_request_timeout(Duration::from_secs(1));

	let start = Instant::now();
	let error = transaction.execute(&client).await.unwrap_err();

	assert!(matches!(
		error,
		ClientError::Cancelled {
			reason: CancelReason::DeadlineExceeded,
			..
		}
	));
	assert!(transport.count() < 10);
	assert!(start.elapsed() <= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_attempt_deadline_moves_on_to_next_node() {
	let settings = ClientSettings {
		grpc_deadline: Duration::from_secs(2),
		..ClientSettings::default()
	};
	let client = test_client_with(Arc::new(StallingTransport), &[3, 4], settings);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4]))
		.unwrap();

	let start = Instant::now();
	let response = transaction.execute(&client).await.unwrap();

	assert_eq!(response.node_id, AccountId::from_num(4));
	assert!(start.elapsed() >= Duration::from_secs(2));

	let stalled = client.network().node(&AccountId::from_num(3)).await.unwrap();
	assert_eq!(stalled.failure_count(), 1);
}

#[tokio::test]
async fn test_closed_client_rejects_requests() {
	let transport = ScriptedTransport::new([precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);
	client.close().await;

	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();

	let error = transaction.execute(&client).await.unwrap_err();
	assert!(matches!(error, ClientError::Configuration(_)));
	assert_eq!(transport.count(), 0);
}
