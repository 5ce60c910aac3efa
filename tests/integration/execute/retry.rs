use mockall::Sequence;
use std::{collections::HashSet, sync::Arc};

use crate::integration::mocks::{
	connection_refused, node_ids, precheck, test_client, MockNodeTransport, ScriptedTransport,
};
use hiero_sdk::{
	models::{AccountId, Status},
	services::{
		execute::ClientError,
		transaction::PrngTransaction,
		transport::{RpcMethod, TransportError},
	},
};

#[tokio::test(start_paused = true)]
async fn test_max_attempts_bounds_dispatches() {
	let transport = ScriptedTransport::new((0..5).map(|_| precheck("BUSY")));
	let client = test_client(transport.clone(), &[3, 4, 5]);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4, 5]))
		.unwrap()
		.set_max_attempts(3);

	let error = transaction.execute(&client).await.unwrap_err();

	assert!(matches!(
		error,
		ClientError::AttemptsExhausted { attempts: 3, .. }
	));
	assert_eq!(transport.count(), 3);

	let distinct: HashSet<AccountId> = transport.nodes().into_iter().collect();
	assert_eq!(distinct.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_rotates_and_penalizes_node() {
	let transport = ScriptedTransport::new([connection_refused(), precheck("OK")]);
	let client = test_client(transport.clone(), &[3, 4]);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4]))
		.unwrap();

	let response = transaction.execute(&client).await.unwrap();

	assert_eq!(transport.nodes(), node_ids(&[3, 4]));
	assert_eq!(response.node_id, AccountId::from_num(4));

	let failed = client.network().node(&AccountId::from_num(3)).await.unwrap();
	assert_eq!(failed.failure_count(), 1);
	assert!(failed.last_failure().is_some());

	let healthy = client.network().node(&AccountId::from_num(4)).await.unwrap();
	assert_eq!(healthy.failure_count(), 0);
	assert!(healthy.is_healthy());
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_precheck_surfaces_immediately() {
	let transport = ScriptedTransport::new([precheck("INVALID_SIGNATURE")]);
	let client = test_client(transport.clone(), &[3, 4, 5]);

	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();
	transaction.freeze_with(&client).await.unwrap();
	let transaction_id = transaction.transaction_id();

	let error = transaction.execute(&client).await.unwrap_err();

	match error {
		ClientError::Precheck {
			status,
			transaction_id: reported,
			node,
			..
		} => {
			assert_eq!(status, Status::InvalidSignature);
			assert_eq!(reported, transaction_id);
			assert_eq!(node, Some(AccountId::from_num(3)));
		}
		other => panic!("expected a precheck error, got {other}"),
	}
	assert_eq!(transport.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_transport_error_stops_the_call() {
	let transport = ScriptedTransport::new([Err(TransportError::rpc(
		-32601,
		"Method not found".to_string(),
		None,
	))]);
	let client = test_client(transport.clone(), &[3, 4]);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4]))
		.unwrap();

	let error = transaction.execute(&client).await.unwrap_err();

	assert!(matches!(
		error,
		ClientError::Transport { attempts: 1, .. }
	));
	assert_eq!(transport.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_execution_can_be_retried() {
	let transport = ScriptedTransport::new([precheck("INSUFFICIENT_PAYER_BALANCE"), precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();

	let error = transaction.execute(&client).await.unwrap_err();
	assert_eq!(error.status(), Some(Status::InsufficientPayerBalance));

	let response = transaction.execute(&client).await.unwrap();
	assert_eq!(response.node_id, AccountId::from_num(3));
	assert_eq!(transport.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_busy_node_then_success_with_mock_transport() {
	let mut mock = MockNodeTransport::new();
	let mut sequence = Sequence::new();
	mock.expect_send_request()
		.withf(|_, method, _| *method == RpcMethod::new("UtilService", "prng"))
		.times(1)
		.in_sequence(&mut sequence)
		.returning(|_, _, _| precheck("BUSY"));
	mock.expect_send_request()
		.withf(|node, _, params| {
			node.account_id() == &AccountId::from_num(4)
				&& params.get("signedTransactionBytes").is_some()
		})
		.times(1)
		.in_sequence(&mut sequence)
		.returning(|_, _, _| precheck("OK"));

	let client = test_client(Arc::new(mock), &[3, 4]);
	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4]))
		.unwrap();

	let response = transaction.execute(&client).await.unwrap();
	assert_eq!(response.node_id, AccountId::from_num(4));

	let busy = client.network().node(&AccountId::from_num(3)).await.unwrap();
	assert_eq!(busy.failure_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_reports_last_node() {
	let transport = ScriptedTransport::new([connection_refused(), connection_refused()]);
	let client = test_client(transport.clone(), &[3, 4]);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4]))
		.unwrap()
		.set_max_attempts(2);

	match transaction.execute(&client).await.unwrap_err() {
		ClientError::AttemptsExhausted {
			attempts,
			last_node,
			..
		} => {
			assert_eq!(attempts, 2);
			assert_eq!(last_node, Some(AccountId::from_num(4)));
		}
		other => panic!("expected exhaustion, got {other}"),
	}
}
