use std::collections::HashSet;

use crate::integration::mocks::{
	node_ids, operator_id, precheck, submitted_body, submitted_signature_count, test_client,
	ScriptedTransport,
};
use hiero_sdk::{
	models::{AccountId, Hbar, PrivateKey},
	services::{
		execute::ClientError,
		transaction::{AnyTransaction, PrngTransaction, TopicCreateTransaction, TransactionState},
	},
};

#[tokio::test(start_paused = true)]
async fn test_frozen_node_set_is_respected() {
	let transport = ScriptedTransport::new((0..6).map(|_| precheck("BUSY")));
	let client = test_client(transport.clone(), &[3, 4, 5, 6, 7]);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4, 5]))
		.unwrap()
		.set_max_attempts(6);

	assert!(transaction.execute(&client).await.is_err());

	let frozen: HashSet<AccountId> = node_ids(&[3, 4, 5]).into_iter().collect();
	let dispatched = transport.nodes();
	assert_eq!(dispatched.len(), 6);
	assert!(dispatched.iter().all(|node| frozen.contains(node)));

	let first_round: HashSet<AccountId> = dispatched[..3].iter().cloned().collect();
	assert_eq!(first_round, frozen);
}

#[tokio::test(start_paused = true)]
async fn test_each_node_receives_its_own_body() {
	let transport = ScriptedTransport::new([precheck("BUSY"), precheck("BUSY"), precheck("OK")]);
	let client = test_client(transport.clone(), &[3, 4, 5]);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4, 5]))
		.unwrap();
	let response = transaction.execute(&client).await.unwrap();

	let dispatches = transport.dispatches();
	for dispatch in &dispatches {
		let body = submitted_body(&dispatch.params);
		assert_eq!(body["nodeAccountId"], dispatch.node.to_string());
		assert_eq!(body["transactionId"]["accountId"], operator_id().to_string());
		assert_eq!(body["kind"], "utilPrng");
	}

	let hashes = transaction.transaction_hash_per_node().unwrap();
	assert_eq!(hashes.len(), 3);
	assert_eq!(hashes[&response.node_id], response.transaction_hash);
}

#[tokio::test(start_paused = true)]
async fn test_freeze_with_client_picks_nodes_and_fee() {
	let transport = ScriptedTransport::new([]);
	let client = test_client(transport, &[3, 4, 5, 6, 7, 8]);
	client.set_default_max_transaction_fee(Hbar::new(3)).unwrap();

	let mut transaction = PrngTransaction::new();
	transaction.freeze_with(&client).await.unwrap();

	assert_eq!(transaction.state(), TransactionState::Frozen);
	assert_eq!(transaction.node_account_ids().unwrap().len(), 2);
	assert_eq!(transaction.max_transaction_fee(), Some(Hbar::new(3)));
	assert_eq!(
		transaction.transaction_id().unwrap().account_id,
		operator_id()
	);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_fee_beats_client_default() {
	let transport = ScriptedTransport::new([]);
	let client = test_client(transport, &[3]);
	client.set_default_max_transaction_fee(Hbar::new(3)).unwrap();

	let mut transaction = TopicCreateTransaction::new();
	transaction
		.set_max_transaction_fee(Hbar::from_tinybars(500))
		.unwrap();
	transaction.freeze_with(&client).await.unwrap();

	assert_eq!(
		transaction.max_transaction_fee(),
		Some(Hbar::from_tinybars(500))
	);
}

#[tokio::test(start_paused = true)]
async fn test_mutation_after_freeze_is_rejected() {
	let transport = ScriptedTransport::new([]);
	let client = test_client(transport, &[3]);

	let mut transaction = TopicCreateTransaction::new();
	transaction.freeze_with(&client).await.unwrap();

	assert!(matches!(
		transaction.set_topic_memo("late"),
		Err(ClientError::FrozenState(_))
	));
	assert!(matches!(
		transaction.set_transaction_memo("late"),
		Err(ClientError::FrozenState(_))
	));
}

#[tokio::test(start_paused = true)]
async fn test_operator_signature_is_added_once() {
	let transport = ScriptedTransport::new([precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let other = PrivateKey::generate_ed25519();
	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();
	transaction.freeze_with(&client).await.unwrap();
	transaction.sign(&other).unwrap();
	transaction.execute(&client).await.unwrap();

	assert_eq!(transaction.state(), TransactionState::Executed);
	assert_eq!(submitted_signature_count(&transport.dispatches()[0].params), 2);
}

#[tokio::test(start_paused = true)]
async fn test_successful_transaction_cannot_execute_twice() {
	let transport = ScriptedTransport::new([precheck("OK"), precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();
	transaction.execute(&client).await.unwrap();

	assert!(transaction.execute(&client).await.is_err());
	assert_eq!(transport.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_bytes_round_trip_submits_identical_body() {
	let transport = ScriptedTransport::new([precheck("OK"), precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let mut original = PrngTransaction::new();
	original
		.set_node_account_ids(node_ids(&[3]))
		.unwrap()
		.set_range(100)
		.unwrap();
	original.freeze_with(&client).await.unwrap();
	let bytes = original.to_bytes().unwrap();

	let mut restored = AnyTransaction::from_bytes(&bytes).unwrap();
	assert_eq!(restored.kind(), "utilPrng");
	assert_eq!(restored.transaction_id(), original.transaction_id());
	restored.execute(&client).await.unwrap();

	original.execute(&client).await.unwrap();

	let dispatches = transport.dispatches();
	assert_eq!(
		submitted_body(&dispatches[0].params),
		submitted_body(&dispatches[1].params)
	);
	assert_eq!(submitted_body(&dispatches[0].params)["data"]["range"], 100);
}
