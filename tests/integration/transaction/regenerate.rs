use std::time::Duration;
use tokio::time::Instant;

use crate::integration::mocks::{
	node_ids, operator_id, precheck, submitted_body, submitted_signature_count, test_client,
	ScriptedTransport,
};
use hiero_sdk::{
	models::{Status, TransactionId},
	services::{execute::ClientError, transaction::PrngTransaction},
};

#[tokio::test(start_paused = true)]
async fn test_duplicate_transaction_regenerates_id() {
	let transport = ScriptedTransport::new([precheck("DUPLICATE_TRANSACTION"), precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();
	transaction.freeze_with(&client).await.unwrap();
	let original = transaction.transaction_id().unwrap();

	let start = Instant::now();
	let response = transaction.execute(&client).await.unwrap();

	assert_ne!(response.transaction_id, original);
	assert_eq!(response.transaction_id.account_id, operator_id());
	assert!(response.transaction_id.valid_start > original.valid_start);
	assert_eq!(transaction.transaction_id(), Some(response.transaction_id.clone()));
	assert!(start.elapsed() < Duration::from_millis(250));

	let dispatches = transport.dispatches();
	assert_eq!(dispatches.len(), 2);
	let first = submitted_body(&dispatches[0].params);
	let second = submitted_body(&dispatches[1].params);
	assert_ne!(first["transactionId"], second["transactionId"]);
	assert_eq!(
		serde_json::from_value::<TransactionId>(second["transactionId"].clone()).unwrap(),
		response.transaction_id
	);
	assert_eq!(submitted_signature_count(&dispatches[1].params), 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_transaction_regenerates_id() {
	let transport = ScriptedTransport::new([precheck("TRANSACTION_EXPIRED"), precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();

	assert!(transaction.execute(&client).await.is_ok());
	assert_eq!(transport.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_transaction_id_is_not_regenerated() {
	let transport = ScriptedTransport::new([precheck("DUPLICATE_TRANSACTION"), precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let transaction_id = TransactionId::generate(operator_id());
	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3]))
		.unwrap()
		.set_transaction_id(transaction_id.clone())
		.unwrap();

	let error = transaction.execute(&client).await.unwrap_err();

	match error {
		ClientError::Precheck {
			status,
			transaction_id: reported,
			..
		} => {
			assert_eq!(status, Status::DuplicateTransaction);
			assert_eq!(reported, Some(transaction_id));
		}
		other => panic!("expected a precheck error, got {other}"),
	}
	assert_eq!(transport.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_override_enables_regeneration_of_explicit_id() {
	let transport = ScriptedTransport::new([precheck("DUPLICATE_TRANSACTION"), precheck("OK")]);
	let client = test_client(transport.clone(), &[3]);

	let transaction_id = TransactionId::generate(operator_id());
	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3]))
		.unwrap()
		.set_transaction_id(transaction_id.clone())
		.unwrap()
		.set_regenerate_transaction_id(true);

	let response = transaction.execute(&client).await.unwrap();
	assert_ne!(response.transaction_id, transaction_id);
}

#[tokio::test(start_paused = true)]
async fn test_client_default_can_disable_regeneration() {
	let transport = ScriptedTransport::new([precheck("DUPLICATE_TRANSACTION")]);
	let client = test_client(transport.clone(), &[3]);
	client.set_default_regenerate_transaction_id(false);

	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();

	let error = transaction.execute(&client).await.unwrap_err();
	assert_eq!(error.status(), Some(Status::DuplicateTransaction));
	assert_eq!(transport.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_externally_signed_bytes_are_not_regenerated() {
	let transport = ScriptedTransport::new([precheck("DUPLICATE_TRANSACTION")]);
	let client = test_client(transport.clone(), &[3]);

	let signer = hiero_sdk::models::PrivateKey::generate_ed25519();
	let mut transaction = PrngTransaction::new();
	transaction.set_node_account_ids(node_ids(&[3])).unwrap();
	transaction.freeze_with(&client).await.unwrap();
	transaction.sign(&signer).unwrap();

	let bytes = transaction.to_bytes().unwrap();
	let mut restored = PrngTransaction::from_bytes(&bytes).unwrap();

	let error = restored.execute(&client).await.unwrap_err();
	assert_eq!(error.status(), Some(Status::DuplicateTransaction));
	assert_eq!(transport.count(), 1);
}
