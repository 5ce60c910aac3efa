use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

use crate::integration::mocks::{
	node_ids, operator_id, precheck, query_precheck, receipt, test_client, ScriptedTransport,
};
use hiero_sdk::{
	models::{AccountId, Status, TransactionId},
	services::{
		execute::ClientError,
		query::TransactionReceiptQuery,
		transaction::{PrngTransaction, TransactionResponse},
	},
};

fn response_from(node: u64) -> TransactionResponse {
	TransactionResponse {
		node_id: AccountId::from_num(node),
		transaction_id: TransactionId::generate(operator_id()),
		transaction_hash: vec![0; 48],
		validate_status: false,
	}
}

#[tokio::test(start_paused = true)]
async fn test_receipt_polls_until_consensus() {
	let transport = ScriptedTransport::new([receipt("UNKNOWN"), receipt("UNKNOWN"), receipt("SUCCESS")]);
	let client = test_client(transport.clone(), &[3, 4, 5]);

	let start = Instant::now();
	let receipt = response_from(4).get_receipt(&client).await.unwrap();

	assert_eq!(receipt.status, Status::Success);
	assert_eq!(transport.count(), 3);
	assert!(transport
		.nodes()
		.iter()
		.all(|node| *node == AccountId::from_num(4)));
	// 250ms then 500ms on the call's own schedule
	assert!(start.elapsed() >= Duration::from_millis(750));

	let node = client.network().node(&AccountId::from_num(4)).await.unwrap();
	assert_eq!(node.failure_count(), 0);
	assert!(node.is_healthy());
}

#[tokio::test(start_paused = true)]
async fn test_receipt_not_found_is_retried() {
	let transport = ScriptedTransport::new([query_precheck("RECEIPT_NOT_FOUND"), receipt("SUCCESS")]);
	let client = test_client(transport.clone(), &[3]);

	let receipt = response_from(3).get_receipt(&client).await.unwrap();

	assert_eq!(receipt.status, Status::Success);
	assert_eq!(transport.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_receipt_request_shape() {
	let transport = ScriptedTransport::new([receipt("SUCCESS")]);
	let client = test_client(transport.clone(), &[3]);
	let response = response_from(3);

	response.get_receipt(&client).await.unwrap();

	let dispatch = &transport.dispatches()[0];
	assert_eq!(dispatch.method, "CryptoService/getTransactionReceipts");
	assert_eq!(dispatch.params["header"]["responseType"], "ANSWER_ONLY");
	assert_eq!(
		dispatch.params["transactionGetReceipt"]["transactionID"],
		serde_json::to_value(&response.transaction_id).unwrap()
	);
}

#[tokio::test(start_paused = true)]
async fn test_failed_outcome_is_returned_or_raised() {
	let transport = ScriptedTransport::new([receipt("INVALID_SIGNATURE"), receipt("INVALID_SIGNATURE")]);
	let client = test_client(transport.clone(), &[3]);
	let mut response = response_from(3);

	let receipt = response.get_receipt(&client).await.unwrap();
	assert_eq!(receipt.status, Status::InvalidSignature);

	response.set_validate_status(true);
	match response.get_receipt(&client).await.unwrap_err() {
		ClientError::ReceiptStatus {
			status,
			transaction_id,
			..
		} => {
			assert_eq!(status, Status::InvalidSignature);
			assert_eq!(transaction_id, response.transaction_id);
		}
		other => panic!("expected a receipt status error, got {other}"),
	}
}

#[tokio::test(start_paused = true)]
async fn test_receipt_polling_is_bounded() {
	let transport = ScriptedTransport::new((0..5).map(|_| receipt("UNKNOWN")));
	let client = test_client(transport.clone(), &[3]);

	let mut query = TransactionReceiptQuery::new();
	query
		.set_transaction_id(TransactionId::generate(operator_id()))
		.set_node_account_ids(node_ids(&[3]))
		.unwrap()
		.set_max_attempts(3);

	let error = query.execute(&client).await.unwrap_err();
	assert!(matches!(
		error,
		ClientError::AttemptsExhausted { attempts: 3, .. }
	));
	assert_eq!(transport.count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_record_waits_for_receipt() {
	let transport = ScriptedTransport::new([
		receipt("UNKNOWN"),
		receipt("SUCCESS"),
		Ok(json!({
			"header": {"nodeTransactionPrecheckCode": "OK"},
			"transactionRecord": {
				"receipt": {"status": "SUCCESS"},
				"transactionFee": 81234,
				"prngNumber": 42
			}
		})),
	]);
	let client = test_client(transport.clone(), &[3]);

	let record = response_from(3).get_record(&client).await.unwrap();

	assert_eq!(record.prng_number, Some(42));
	let methods: Vec<String> = transport
		.dispatches()
		.into_iter()
		.map(|dispatch| dispatch.method)
		.collect();
	assert_eq!(
		methods,
		[
			"CryptoService/getTransactionReceipts",
			"CryptoService/getTransactionReceipts",
			"CryptoService/getTxRecordByTxID"
		]
	);
}

#[tokio::test(start_paused = true)]
async fn test_submit_then_poll() {
	let transport = ScriptedTransport::new([precheck("OK"), receipt("UNKNOWN"), receipt("SUCCESS")]);
	let client = test_client(transport.clone(), &[3, 4]);

	let mut transaction = PrngTransaction::new();
	transaction
		.set_node_account_ids(node_ids(&[3, 4]))
		.unwrap();
	let response = transaction.execute(&client).await.unwrap();
	let receipt = response.get_receipt(&client).await.unwrap();

	assert_eq!(receipt.status, Status::Success);
	assert!(transport
		.nodes()
		.iter()
		.all(|node| *node == response.node_id));
}
