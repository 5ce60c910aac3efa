use serde_json::json;
use std::{io::Write, time::Duration};
use tempfile::Builder;

use hiero_sdk::{
	models::{AccountId, Hbar, LedgerId, PrivateKey},
	services::{client::Client, execute::ClientError},
};

fn write_config(contents: &serde_json::Value) -> tempfile::NamedTempFile {
	let mut file = Builder::new().suffix(".json").tempfile().unwrap();
	file.write_all(contents.to_string().as_bytes()).unwrap();
	file
}

#[tokio::test]
async fn test_client_from_config_file() {
	let key = PrivateKey::generate_ed25519();
	let file = write_config(&json!({
		"network": {
			"127.0.0.1:50211": "0.0.3",
			"127.0.0.2:50211": "0.0.4",
			"127.0.0.3:50211": "0.0.4"
		},
		"mirrorNetwork": ["127.0.0.1:5551"],
		"ledgerId": "testnet",
		"operator": {
			"accountId": "0.0.1001",
			"privateKey": {"type": "plain", "value": key.to_string_der()}
		},
		"maxAttempts": 4,
		"minBackoffMs": 100,
		"maxBackoffMs": 1000,
		"grpcDeadlineMs": 3000,
		"maxNodesPerTransaction": 1,
		"defaultMaxTransactionFeeTinybars": 500000000
	}));

	let client = Client::from_config_file(file.path()).unwrap();

	assert_eq!(
		client.network().node_account_ids().await,
		vec![AccountId::from_num(3), AccountId::from_num(4)]
	);
	let four = client.network().node(&AccountId::from_num(4)).await.unwrap();
	assert_eq!(four.endpoints().len(), 2);

	assert_eq!(client.ledger_id(), Some(LedgerId::testnet()));
	assert_eq!(client.operator_account_id(), Some(AccountId::from_num(1001)));
	assert_eq!(client.operator_public_key(), Some(key.public_key()));
	assert!(client.mirror_network().is_some());

	let settings = client.settings();
	assert_eq!(settings.max_attempts, 4);
	assert_eq!(settings.min_backoff, Duration::from_millis(100));
	assert_eq!(settings.max_backoff, Duration::from_secs(1));
	assert_eq!(settings.grpc_deadline, Duration::from_secs(3));
	assert_eq!(settings.default_max_transaction_fee, Some(Hbar::new(5)));
	assert_eq!(client.network().nodes_per_transaction().await, 1);
}

#[tokio::test]
async fn test_operator_key_from_environment() {
	let key = PrivateKey::generate_ed25519();
	std::env::set_var("HIERO_SDK_IT_OPERATOR_KEY", key.to_string_der());
	let file = write_config(&json!({
		"network": "testnet",
		"operator": {
			"accountId": "0.0.1001",
			"privateKey": {"type": "Environment", "value": "HIERO_SDK_IT_OPERATOR_KEY"}
		}
	}));

	let client = Client::from_config_file(file.path()).unwrap();

	assert_eq!(client.operator_public_key(), Some(key.public_key()));
	assert_eq!(client.ledger_id(), Some(LedgerId::testnet()));
	assert!(client.network().len().await > 0);
}

#[tokio::test]
async fn test_missing_environment_secret_is_rejected() {
	let file = write_config(&json!({
		"network": "testnet",
		"operator": {
			"accountId": "0.0.1001",
			"privateKey": {"type": "environment", "value": "HIERO_SDK_IT_UNSET_VARIABLE"}
		}
	}));

	let error = Client::from_config_file(file.path()).unwrap_err();
	assert!(matches!(error, ClientError::Configuration(_)));
}

#[test]
fn test_invalid_configs_are_rejected() {
	let invalid = [
		json!({"network": "moonnet"}),
		json!({"network": {}}),
		json!({"network": "testnet", "maxAttempts": 0}),
		json!({"network": "testnet", "minBackoffMs": 5000, "maxBackoffMs": 10}),
		json!({"network": "testnet", "unknownField": true}),
	];

	for config in invalid {
		let file = write_config(&config);
		assert!(
			Client::from_config_file(file.path()).is_err(),
			"accepted {}",
			config
		);
	}
}

#[test]
fn test_non_json_file_is_rejected() {
	let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
	file.write_all(br#"{"network": "testnet"}"#).unwrap();

	assert!(Client::from_config_file(file.path()).is_err());
}
