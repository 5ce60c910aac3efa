//! Client configuration file.
//!
//! ```json
//! {
//!   "network": {"0.testnet.hedera.com:50211": "0.0.3"},
//!   "mirrorNetwork": "testnet",
//!   "operator": {
//!     "accountId": "0.0.1001",
//!     "privateKey": {"type": "environment", "value": "OPERATOR_KEY"}
//!   },
//!   "maxAttempts": 5
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, collections::HashMap, path::Path};

use crate::models::{
	config::{error::ConfigError, ConfigLoader},
	AccountId, Endpoint, LedgerId, SecretString, SecretValue,
};

const NAMED_NETWORKS: [&str; 3] = ["mainnet", "testnet", "previewnet"];

/// Either a well-known network name or an explicit `host:port -> account` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkSpec {
	Named(String),
	Nodes(BTreeMap<String, AccountId>),
}

/// Either a well-known network name or a list of `host:port` mirror addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MirrorNetworkSpec {
	Named(String),
	Addresses(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OperatorConfig {
	pub account_id: AccountId,
	pub private_key: SecretValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientConfig {
	pub network: NetworkSpec,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mirror_network: Option<MirrorNetworkSpec>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub operator: Option<OperatorConfig>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ledger_id: Option<LedgerId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_attempts: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_backoff_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_backoff_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request_timeout_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub grpc_deadline_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_nodes_per_transaction: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_validate_checksums: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transport_security: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_regenerate_transaction_id: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_max_transaction_fee_tinybars: Option<i64>,
}

impl ClientConfig {
	/// Parses a configuration from a JSON string. Does not validate.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}

	/// A config for a named network with everything else defaulted.
	pub fn named(network: &str) -> Self {
		Self {
			network: NetworkSpec::Named(network.to_string()),
			mirror_network: Some(MirrorNetworkSpec::Named(network.to_string())),
			operator: None,
			ledger_id: None,
			max_attempts: None,
			min_backoff_ms: None,
			max_backoff_ms: None,
			request_timeout_ms: None,
			grpc_deadline_ms: None,
			max_nodes_per_transaction: None,
			auto_validate_checksums: None,
			transport_security: None,
			default_regenerate_transaction_id: None,
			default_max_transaction_fee_tinybars: None,
		}
	}

	/// Ledger id implied by the config: explicit, else derived from a named network.
	pub fn resolved_ledger_id(&self) -> Option<LedgerId> {
		if let Some(ledger_id) = &self.ledger_id {
			return Some(ledger_id.clone());
		}
		match &self.network {
			NetworkSpec::Named(name) => name.parse().ok(),
			NetworkSpec::Nodes(_) => None,
		}
	}

	fn validate_named(kind: &str, name: &str) -> Result<(), ConfigError> {
		if NAMED_NETWORKS.contains(&name) {
			Ok(())
		} else {
			Err(ConfigError::validation_error(
				format!("unknown {} '{}'", kind, name),
				None,
				Some(HashMap::from([(
					"expected".to_string(),
					NAMED_NETWORKS.join("|"),
				)])),
			))
		}
	}
}

impl ConfigLoader for ClientConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				format!("{} is not a JSON file", path.display()),
				None,
				None,
			));
		}
		let contents = std::fs::read_to_string(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read {}", path.display()),
				Some(Box::new(e)),
				None,
			)
		})?;
		let config = Self::from_json_str(&contents)?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		match &self.network {
			NetworkSpec::Named(name) => Self::validate_named("network", name)?,
			NetworkSpec::Nodes(nodes) => {
				if nodes.is_empty() {
					return Err(ConfigError::validation_error(
						"network must contain at least one node",
						None,
						None,
					));
				}
				for address in nodes.keys() {
					Endpoint::parse(address)?;
				}
			}
		}

		match &self.mirror_network {
			Some(MirrorNetworkSpec::Named(name)) => {
				Self::validate_named("mirror network", name)?
			}
			Some(MirrorNetworkSpec::Addresses(addresses)) => {
				if addresses.is_empty() {
					return Err(ConfigError::validation_error(
						"mirrorNetwork must contain at least one address",
						None,
						None,
					));
				}
				for address in addresses {
					Endpoint::parse(address)?;
				}
			}
			None => {}
		}

		if let Some(operator) = &self.operator {
			if operator.private_key.is_empty() {
				return Err(ConfigError::validation_error(
					"operator privateKey must not be empty",
					None,
					None,
				));
			}
		}

		if self.max_attempts == Some(0) {
			return Err(ConfigError::validation_error(
				"maxAttempts must be at least 1",
				None,
				None,
			));
		}

		if let (Some(min), Some(max)) = (self.min_backoff_ms, self.max_backoff_ms) {
			if min > max {
				return Err(ConfigError::validation_error(
					"minBackoff exceeds maxBackoff",
					None,
					Some(HashMap::from([
						("minBackoffMs".to_string(), min.to_string()),
						("maxBackoffMs".to_string(), max.to_string()),
					])),
				));
			}
		}

		if self.max_nodes_per_transaction == Some(0) {
			return Err(ConfigError::validation_error(
				"maxNodesPerTransaction must be at least 1",
				None,
				None,
			));
		}

		Ok(())
	}

	fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		let mut resolved = self.clone();
		if let Some(operator) = resolved.operator.as_mut() {
			let secret = operator.private_key.resolve().map_err(|e| {
				ConfigError::validation_error(
					format!(
						"failed to resolve private key for operator {}",
						operator.account_id
					),
					Some(e as Box<dyn std::error::Error + Send + Sync>),
					None,
				)
			})?;
			operator.private_key = SecretValue::Plain(SecretString::new(secret.as_str().to_string()));
		}
		Ok(resolved)
	}
}
