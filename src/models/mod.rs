//! Domain models and data structures.
//!
//! - `config`: Client configuration loading and validation
//! - `core`: Ledger value types (ids, statuses, amounts, receipts, address book)
//! - `security`: Keys, signers and secrets

mod config;
mod core;
mod security;

pub use config::{
	ClientConfig, ConfigError, ConfigLoader, MirrorNetworkSpec, NetworkSpec, OperatorConfig,
};

pub use core::{
	entity_checksum, parse_entity_id, validate_entity_checksum, AccountId, ContractId,
	CustomFeeLimit, CustomFixedFee, Endpoint, FileId, Hbar, LedgerId, NodeAddress,
	NodeAddressBook, Status, Timestamp, TokenId, TopicId, TransactionId, TransactionReceipt,
	TransactionRecord,
};

pub use security::{
	FnSigner, PrivateKey, PublicKey, SecretString, SecretValue, SecurityError, SecurityResult,
	Signer,
};
