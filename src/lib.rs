//! Client SDK for Hiero (Hedera) consensus networks.
//!
//! This library turns user-built transactions and queries into signed,
//! node-addressed requests, dispatches them across a changing set of nodes
//! with bounded retries, and polls for the outcome of submitted transactions.
//! It includes:
//!
//! - Node selection with per-node health and backoff tracking
//! - A shared execute-with-retry state machine for every request kind
//! - The transaction lifecycle: freeze, multi-signature, bytes round trip
//! - Receipt and record polling, and address book updates from a mirror
//!
//! # Module Structure
//!
//! - `models`: Identifiers, statuses, keys and configuration
//! - `services`: Client, networks, transport, execution, transactions and queries
//! - `utils`: Logging, HTTP helpers, constants and macros

pub mod models;
pub mod services;
pub mod utils;

pub use services::{
	client::{Client, ClientBuilder, ClientSettings},
	execute::{CancelReason, ClientError},
	query::{AddressBookQuery, TransactionReceiptQuery, TransactionRecordQuery},
	transaction::{
		AnyTransaction, PrngTransaction, SystemDeleteTransaction, TopicCreateTransaction,
		Transaction, TransactionResponse,
	},
};
