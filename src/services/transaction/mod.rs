//! Transactions.
//!
//! [`Transaction`] carries the lifecycle shared by every operation; the
//! operation kinds plug in through [`TransactionData`].

mod any;
mod body;
mod data;
mod prng;
mod response;
mod system_delete;
mod topic_create;
#[allow(clippy::module_inception)]
mod transaction;

pub use any::AnyTransaction;
pub use body::{SignatureMap, SignaturePair, SignedTransaction, TransactionBody, TransactionList};
pub use data::TransactionData;
pub use prng::{PrngTransaction, PrngTransactionData};
pub use response::TransactionResponse;
pub use system_delete::{SystemDeleteTransaction, SystemDeleteTransactionData};
pub use topic_create::{TopicCreateTransaction, TopicCreateTransactionData};
pub use transaction::{Transaction, TransactionState};
