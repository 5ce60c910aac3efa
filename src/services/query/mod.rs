//! Queries.
//!
//! - `query`: the [`Query`] wrapper and the [`QueryData`] seam
//! - `receipt` / `record`: polling for the outcome of a transaction
//! - `address_book`: the node address book, read from the mirror network

mod address_book;
#[allow(clippy::module_inception)]
mod query;
mod receipt;
mod record;

pub use address_book::AddressBookQuery;
pub use query::{Query, QueryData};
pub use receipt::{TransactionReceiptQuery, TransactionReceiptQueryData};
pub use record::{TransactionRecordQuery, TransactionRecordQueryData};
