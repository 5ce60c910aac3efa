//! Core ledger value types.
//!
//! - `entity_id`: `shard.realm.num` identifiers
//! - `ledger_id`: ledger identity and entity checksums
//! - `transaction_id`: payer plus valid start
//! - `status`: node response codes
//! - `hbar`, `custom_fee`: amounts and fee limits
//! - `node_address`: address book entries
//! - `receipt`: receipts and records

mod custom_fee;
mod entity_id;
mod hbar;
mod ledger_id;
mod node_address;
mod receipt;
mod status;
mod transaction_id;

pub use custom_fee::{CustomFeeLimit, CustomFixedFee};
pub use entity_id::{AccountId, ContractId, FileId, TokenId, TopicId};
pub use hbar::Hbar;
pub use ledger_id::{entity_checksum, parse_entity_id, validate_entity_checksum, LedgerId};
pub use node_address::{Endpoint, NodeAddress, NodeAddressBook};
pub use receipt::{TransactionReceipt, TransactionRecord};
pub use status::Status;
pub use transaction_id::{Timestamp, TransactionId};
