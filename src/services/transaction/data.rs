use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

use crate::{
	models::{ConfigError, Hbar, LedgerId},
	services::{execute::ClientError, transport::RpcMethod},
	utils::constants::DEFAULT_MAX_TRANSACTION_FEE,
};

/// The operation-specific part of a transaction.
///
/// The common fields (id, nodes, fee, memo) live on
/// [`Transaction`](super::Transaction); implementors only carry their own
/// fields, the remote procedure they submit to and their validation hooks.
pub trait TransactionData:
	Clone + Default + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
	/// Tag written into every body; `from_bytes` refuses bodies of another kind.
	const KIND: &'static str;

	fn method(&self) -> RpcMethod;

	/// Fee preset when the transaction is constructed. It counts as set by
	/// the caller and so wins over the client's default.
	fn initial_max_transaction_fee() -> Option<Hbar> {
		None
	}

	/// Fee used when neither the transaction nor the client sets one.
	fn default_max_transaction_fee(&self) -> Hbar {
		DEFAULT_MAX_TRANSACTION_FEE
	}

	/// Field checks run at freeze.
	fn validate(&self) -> Result<(), ClientError> {
		Ok(())
	}

	/// Checksum checks on the entity ids this operation references.
	fn validate_checksums(&self, _ledger_id: &LedgerId) -> Result<(), ConfigError> {
		Ok(())
	}
}
