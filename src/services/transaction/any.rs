use serde::Deserialize;

use crate::services::{
	client::Client,
	execute::ClientError,
	transaction::{
		body::TransactionList, PrngTransaction, PrngTransactionData, SystemDeleteTransaction,
		SystemDeleteTransactionData, TopicCreateTransaction, TopicCreateTransactionData,
		TransactionData, TransactionResponse,
	},
};
use crate::models::TransactionId;

/// A transaction restored from bytes whose operation kind is only known at
/// runtime.
#[derive(Debug, Clone)]
pub enum AnyTransaction {
	Prng(PrngTransaction),
	TopicCreate(TopicCreateTransaction),
	SystemDelete(SystemDeleteTransaction),
}

#[derive(Deserialize)]
struct BodyKind {
	kind: String,
}

macro_rules! dispatch {
	($self:expr, $transaction:ident => $body:expr) => {
		match $self {
			AnyTransaction::Prng($transaction) => $body,
			AnyTransaction::TopicCreate($transaction) => $body,
			AnyTransaction::SystemDelete($transaction) => $body,
		}
	};
}

impl AnyTransaction {
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClientError> {
		let list: TransactionList = serde_json::from_slice(bytes).map_err(|e| {
			ClientError::decode("malformed transaction list", Some(Box::new(e)))
		})?;
		let first = list
			.transactions
			.first()
			.ok_or_else(|| ClientError::decode("transaction list is empty", None))?;
		let BodyKind { kind } = serde_json::from_slice(&first.body_bytes).map_err(|e| {
			ClientError::decode("transaction body has no kind", Some(Box::new(e)))
		})?;

		match kind.as_str() {
			kind if kind == PrngTransactionData::KIND => {
				Ok(Self::Prng(PrngTransaction::from_bytes(bytes)?))
			}
			kind if kind == TopicCreateTransactionData::KIND => {
				Ok(Self::TopicCreate(TopicCreateTransaction::from_bytes(bytes)?))
			}
			kind if kind == SystemDeleteTransactionData::KIND => {
				Ok(Self::SystemDelete(SystemDeleteTransaction::from_bytes(bytes)?))
			}
			other => Err(ClientError::decode(
				format!("unsupported transaction kind '{}'", other),
				None,
			)),
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::Prng(_) => PrngTransactionData::KIND,
			Self::TopicCreate(_) => TopicCreateTransactionData::KIND,
			Self::SystemDelete(_) => SystemDeleteTransactionData::KIND,
		}
	}

	pub fn transaction_id(&self) -> Option<TransactionId> {
		dispatch!(self, transaction => transaction.transaction_id())
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, ClientError> {
		dispatch!(self, transaction => transaction.to_bytes())
	}

	pub async fn execute(&mut self, client: &Client) -> Result<TransactionResponse, ClientError> {
		dispatch!(self, transaction => transaction.execute(client).await)
	}
}
