//! Response codes returned by consensus nodes.
//!
//! Codes travel by name (`"BUSY"`, `"SUCCESS"`, ...). Names this crate does
//! not know decode to [`Status::Unrecognized`] instead of failing, so a node
//! running a newer protocol version cannot break response parsing.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
	Ok,
	InvalidTransaction,
	PayerAccountNotFound,
	InvalidNodeAccount,
	TransactionExpired,
	InvalidTransactionStart,
	InvalidTransactionDuration,
	InvalidSignature,
	MemoTooLong,
	InsufficientTxFee,
	InsufficientPayerBalance,
	DuplicateTransaction,
	Busy,
	NotSupported,
	InvalidFileId,
	InvalidAccountId,
	InvalidContractId,
	InvalidTransactionId,
	ReceiptNotFound,
	RecordNotFound,
	Unknown,
	Success,
	FailInvalid,
	FailFee,
	FailBalance,
	KeyRequired,
	BadEncoding,
	InsufficientAccountBalance,
	ContractRevertExecuted,
	ContractExecutionException,
	InvalidReceivingNodeAccount,
	MissingQueryHeader,
	InvalidKeyEncoding,
	InvalidQueryHeader,
	InvalidFeeSubmitted,
	InvalidPayerSignature,
	KeyNotProvided,
	InvalidExpirationTime,
	EmptyTransactionBody,
	InvalidTransactionBody,
	PlatformTransactionNotCreated,
	PlatformNotActive,
	TransactionOversize,
	TransactionTooManyLayers,
	AuthorizationFailed,
	EntityNotAllowedToDelete,
	InvalidTopicId,
	InvalidAutorenewAccount,
	AutorenewAccountNotAllowed,
	AutorenewDurationNotInRange,
	InvalidRenewalPeriod,
	InvalidChunkNumber,
	AccountIdDoesNotExist,
	InvalidTokenId,
	MaxCustomFeeLimitExceeded,
	NoValidMaxCustomFee,
	InvalidMaxCustomFees,
	DuplicateDenominationInMaxCustomFeeList,
	MaxCustomFeesIsNotSupported,
	InvalidPrngRange,
	/// A name this version of the crate does not know.
	Unrecognized,
}

impl Status {
	/// Parses a wire name, mapping unknown names to [`Status::Unrecognized`].
	pub fn from_name(name: &str) -> Self {
		Self::from_str(name).unwrap_or(Self::Unrecognized)
	}
}

impl Serialize for Status {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Status {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Ok(Self::from_name(&raw))
	}
}
