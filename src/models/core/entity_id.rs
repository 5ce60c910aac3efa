//! Ledger entity identifiers.

use crate::impl_entity_id;

impl_entity_id!(
	/// Account identity. Used for payers, node identities and fee collectors.
	AccountId,
	"AccountId"
);

impl_entity_id!(
	/// Token identity, used as a fee denomination.
	TokenId,
	"TokenId"
);

impl_entity_id!(TopicId, "TopicId");

impl_entity_id!(FileId, "FileId");

impl_entity_id!(ContractId, "ContractId");
