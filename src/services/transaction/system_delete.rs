use serde::{Deserialize, Serialize};

use crate::{
	models::{ConfigError, ContractId, FileId, LedgerId, Timestamp},
	services::{
		execute::ClientError,
		transaction::{Transaction, TransactionData},
		transport::RpcMethod,
	},
};

/// Deletes a file or a contract with administrative privileges, to be
/// purged at `expiration_time`. Exactly one of the two targets is set.
pub type SystemDeleteTransaction = Transaction<SystemDeleteTransactionData>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDeleteTransactionData {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	file_id: Option<FileId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	contract_id: Option<ContractId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	expiration_time: Option<Timestamp>,
}

impl TransactionData for SystemDeleteTransactionData {
	const KIND: &'static str = "systemDelete";

	fn method(&self) -> RpcMethod {
		if self.contract_id.is_some() {
			RpcMethod::new("SmartContractService", "systemDelete")
		} else {
			RpcMethod::new("FileService", "systemDelete")
		}
	}

	fn validate(&self) -> Result<(), ClientError> {
		match (&self.file_id, &self.contract_id) {
			(Some(_), None) | (None, Some(_)) => Ok(()),
			(None, None) => Err(ClientError::configuration(
				"system delete needs a file id or a contract id",
				None,
				None,
			)),
			(Some(_), Some(_)) => Err(ClientError::configuration(
				"system delete targets either a file or a contract, not both",
				None,
				None,
			)),
		}
	}

	fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), ConfigError> {
		if let Some(file_id) = &self.file_id {
			file_id.validate_checksum(ledger_id)?;
		}
		if let Some(contract_id) = &self.contract_id {
			contract_id.validate_checksum(ledger_id)?;
		}
		Ok(())
	}
}

impl Transaction<SystemDeleteTransactionData> {
	pub fn file_id(&self) -> Option<&FileId> {
		self.data().file_id.as_ref()
	}

	/// Targets a file, clearing any contract target.
	pub fn set_file_id(&mut self, file_id: FileId) -> Result<&mut Self, ClientError> {
		let data = self.data_mut()?;
		data.file_id = Some(file_id);
		data.contract_id = None;
		Ok(self)
	}

	pub fn contract_id(&self) -> Option<&ContractId> {
		self.data().contract_id.as_ref()
	}

	/// Targets a contract, clearing any file target.
	pub fn set_contract_id(&mut self, contract_id: ContractId) -> Result<&mut Self, ClientError> {
		let data = self.data_mut()?;
		data.contract_id = Some(contract_id);
		data.file_id = None;
		Ok(self)
	}

	pub fn expiration_time(&self) -> Option<Timestamp> {
		self.data().expiration_time
	}

	pub fn set_expiration_time(&mut self, expiration: Timestamp) -> Result<&mut Self, ClientError> {
		self.data_mut()?.expiration_time = Some(expiration);
		Ok(self)
	}
}
