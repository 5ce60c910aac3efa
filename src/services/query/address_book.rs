//! Address book download from the mirror network.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

use crate::{
	models::{AccountId, Endpoint, FileId, NodeAddress, NodeAddressBook},
	services::{client::Client, execute::ClientError},
};

/// File holding the consensus node address book.
const ADDRESS_BOOK_FILE: FileId = FileId::from_num(102);
const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Debug, Deserialize)]
struct MirrorNodesPage {
	#[serde(default)]
	nodes: Vec<MirrorNode>,
	#[serde(default)]
	links: MirrorLinks,
}

#[derive(Debug, Default, Deserialize)]
struct MirrorLinks {
	next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MirrorNode {
	node_id: u64,
	node_account_id: AccountId,
	#[serde(default)]
	node_cert_hash: Option<String>,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	public_key: Option<String>,
	#[serde(default)]
	service_endpoints: Vec<MirrorEndpoint>,
}

#[derive(Debug, Deserialize)]
struct MirrorEndpoint {
	#[serde(default)]
	ip_address_v4: String,
	#[serde(default)]
	domain_name: String,
	port: u16,
}

/// The mirror encodes the hex digest as `0x` + hex of its ASCII characters.
fn decode_cert_hash(raw: &str) -> String {
	let trimmed = raw.strip_prefix("0x").unwrap_or(raw);
	hex::decode(trimmed)
		.ok()
		.and_then(|bytes| String::from_utf8(bytes).ok())
		.unwrap_or_else(|| trimmed.to_string())
}

impl From<MirrorNode> for NodeAddress {
	fn from(node: MirrorNode) -> Self {
		let addresses = node
			.service_endpoints
			.into_iter()
			.filter_map(|endpoint| {
				let domain_name = (!endpoint.domain_name.is_empty()).then_some(endpoint.domain_name);
				let address = if endpoint.ip_address_v4.is_empty() {
					domain_name.clone()?
				} else {
					endpoint.ip_address_v4
				};
				let mut parsed = Endpoint::new(address, endpoint.port);
				parsed.domain_name = domain_name;
				Some(parsed)
			})
			.collect();

		NodeAddress {
			node_id: node.node_id,
			account_id: Some(node.node_account_id),
			cert_hash: node
				.node_cert_hash
				.as_deref()
				.map(decode_cert_hash)
				.unwrap_or_default(),
			addresses,
			description: node.description.unwrap_or_default(),
			public_key: node.public_key.unwrap_or_default(),
		}
	}
}

/// Reads the current address book from the mirror network, following
/// pagination links until the last page.
#[derive(Debug, Clone)]
pub struct AddressBookQuery {
	file_id: FileId,
	limit: Option<u32>,
}

impl Default for AddressBookQuery {
	fn default() -> Self {
		Self::new()
	}
}

impl AddressBookQuery {
	pub fn new() -> Self {
		Self {
			file_id: ADDRESS_BOOK_FILE,
			limit: None,
		}
	}

	pub fn file_id(&self) -> &FileId {
		&self.file_id
	}

	pub fn set_file_id(&mut self, file_id: FileId) -> &mut Self {
		self.file_id = file_id;
		self
	}

	pub fn limit(&self) -> Option<u32> {
		self.limit
	}

	/// Page size of each mirror request.
	pub fn set_limit(&mut self, limit: u32) -> &mut Self {
		self.limit = Some(limit);
		self
	}

	pub async fn execute(&self, client: &Client) -> Result<NodeAddressBook, ClientError> {
		client.ensure_open()?;
		let mirror = client.mirror_network().ok_or_else(|| {
			ClientError::configuration("the client has no mirror network", None, None)
		})?;

		let mut next = Some(format!(
			"/api/v1/network/nodes?file.id={}&limit={}",
			self.file_id,
			self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
		));
		let mut visited = HashSet::new();
		let mut book = NodeAddressBook::default();

		while let Some(path) = next.take() {
			if !visited.insert(path.clone()) {
				debug!(path = %path, "mirror repeated a page link, stopping");
				break;
			}

			let body = mirror
				.get_json(&path)
				.await
				.with_context(|| format!("failed to fetch address book page {}", path))?;
			let page: MirrorNodesPage = serde_json::from_value(body)
				.map_err(|e| ClientError::decode("malformed address book page", Some(Box::new(e))))?;

			book.node_addresses
				.extend(page.nodes.into_iter().map(NodeAddress::from));
			next = page.links.next.filter(|link| !link.is_empty());
		}

		debug!(nodes = book.node_addresses.len(), "fetched address book");
		Ok(book)
	}
}
