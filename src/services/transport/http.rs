//! HTTP transport for consensus nodes.
//!
//! Requests are POSTed as JSON-RPC envelopes over the node's lazily created
//! channel. No retries happen here: connection failures are classified as
//! retryable or not and handed back to the execute loop.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use sha2::{Digest, Sha384};
use std::collections::HashMap;

use crate::services::{
	network::Node,
	transport::{
		build_request_envelope, is_transient_failure, parse_response_envelope, NodeTransport,
		RpcMethod, TransportError,
	},
};

/// Default [`NodeTransport`] used by clients built from configuration.
#[derive(Clone, Debug)]
pub struct HttpNodeTransport {
	verify_certificates: bool,
}

impl Default for HttpNodeTransport {
	fn default() -> Self {
		Self::new(true)
	}
}

impl HttpNodeTransport {
	/// `verify_certificates` pins TLS channels to the certificate hash from
	/// the node's address book entry, when it has one.
	pub fn new(verify_certificates: bool) -> Self {
		Self {
			verify_certificates,
		}
	}

	fn verify_peer_certificate(
		&self,
		node: &Node,
		response: &reqwest::Response,
	) -> Result<(), TransportError> {
		let Some(expected) = node.cert_hash().filter(|_| self.verify_certificates) else {
			return Ok(());
		};
		let Some(certificate) = response
			.extensions()
			.get::<reqwest::tls::TlsInfo>()
			.and_then(|info| info.peer_certificate())
		else {
			return Ok(());
		};

		if certificate_matches(expected, certificate) {
			Ok(())
		} else {
			Err(TransportError::network(
				format!(
					"certificate presented by node {} does not match its address book entry",
					node.account_id()
				),
				true,
				None,
				Some(HashMap::from([(
					"expected".to_string(),
					expected.to_string(),
				)])),
			))
		}
	}
}

/// Compares a DER certificate against a pinned SHA-384 hex digest. The digest
/// may have been taken over either the PEM text or the raw DER.
pub(crate) fn certificate_matches(expected: &str, der: &[u8]) -> bool {
	let expected = expected.trim_start_matches("0x");
	let pem_digest = hex::encode(Sha384::digest(der_to_pem(der).as_bytes()));
	let der_digest = hex::encode(Sha384::digest(der));
	pem_digest.eq_ignore_ascii_case(expected) || der_digest.eq_ignore_ascii_case(expected)
}

fn der_to_pem(der: &[u8]) -> String {
	let encoded = STANDARD.encode(der);
	let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
	for line in encoded.as_bytes().chunks(64) {
		pem.push_str(&String::from_utf8_lossy(line));
		pem.push('\n');
	}
	pem.push_str("-----END CERTIFICATE-----\n");
	pem
}

#[async_trait]
impl NodeTransport for HttpNodeTransport {
	async fn send_request(
		&self,
		node: &Node,
		method: RpcMethod,
		params: Value,
	) -> Result<Value, TransportError> {
		let channel = node.channel()?;
		let url = channel.url.to_string();
		let envelope = build_request_envelope(method, params);

		let response = channel
			.client
			.post(channel.url.clone())
			.header("Content-Type", "application/json")
			.json(&envelope)
			.send()
			.await
			.map_err(|e| {
				let retryable = is_transient_failure(&e);
				TransportError::network(
					format!("failed to send {} to node {}", method, node.account_id()),
					retryable,
					Some(Box::new(e)),
					Some(HashMap::from([("url".to_string(), url.clone())])),
				)
			})?;

		self.verify_peer_certificate(node, &response)?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(TransportError::http(status, url, body, None, None));
		}

		let body: Value = response.json().await.map_err(|e| {
			TransportError::response_parse(
				format!("node {} returned a non-JSON body", node.account_id()),
				Some(Box::new(e)),
				None,
			)
		})?;

		parse_response_envelope(&url, body)
	}
}
