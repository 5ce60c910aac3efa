use mockito::Matcher;
use serde_json::json;

use crate::integration::mocks::{node_ids, test_client, ScriptedTransport};
use hiero_sdk::{
	models::{AccountId, FileId},
	services::{execute::ClientError, query::AddressBookQuery},
};

fn mirror_node(num: u64, host: &str) -> serde_json::Value {
	json!({
		"node_id": num - 3,
		"node_account_id": format!("0.0.{}", num),
		"node_cert_hash": "0x",
		"description": format!("node {}", num),
		"service_endpoints": [
			{"ip_address_v4": host, "domain_name": "", "port": 50211}
		]
	})
}

#[tokio::test]
async fn test_address_book_follows_pagination() {
	let mut server = mockito::Server::new_async().await;
	let first = server
		.mock("GET", "/api/v1/network/nodes")
		.match_query(Matcher::UrlEncoded("file.id".into(), "0.0.102".into()))
		.with_status(200)
		.with_body(
			json!({
				"nodes": [mirror_node(3, "10.1.0.3")],
				"links": {"next": "/api/v1/network/nodes?node.id=gt:0&limit=1"}
			})
			.to_string(),
		)
		.expect(2)
		.create_async()
		.await;
	let second = server
		.mock("GET", "/api/v1/network/nodes")
		.match_query(Matcher::UrlEncoded("node.id".into(), "gt:0".into()))
		.with_status(200)
		.with_body(
			json!({
				"nodes": [mirror_node(4, "10.1.0.4")],
				"links": {"next": null}
			})
			.to_string(),
		)
		.expect(2)
		.create_async()
		.await;

	let client = test_client(ScriptedTransport::new([]), &[3, 5]);
	client.set_mirror_network(&[server.url()]).unwrap();

	let book = AddressBookQuery::new().execute(&client).await.unwrap();
	assert_eq!(book.node_addresses.len(), 2);
	assert_eq!(
		book.node_addresses[1].account_id,
		Some(AccountId::from_num(4))
	);

	client.update_network_from_address_book().await.unwrap();
	assert_eq!(client.network().node_account_ids().await, node_ids(&[3, 4]));
	let updated = client
		.network()
		.node(&AccountId::from_num(3))
		.await
		.unwrap();
	assert_eq!(updated.authority(), "10.1.0.3:50211");

	first.assert_async().await;
	second.assert_async().await;
}

#[tokio::test]
async fn test_repeated_page_link_stops_paging() {
	let mut server = mockito::Server::new_async().await;
	let looping = server
		.mock("GET", "/api/v1/network/nodes")
		.match_query(Matcher::Any)
		.with_status(200)
		.with_body(
			json!({
				"nodes": [mirror_node(3, "10.1.0.3")],
				"links": {"next": "/api/v1/network/nodes?file.id=0.0.102&limit=25"}
			})
			.to_string(),
		)
		.expect(1)
		.create_async()
		.await;

	let client = test_client(ScriptedTransport::new([]), &[3]);
	client.set_mirror_network(&[server.url()]).unwrap();

	let book = AddressBookQuery::new().execute(&client).await.unwrap();
	assert_eq!(book.node_addresses.len(), 1);
	looping.assert_async().await;
}

#[tokio::test]
async fn test_custom_file_and_page_size() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", "/api/v1/network/nodes")
		.match_query(Matcher::AllOf(vec![
			Matcher::UrlEncoded("file.id".into(), "0.0.101".into()),
			Matcher::UrlEncoded("limit".into(), "5".into()),
		]))
		.with_status(200)
		.with_body(r#"{"nodes": [], "links": {"next": null}}"#)
		.create_async()
		.await;

	let client = test_client(ScriptedTransport::new([]), &[3]);
	client.set_mirror_network(&[server.url()]).unwrap();

	let mut query = AddressBookQuery::new();
	query.set_file_id(FileId::from_num(101)).set_limit(5);
	let book = query.execute(&client).await.unwrap();

	assert!(book.node_addresses.is_empty());
	mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_address_book_does_not_clear_network() {
	let mut server = mockito::Server::new_async().await;
	let _mock = server
		.mock("GET", "/api/v1/network/nodes")
		.match_query(Matcher::Any)
		.with_status(200)
		.with_body(r#"{"nodes": [], "links": {"next": null}}"#)
		.create_async()
		.await;

	let client = test_client(ScriptedTransport::new([]), &[3, 4]);
	client.set_mirror_network(&[server.url()]).unwrap();

	assert!(client.update_network_from_address_book().await.is_err());
	assert_eq!(client.network().len().await, 2);
}

#[tokio::test]
async fn test_address_book_requires_mirror() {
	let client = test_client(ScriptedTransport::new([]), &[3]);

	let error = AddressBookQuery::new().execute(&client).await.unwrap_err();
	assert!(matches!(error, ClientError::Configuration(_)));
}
