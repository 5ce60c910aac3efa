use std::{collections::HashSet, sync::Arc};

use crate::integration::mocks::{node_ids, test_network};
use hiero_sdk::models::AccountId;

#[tokio::test(start_paused = true)]
async fn test_rotation_spreads_load() {
	let network = test_network(&[3, 4, 5]);
	let mut picked = Vec::new();

	for _ in 0..3 {
		let node = network.select_node(None, &HashSet::new()).await.unwrap();
		node.mark_used();
		tokio::time::advance(std::time::Duration::from_millis(1)).await;
		picked.push(node.account_id().clone());
	}

	assert_eq!(picked, node_ids(&[3, 4, 5]));
}

#[tokio::test(start_paused = true)]
async fn test_restriction_ignores_unknown_nodes() {
	let network = test_network(&[3, 4]);

	let node = network
		.select_node(Some(&node_ids(&[99, 4])), &HashSet::new())
		.await
		.unwrap();
	assert_eq!(node.account_id(), &AccountId::from_num(4));

	assert!(network
		.select_node(Some(&node_ids(&[98, 99])), &HashSet::new())
		.await
		.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_backing_off_nodes_are_skipped() {
	let network = test_network(&[3, 4, 5]);
	network
		.node(&AccountId::from_num(3))
		.await
		.unwrap()
		.record_failure();

	let node = network.select_node(None, &HashSet::new()).await.unwrap();
	assert_eq!(node.account_id(), &AccountId::from_num(4));
}

#[tokio::test(start_paused = true)]
async fn test_all_backing_off_picks_least_recently_failed() {
	let network = test_network(&[3, 4]);
	let four = network.node(&AccountId::from_num(4)).await.unwrap();
	let three = network.node(&AccountId::from_num(3)).await.unwrap();

	four.record_failure();
	tokio::time::advance(std::time::Duration::from_millis(10)).await;
	three.record_failure();

	let node = network.select_node(None, &HashSet::new()).await.unwrap();
	assert_eq!(node.account_id(), &AccountId::from_num(4));
}

#[tokio::test(start_paused = true)]
async fn test_nodes_are_readmitted_after_backoff() {
	let network = test_network(&[3]);
	let node = network.node(&AccountId::from_num(3)).await.unwrap();

	node.record_failure();
	assert!(!node.is_healthy());

	tokio::time::advance(node.current_backoff()).await;
	assert!(node.is_healthy());
}

#[tokio::test(start_paused = true)]
async fn test_nodes_per_transaction() {
	let network = test_network(&[3, 4, 5, 6, 7, 8, 9, 10, 11]);
	assert_eq!(network.nodes_per_transaction().await, 3);

	network.set_max_nodes_per_transaction(Some(2));
	assert_eq!(network.nodes_per_transaction().await, 2);

	let small = test_network(&[3]);
	assert_eq!(small.nodes_per_transaction().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_select_nodes_returns_distinct_healthy_nodes() {
	let network = test_network(&[3, 4, 5, 6]);
	network
		.node(&AccountId::from_num(5))
		.await
		.unwrap()
		.record_failure();

	let nodes = network.select_nodes(3).await.unwrap();
	let ids: HashSet<AccountId> = nodes.iter().map(|node| node.account_id().clone()).collect();

	assert_eq!(ids.len(), 3);
	assert!(!ids.contains(&AccountId::from_num(5)));
}

#[tokio::test(start_paused = true)]
async fn test_reconciliation_keeps_unchanged_nodes() {
	let network = test_network(&[3, 4, 5]);
	let kept = network.node(&AccountId::from_num(3)).await.unwrap();
	let changed = network.node(&AccountId::from_num(4)).await.unwrap();
	let removed = network.node(&AccountId::from_num(5)).await.unwrap();
	changed.record_failure();

	network
		.set_addresses([
			("10.0.0.3:50211", AccountId::from_num(3)),
			("10.0.1.4:50211", AccountId::from_num(4)),
			("10.0.0.6:50211", AccountId::from_num(6)),
		])
		.await
		.unwrap();

	assert_eq!(network.node_account_ids().await, node_ids(&[3, 4, 6]));

	let still_kept = network.node(&AccountId::from_num(3)).await.unwrap();
	assert!(Arc::ptr_eq(&kept, &still_kept));

	let rebuilt = network.node(&AccountId::from_num(4)).await.unwrap();
	assert!(!Arc::ptr_eq(&changed, &rebuilt));
	assert_eq!(rebuilt.authority(), "10.0.1.4:50211");
	assert_eq!(rebuilt.failure_count(), 1);
	assert!(!rebuilt.is_healthy());

	assert!(network.node(&AccountId::from_num(5)).await.is_none());
	assert!(!removed.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_empty_update_is_rejected() {
	let network = test_network(&[3]);
	let empty: [(&str, AccountId); 0] = [];

	assert!(network.set_addresses(empty).await.is_err());
	assert_eq!(network.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_closes_every_node_once() {
	let network = test_network(&[3, 4]);
	assert_eq!(network.close().await, 2);
	assert_eq!(network.close().await, 0);
	assert!(network
		.nodes()
		.await
		.iter()
		.all(|node| node.is_closed()));
}
