use crate::properties::strategies::node_nums_strategy;
use hiero_sdk::{
	models::AccountId,
	services::network::{Network, NetworkConfig},
};
use proptest::{prelude::*, test_runner::Config};
use std::collections::HashSet;

fn network(nums: &[u64]) -> Network {
	let addresses: Vec<String> = nums
		.iter()
		.map(|num| format!("10.0.{}.{}:50211", num / 256, num % 256))
		.collect();
	Network::from_addresses(
		addresses
			.iter()
			.map(String::as_str)
			.zip(nums.iter().copied().map(AccountId::from_num)),
		NetworkConfig::default(),
	)
	.unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
	tokio::runtime::Builder::new_current_thread()
		.enable_time()
		.start_paused(true)
		.build()
		.unwrap()
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_attempts_visit_every_healthy_candidate_before_repeating(
		nums in node_nums_strategy(),
		failing in prop::collection::vec(any::<bool>(), 12),
	) {
		let (healthy, picked) = runtime().block_on(async {
			let network = network(&nums);
			let mut healthy = HashSet::new();
			for (index, node) in network.nodes().await.iter().enumerate() {
				if failing.get(index).copied().unwrap_or(false) {
					node.record_failure();
				} else {
					healthy.insert(node.account_id().clone());
				}
			}

			let mut tried = HashSet::new();
			let mut picked = Vec::new();
			for _ in 0..nums.len() {
				let node = network.select_node(None, &tried).await.unwrap();
				node.mark_used();
				tried.insert(node.account_id().clone());
				picked.push(node.account_id().clone());
			}
			(healthy, picked)
		});

		if healthy.is_empty() {
			prop_assert_eq!(picked.len(), nums.len());
		} else {
			// Healthy nodes are exhausted first and backing-off nodes never win.
			let first: HashSet<AccountId> = picked.iter().take(healthy.len()).cloned().collect();
			prop_assert_eq!(&first, &healthy);
			prop_assert!(picked.iter().all(|id| healthy.contains(id)));
		}
	}

	#[test]
	fn test_selection_respects_restriction(
		nums in node_nums_strategy(),
		restrict in prop::collection::vec(3u64..80, 1..8),
	) {
		let restrict: Vec<AccountId> = restrict.into_iter().map(AccountId::from_num).collect();
		let members: HashSet<AccountId> = nums.iter().copied().map(AccountId::from_num).collect();
		let allowed: HashSet<AccountId> = restrict
			.iter()
			.filter(|id| members.contains(*id))
			.cloned()
			.collect();

		let selected = runtime().block_on(async {
			network(&nums)
				.select_node(Some(&restrict), &HashSet::new())
				.await
				.map(|node| node.account_id().clone())
		});

		match selected {
			Ok(node) => prop_assert!(allowed.contains(&node)),
			Err(_) => prop_assert!(allowed.is_empty()),
		}
	}

	#[test]
	fn test_nodes_per_transaction_is_a_third_of_healthy(
		nums in node_nums_strategy(),
		max in proptest::option::of(1usize..6),
	) {
		let count = runtime().block_on(async {
			let network = network(&nums);
			network.set_max_nodes_per_transaction(max);
			network.nodes_per_transaction().await
		});

		let expected = nums.len().div_ceil(3).max(1);
		let expected = max.map_or(expected, |max| expected.min(max));
		prop_assert_eq!(count, expected);
		prop_assert!(count >= 1);
	}
}
