use hiero_sdk::{
	models::{AccountId, Hbar, Timestamp, TransactionId},
	services::transaction::PrngTransaction,
};
use proptest::{option, prelude::*};
use std::time::Duration;

const MAX_NODES: usize = 12;
const MAX_EVENTS: usize = 40;

/// Distinct node account numbers, sorted.
pub fn node_nums_strategy() -> impl Strategy<Value = Vec<u64>> {
	prop::collection::btree_set(3u64..64, 1..MAX_NODES).prop_map(|nums| nums.into_iter().collect())
}

/// `(min, max)` backoff bounds with `min <= max`.
pub fn backoff_bounds_strategy() -> impl Strategy<Value = (Duration, Duration)> {
	(1u64..2_000, 0u64..30_000).prop_map(|(min_ms, extra_ms)| {
		(
			Duration::from_millis(min_ms),
			Duration::from_millis(min_ms + extra_ms),
		)
	})
}

/// A run of node outcomes, `true` being a failure.
pub fn health_events_strategy() -> impl Strategy<Value = Vec<bool>> {
	prop::collection::vec(any::<bool>(), 0..MAX_EVENTS)
}

pub fn transaction_id_strategy() -> impl Strategy<Value = TransactionId> {
	(1u64..100_000, 1_500_000_000i64..2_000_000_000, 0u32..1_000_000_000).prop_map(
		|(payer, seconds, nanos)| {
			TransactionId::with_valid_start(AccountId::from_num(payer), Timestamp { seconds, nanos })
		},
	)
}

/// A frozen, unsigned prng transaction for between one and four nodes,
/// listed in no particular order.
pub fn frozen_prng_strategy() -> impl Strategy<Value = PrngTransaction> {
	(
		transaction_id_strategy(),
		prop::collection::btree_set(3u64..30, 1..5)
			.prop_map(|nums| nums.into_iter().collect::<Vec<u64>>())
			.prop_shuffle(),
		option::of(any::<u32>()),
		"[a-zA-Z0-9 _-]{0,40}",
		0i64..10_000_000_000,
		30u64..180,
	)
		.prop_map(|(transaction_id, nodes, range, memo, fee, valid_secs)| {
			let mut transaction = PrngTransaction::new();
			transaction
				.set_transaction_id(transaction_id)
				.unwrap()
				.set_node_account_ids(nodes.into_iter().map(AccountId::from_num).collect())
				.unwrap()
				.set_transaction_memo(memo)
				.unwrap()
				.set_max_transaction_fee(Hbar::from_tinybars(fee))
				.unwrap()
				.set_transaction_valid_duration(Duration::from_secs(valid_secs))
				.unwrap();
			if let Some(range) = range {
				transaction.set_range(range).unwrap();
			}
			transaction.freeze().unwrap();
			transaction
		})
}
