use crate::properties::strategies::frozen_prng_strategy;
use hiero_sdk::{
	models::PrivateKey,
	services::transaction::{AnyTransaction, PrngTransaction, TopicCreateTransaction},
};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		cases: 64,
		..Config::default()
	})]

	#[test]
	fn test_restored_transaction_matches_original(transaction in frozen_prng_strategy()) {
		let bytes = transaction.to_bytes().unwrap();
		let restored = PrngTransaction::from_bytes(&bytes).unwrap();

		prop_assert_eq!(restored.transaction_id(), transaction.transaction_id());
		prop_assert_eq!(restored.node_account_ids(), transaction.node_account_ids());
		prop_assert_eq!(restored.max_transaction_fee(), transaction.max_transaction_fee());
		prop_assert_eq!(restored.transaction_memo(), transaction.transaction_memo());
		prop_assert_eq!(
			restored.transaction_valid_duration(),
			transaction.transaction_valid_duration()
		);
		prop_assert_eq!(restored.range(), transaction.range());
		prop_assert_eq!(restored.body_bytes().unwrap(), transaction.body_bytes().unwrap());
		prop_assert_eq!(
			restored.transaction_hash_per_node().unwrap(),
			transaction.transaction_hash_per_node().unwrap()
		);
		prop_assert_eq!(restored.to_bytes().unwrap(), bytes);
	}

	#[test]
	fn test_signatures_survive_serialization(
		mut transaction in frozen_prng_strategy(),
		signers in 1usize..4,
	) {
		let keys: Vec<PrivateKey> = (0..signers).map(|_| PrivateKey::generate_ed25519()).collect();
		for key in &keys {
			transaction.sign(key).unwrap();
		}

		let restored = PrngTransaction::from_bytes(&transaction.to_bytes().unwrap()).unwrap();
		let signatures = restored.signatures().unwrap();
		let bodies = restored.body_bytes().unwrap();

		let nodes = restored.node_account_ids().unwrap();

		prop_assert_eq!(signatures.len(), bodies.len());
		for (node, body) in nodes.iter().zip(&bodies) {
			let map = &signatures[node];
			prop_assert_eq!(map.len(), signers);
			for key in &keys {
				let signature = map.get(&key.public_key()).unwrap();
				prop_assert!(key.public_key().verify(body, signature));
			}
		}
	}

	#[test]
	fn test_kind_is_checked_on_restore(transaction in frozen_prng_strategy()) {
		let bytes = transaction.to_bytes().unwrap();

		prop_assert!(TopicCreateTransaction::from_bytes(&bytes).is_err());
		prop_assert!(matches!(
			AnyTransaction::from_bytes(&bytes).unwrap(),
			AnyTransaction::Prng(_)
		));
	}

	#[test]
	fn test_truncated_bytes_are_rejected(
		transaction in frozen_prng_strategy(),
		cut in 1usize..64,
	) {
		let bytes = transaction.to_bytes().unwrap();
		let truncated = &bytes[..bytes.len().saturating_sub(cut)];

		prop_assert!(PrngTransaction::from_bytes(truncated).is_err());
		prop_assert!(AnyTransaction::from_bytes(truncated).is_err());
	}
}
