//! Default tunables and the built-in network tables.

use std::time::Duration;

use crate::models::Hbar;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);
/// Outer deadline for one `execute` call, covering every attempt and sleep.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Deadline for a single round trip to one node.
pub const DEFAULT_GRPC_DEADLINE: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_TRANSACTION_FEE: Hbar = Hbar::new(2);
pub const DEFAULT_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(120);
/// Ports on which node channels use TLS.
pub const TLS_PORTS: [u16; 2] = [443, 50212];

pub const MAINNET_NODES: &[(&str, u64)] = &[
	("35.237.200.180:50211", 3),
	("35.186.191.247:50211", 4),
	("35.192.2.25:50211", 5),
	("35.199.161.108:50211", 6),
	("35.203.82.240:50211", 7),
	("35.236.5.219:50211", 8),
	("35.197.192.225:50211", 9),
	("35.242.233.154:50211", 10),
	("35.240.118.96:50211", 11),
	("35.204.86.32:50211", 12),
];

pub const TESTNET_NODES: &[(&str, u64)] = &[
	("0.testnet.hedera.com:50211", 3),
	("1.testnet.hedera.com:50211", 4),
	("2.testnet.hedera.com:50211", 5),
	("3.testnet.hedera.com:50211", 6),
];

pub const PREVIEWNET_NODES: &[(&str, u64)] = &[
	("0.previewnet.hedera.com:50211", 3),
	("1.previewnet.hedera.com:50211", 4),
	("2.previewnet.hedera.com:50211", 5),
	("3.previewnet.hedera.com:50211", 6),
];

pub const MAINNET_MIRROR: &str = "mainnet-public.mirrornode.hedera.com:443";
pub const TESTNET_MIRROR: &str = "testnet.mirrornode.hedera.com:443";
pub const PREVIEWNET_MIRROR: &str = "previewnet.mirrornode.hedera.com:443";
