//! Consensus and mirror node networks.
//!
//! - `node`: one consensus node with its channel and health state
//! - `network`: membership, node selection and address book reconciliation
//! - `mirror`: the read-only mirror network with URL rotation

mod mirror;
mod network;
mod node;

pub use mirror::{mirror_base_url, MirrorNetwork};
pub use network::{Network, NetworkConfig};
pub use node::{Node, NodeChannel};
