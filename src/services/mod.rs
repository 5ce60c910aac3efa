//! Core services implementing the protocol engine.
//!
//! This module contains the main service implementations:
//! - `client`: Client configuration and lifecycle
//! - `network`: Consensus and mirror networks, node health and selection
//! - `transport`: The wire transport to a single node
//! - `execute`: The retry state machine shared by every request
//! - `transaction`: Transaction lifecycle and the shipped operations
//! - `query`: Receipt, record and address book queries

pub mod client;
pub mod execute;
pub mod network;
pub mod query;
pub mod transaction;
pub mod transport;
