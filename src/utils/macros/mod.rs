//! Macros shared across the crate.
//!
//! - `deserialization`: case-insensitive serde helpers for tagged enums
//! - `entity_id`: the `shard.realm.num` identifier family

mod deserialization;
mod entity_id;
