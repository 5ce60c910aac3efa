//! The client: networks, operator and defaults shared by every request.

mod client;

pub use client::{Client, ClientBuilder, ClientSettings, Operator};
