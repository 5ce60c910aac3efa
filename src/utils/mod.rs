//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the crate. Currently includes:
//!
//! - constants: Defaults and built-in network tables
//! - http: HTTP client utilities (i.e. creation of retryable HTTP clients)
//! - logging: Logging utilities
//! - macros: Macros for common functionality
//! - serde_base64: Base64 serde helpers for byte fields

pub mod constants;
pub mod http;
pub mod logging;
pub mod macros;
pub mod serde_base64;

pub use constants::*;
pub use http::*;
