//! Configuration loading and validation.
//!
//! A client can be built from a JSON file describing its networks, operator
//! and tunables. Secrets referenced from the environment are resolved in a
//! separate step so a config can be validated without them.

#![allow(clippy::result_large_err)]

use std::path::Path;

mod client_config;
mod error;

pub use client_config::{ClientConfig, MirrorNetworkSpec, NetworkSpec, OperatorConfig};
pub use error::ConfigError;

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	/// Load and validate configuration from a specific file path
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Validate the configuration
	fn validate(&self) -> Result<(), ConfigError>;

	/// Check if a file is a JSON file based on extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}

	/// Returns a copy with every secret resolved to its plain value
	fn resolve_secrets(&self) -> Result<Self, ConfigError>;
}
