//! Security models
//!
//! - `error`: Error types for security operations
//! - `key`: Ed25519 keys and the `Signer` seam
//! - `secret`: Secret management and zeroization

mod error;
mod key;
mod secret;

pub use error::{SecurityError, SecurityResult};
pub use key::{FnSigner, PrivateKey, PublicKey, Signer};
pub use secret::{SecretString, SecretValue};
