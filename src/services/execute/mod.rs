//! Request execution.
//!
//! - `executable`: the [`Execute`] capability and the shared retry loop
//! - `settings`: per-request overrides of the client's retry tunables
//! - `error`: the error type every public operation returns

mod error;
mod executable;
mod settings;

pub use error::{CancelReason, ClientError};
pub use executable::{classify_precheck, execute, AttemptOutcome, Execute};
pub use settings::{RequestSettings, ResolvedSettings};
