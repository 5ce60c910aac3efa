//! Error context shared by every SDK error type.
//!
//! Each SDK error wraps an [`ErrorContext`]. The trace id is minted once,
//! when the innermost error is built, and then travels outward through every
//! wrapper. A failed `execute` therefore reports the same trace id as the
//! attempt-level log line that first saw the problem.

use chrono::Utc;
use std::{collections::HashMap, error::Error as StdError, fmt, iter};
use uuid::Uuid;

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// How far down a source chain a trace id is looked for.
const TRACE_SEARCH_DEPTH: usize = 4;

/// Message, cause and correlation data for an SDK error.
#[derive(Debug)]
pub struct ErrorContext {
	pub message: String,
	pub source: Option<BoxedSource>,
	/// Free-form fields such as `node`, `attempt` or `status`.
	pub metadata: Option<HashMap<String, String>>,
	/// RFC 3339 creation time.
	pub timestamp: String,
	pub trace_id: String,
}

impl ErrorContext {
	/// Builds a context, reusing the source's trace id when it carries one.
	pub fn new(
		message: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let trace_id = source
			.as_deref()
			.map(|cause| cause.trace_id())
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now().to_rfc3339(),
			trace_id,
		}
	}

	/// Same as [`ErrorContext::new`], but the error is also emitted at
	/// `error` level.
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Self::new(message, source, metadata);
		log_error(&context);
		context
	}

	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// `"message [k1=v1, k2=v2]"` with keys in lexical order. No brackets
	/// are added when there is no metadata.
	pub fn format_with_metadata(&self) -> String {
		let Some(metadata) = self.metadata.as_ref().filter(|m| !m.is_empty()) else {
			return self.message.clone();
		};

		let mut fields: Vec<(&String, &String)> = metadata.iter().collect();
		fields.sort_unstable_by(|a, b| a.0.cmp(b.0));
		let rendered = fields
			.iter()
			.map(|(key, value)| format!("{key}={value}"))
			.collect::<Vec<_>>()
			.join(", ");

		format!("{} [{}]", self.message, rendered)
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.format_with_metadata())
	}
}

impl StdError for ErrorContext {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.source.as_deref().map(|cause| cause as &(dyn StdError + 'static))
	}
}

/// Errors that expose the trace id of their [`ErrorContext`].
pub trait TraceableError: StdError + Send + Sync {
	fn trace_id(&self) -> String;
}

impl TraceableError for dyn StdError + Send + Sync + 'static {
	fn trace_id(&self) -> String {
		let top: &(dyn StdError + 'static) = self;
		iter::successors(Some(top), |&err| err.source())
			.take(TRACE_SEARCH_DEPTH)
			.find_map(known_trace_id)
			.unwrap_or_else(|| Uuid::new_v4().to_string())
	}
}

/// Trace id of `err` if it is one of the SDK's own error types.
fn known_trace_id(err: &(dyn StdError + 'static)) -> Option<String> {
	use crate::{
		models::{ConfigError, SecurityError},
		services::{execute::ClientError, transport::TransportError},
	};

	if let Some(context) = err.downcast_ref::<ErrorContext>() {
		return Some(context.trace_id.clone());
	}
	if let Some(e) = err.downcast_ref::<ClientError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = err.downcast_ref::<TransportError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = err.downcast_ref::<ConfigError>() {
		return Some(e.trace_id());
	}
	err.downcast_ref::<SecurityError>().map(|e| e.trace_id())
}

/// Renders `err` followed by one indented `Caused by:` line per source.
fn format_error_chain(err: &(dyn StdError + 'static)) -> String {
	iter::successors(Some(err), |&e| e.source())
		.map(|e| e.to_string())
		.collect::<Vec<_>>()
		.join("\n\tCaused by: ")
}

fn log_error(context: &ErrorContext) {
	let chain = context.source.as_deref().map(|cause| format_error_chain(cause));
	tracing::error!(
		message = context.format_with_metadata(),
		trace_id = %context.trace_id,
		timestamp = %context.timestamp,
		error.chain = chain.as_deref(),
		"sdk error"
	);
}
