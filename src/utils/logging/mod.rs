//! Subscriber setup for applications embedding the SDK.
//!
//! The SDK itself only emits `tracing` events. Applications call
//! [`setup_logging`] once, or install their own subscriber.
//!
//! Environment variables read by [`LoggingConfig::from_env`]:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: "trace", "debug", "info" (default), "warn" or "error"
//! - LOG_DATA_DIR: directory for log files; default is "logs/"
//! - LOG_MAX_SIZE: size in bytes after which a new file is started; default is 1GB

pub mod error;

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
	env,
	fs::{create_dir_all, metadata},
	path::{Path, PathBuf},
};
use tracing::{info, Level, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
	prelude::*,
	registry::LookupSpan,
};

const DEFAULT_LOG_MAX_SIZE: u64 = 1_073_741_824;
const LOG_FILE_STEM: &str = "hiero-sdk";

lazy_static! {
	static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
	Stdout,
	/// Daily files under the directory, split further once a file outgrows
	/// `max_size` bytes.
	File { dir: PathBuf, max_size: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	pub level: Level,
	pub output: LogOutput,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: Level::INFO,
			output: LogOutput::Stdout,
		}
	}
}

impl LoggingConfig {
	pub fn from_env() -> Result<Self, String> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
		let level = lookup("LOG_LEVEL")
			.map(|raw| parse_level(&raw))
			.unwrap_or(Level::INFO);

		let mode = lookup("LOG_MODE").unwrap_or_default().to_lowercase();
		let output = if mode == "file" {
			let max_size = match lookup("LOG_MAX_SIZE") {
				Some(raw) => raw
					.parse::<u64>()
					.map_err(|e| format!("LOG_MAX_SIZE must be a valid u64 if set: {}", e))?,
				None => DEFAULT_LOG_MAX_SIZE,
			};
			LogOutput::File {
				dir: PathBuf::from(lookup("LOG_DATA_DIR").unwrap_or_else(|| "logs/".to_string())),
				max_size,
			}
		} else {
			LogOutput::Stdout
		};

		Ok(Self { level, output })
	}
}

/// Strips ANSI colour codes from events written to files.
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

fn strip_ansi_escapes(s: &str) -> String {
	ANSI_ESCAPE.replace_all(s, "").into_owned()
}

/// `logs/hiero-sdk.log` + `2024-05-01` + `2` -> `logs/hiero-sdk-2024-05-01.2.log`
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
	let stem = base_file_path
		.strip_suffix(".log")
		.unwrap_or(base_file_path);
	format!("{}-{}.{}.log", stem, date_str, index)
}

/// First rolled path, starting at `file_path`, whose file is missing or no
/// larger than `max_size`.
pub fn space_based_rolling(
	file_path: &str,
	base_file_path: &str,
	date_str: &str,
	max_size: u64,
) -> String {
	let mut index = 1;
	let mut candidate = file_path.to_string();
	while metadata(&candidate).is_ok_and(|m| m.len() > max_size) {
		index += 1;
		candidate = compute_rolled_file_path(base_file_path, date_str, index);
	}
	candidate
}

fn parse_level(raw: &str) -> Level {
	raw.trim().parse::<Level>().unwrap_or(Level::INFO)
}

fn event_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

/// Installs a global subscriber configured from the environment.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	setup_logging_with(LoggingConfig::from_env()?)
}

pub fn setup_logging_with(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
	let registry = tracing_subscriber::registry().with(EnvFilter::new(config.level.to_string()));

	match &config.output {
		LogOutput::File { dir, max_size } => {
			create_dir_all(dir)?;
			let base = dir.join(format!("{}.log", LOG_FILE_STEM));
			let base = base.to_string_lossy();
			let date_str = Utc::now().format("%Y-%m-%d").to_string();
			let first = compute_rolled_file_path(&base, &date_str, 1);
			let path = PathBuf::from(space_based_rolling(&first, &base, &date_str, *max_size));

			let appender = tracing_appender::rolling::never(
				path.parent().unwrap_or(Path::new(".")),
				path.file_name().unwrap_or_default(),
			);
			registry
				.with(
					fmt::layer()
						.event_format(StripAnsiFormatter {
							inner: event_format(false),
						})
						.with_writer(appender)
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.try_init()?;
		}
		LogOutput::Stdout => {
			registry
				.with(
					fmt::layer()
						.event_format(event_format(true))
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.try_init()?;
		}
	}

	info!(level = %config.level, output = ?config.output, "logging configured");
	Ok(())
}
