use std::net::{Ipv6Addr, SocketAddr};

use anyhow::{bail, Context as _};
use binary_helper::config::{ConfigExtention, DatabaseConfig, TlsConfig};
use chrono::{FixedOffset, Offset, Utc};

pub type AppConfig = binary_helper::config::AppConfig<GuestbookConfig>;

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct GuestbookConfig {
	/// The HTTP server configuration
	pub api: ApiConfig,

	/// Where entries are persisted
	pub store: StoreConfig,

	/// Input limits and paging
	pub limits: LimitsConfig,

	/// How entries are displayed
	pub display: DisplayConfig,
}

impl ConfigExtention for GuestbookConfig {
	const APP_NAME: &'static str = "guestbook";
	const ENV_PREFIX: &'static str = "GUESTBOOK";

	fn pre_hook(config: &mut AppConfig) -> anyhow::Result<()> {
		config
			.extra
			.resolve(&mut config.database, |key| std::env::var(key).ok())
	}
}

impl GuestbookConfig {
	/// Fills credentials from the conventional environment variables and checks
	/// that the config can actually be used.
	pub fn resolve(&mut self, database: &mut DatabaseConfig, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
		if self.limits.max_message_chars == Some(0) {
			self.limits.max_message_chars = None;
		}

		if self.limits.max_name_chars == 0 {
			bail!("limits.max_name_chars must be at least 1");
		}

		if self.limits.page_size == 0 {
			bail!("limits.page_size must be at least 1");
		}

		if self.store.rest.timeout_secs == 0 {
			bail!("store.rest.timeout_secs must be at least 1");
		}

		if self.display.utc_offset_minutes.abs() >= 24 * 60 {
			bail!("display.utc_offset_minutes must be within 24 hours");
		}

		if !is_identifier(&self.store.table) {
			bail!("store.table must be a plain identifier, got {:?}", self.store.table);
		}

		match self.store.backend {
			StoreBackend::Postgres => {
				if database.uri.is_none() {
					database.uri = env("DATABASE_URL");
				}

				database
					.uri
					.as_ref()
					.context("database.uri or DATABASE_URL must be set for the postgres store")?;
			}
			StoreBackend::Rest => {
				let rest = &mut self.store.rest;
				if rest.url.is_none() {
					rest.url = env("SUPABASE_URL");
				}

				if rest.key.is_none() {
					rest.key = env("SUPABASE_KEY");
				}

				rest.url
					.as_ref()
					.context("store.rest.url or SUPABASE_URL must be set for the rest store")?;
				rest.key
					.as_ref()
					.context("store.rest.key or SUPABASE_KEY must be set for the rest store")?;
			}
			StoreBackend::Memory => {}
		}

		Ok(())
	}
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,

	/// Requests with a larger body are rejected
	pub max_body_size: usize,

	/// If we should use TLS for the API server
	pub tls: Option<TlsConfig>,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: SocketAddr::new(Ipv6Addr::UNSPECIFIED.into(), 8000),
			max_body_size: 16 * 1024,
			tls: None,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
	#[default]
	Postgres,
	Rest,
	Memory,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct StoreConfig {
	pub backend: StoreBackend,

	/// Name of the entries table
	pub table: String,

	/// Create the table on startup if it is missing (postgres only)
	pub create_table: bool,

	pub rest: RestConfig,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			backend: StoreBackend::default(),
			table: "guestbook".to_string(),
			create_table: true,
			rest: RestConfig::default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RestConfig {
	/// Base URL of the PostgREST / Supabase project
	pub url: Option<String>,

	/// API key, sent both as `apikey` and as a bearer token
	pub key: Option<String>,

	pub timeout_secs: u64,
}

impl Default for RestConfig {
	fn default() -> Self {
		Self {
			url: None,
			key: None,
			timeout_secs: 10,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
	pub max_name_chars: usize,

	/// `0` disables the limit
	pub max_message_chars: Option<usize>,

	/// Entries per listing page
	pub page_size: usize,
}

impl Default for LimitsConfig {
	fn default() -> Self {
		Self {
			max_name_chars: 30,
			max_message_chars: Some(500),
			page_size: 10,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
	/// Page title and heading
	pub title: String,

	/// Fixed offset from UTC timestamps are shown in
	pub utc_offset_minutes: i32,

	/// Appended to every displayed timestamp
	pub timezone_label: String,
}

impl Default for DisplayConfig {
	fn default() -> Self {
		Self {
			title: "Guestbook".to_string(),
			utc_offset_minutes: 0,
			timezone_label: "UTC".to_string(),
		}
	}
}

impl DisplayConfig {
	pub fn offset(&self) -> FixedOffset {
		FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
	}
}
