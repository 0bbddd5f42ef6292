use std::path::Path;

use serde::de::DeserializeOwned;
use serde_path_to_error::Segment;

use super::Config;
use crate::logging;

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct TlsConfig {
	/// The path to the TLS certificate
	pub cert: String,

	/// The path to the TLS private key
	pub key: String,

	/// The path to the TLS CA certificate
	pub ca_cert: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: Option<String>,

	/// The TLS configuration
	pub tls: Option<TlsConfig>,
}

/// The sections every binary shares. `extra` is read from the same document in
/// a second pass, see [`load`].
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, bound(deserialize = ""))]
pub struct AppConfig<T: ConfigExtention> {
	/// The name of the application
	pub name: String,

	/// The path to the config file
	pub config_file: Option<String>,

	/// The logging configuration
	pub logging: LoggingConfig,

	/// The database configuration
	pub database: DatabaseConfig,

	#[serde(skip)]
	pub extra: T,
}

pub trait ConfigExtention: DeserializeOwned + Default {
	const APP_NAME: &'static str;

	/// Prefix of the environment variables that override config keys.
	const ENV_PREFIX: &'static str;

	fn config_default() -> AppConfig<Self> {
		AppConfig {
			name: Self::APP_NAME.to_owned(),
			config_file: Some("config".to_owned()),
			logging: Default::default(),
			database: Default::default(),
			extra: Self::default(),
		}
	}

	fn pre_hook(_config: &mut AppConfig<Self>) -> anyhow::Result<()> {
		Ok(())
	}
}

impl<T: ConfigExtention> Default for AppConfig<T> {
	fn default() -> Self {
		T::config_default()
	}
}

impl<T: ConfigExtention> Config for AppConfig<T> {
	fn logging(&self) -> &LoggingConfig {
		&self.logging
	}

	fn parse() -> anyhow::Result<Self>
	where
		Self: Sized,
	{
		let (mut config, config_file) = parse::<T>(!cfg!(test), Self::default().config_file.as_deref(), T::ENV_PREFIX)?;

		config.config_file = config_file;

		Ok(config)
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn pre_hook(&mut self) -> anyhow::Result<()> {
		T::pre_hook(self)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("config file not found: {0}")]
	FileNotFound(String),
	#[error("failed to read config file {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse config file {path}: {source}")]
	File {
		path: String,
		#[source]
		source: toml::de::Error,
	},
	#[error("invalid config key {0}")]
	InvalidKey(String),
	#[error("invalid config value at {0}")]
	Deserialize(#[from] serde_path_to_error::Error<toml::de::Error>),
}

#[derive(Debug, clap::Parser)]
struct Cli {
	/// Path to the config file
	#[arg(short = 'c', long)]
	config_file: Option<String>,
}

/// Loads the config from the command line, the process environment and the
/// config file they point at.
pub fn parse<T: ConfigExtention>(
	enable_cli: bool,
	default_file: Option<&str>,
	prefix: &str,
) -> Result<(AppConfig<T>, Option<String>), ConfigError> {
	let explicit_file = if enable_cli {
		<Cli as clap::Parser>::parse().config_file
	} else {
		None
	};

	load(explicit_file, default_file, prefix, std::env::vars())
}

/// Builds a config from, in increasing priority, the serde defaults, a TOML file
/// and `{prefix}_SECTION__KEY` variables.
///
/// The file is `explicit_file`, else `{prefix}_CONFIG_FILE`, else
/// `default_file`. Only a missing default file is tolerated. Returns the config
/// together with the path of the file that was loaded.
///
/// Env values are read as TOML scalars first. When the field they land on
/// wants a string instead, the raw text is used, so `TITLE=2024` stays a string.
pub fn load<T: ConfigExtention>(
	explicit_file: Option<String>,
	default_file: Option<&str>,
	prefix: &str,
	vars: impl IntoIterator<Item = (String, String)>,
) -> Result<(AppConfig<T>, Option<String>), ConfigError> {
	let env_prefix = format!("{prefix}_");
	let file_var = format!("{prefix}_CONFIG_FILE");

	let mut overrides = toml::Table::new();
	let mut raw_values = Vec::new();
	let mut env_file = None;

	for (key, value) in vars {
		if key == file_var {
			env_file = Some(value);
			continue;
		}

		let Some(key) = key.strip_prefix(&env_prefix) else {
			continue;
		};

		let path = key.split("__").map(|s| s.to_lowercase()).collect::<Vec<_>>();
		if path.iter().any(|s| s.is_empty()) {
			return Err(ConfigError::InvalidKey(key.to_owned()));
		}

		if !insert_path(&mut overrides, &path, env_value(&value)) {
			return Err(ConfigError::InvalidKey(key.to_owned()));
		}

		raw_values.push((path, value));
	}

	let explicit_file = explicit_file.or(env_file);
	let explicit = explicit_file.is_some();

	let mut table = toml::Table::new();
	let mut loaded = None;

	if let Some(path) = explicit_file.as_deref().or(default_file) {
		match read_file(path)? {
			Some((location, file)) => {
				tracing::debug!(path = location, "loaded config file");
				table = file;
				loaded = Some(location);
			}
			None if explicit => return Err(ConfigError::FileNotFound(path.to_owned())),
			None => tracing::debug!(path, "no config file found, using defaults"),
		}
	}

	merge(&mut table, overrides);

	let mut config: AppConfig<T> = deserialize(&mut table, &raw_values)?;
	config.extra = deserialize(&mut table, &raw_values)?;

	Ok((config, loaded))
}

/// Deserializes `table`, turning env values back into strings wherever a
/// string was expected. Each retry fixes one value, so this terminates.
fn deserialize<C: DeserializeOwned>(table: &mut toml::Table, raw_values: &[(Vec<String>, String)]) -> Result<C, ConfigError> {
	loop {
		let err = match serde_path_to_error::deserialize(toml::Value::Table(table.clone())) {
			Ok(config) => return Ok(config),
			Err(err) => err,
		};

		let path = err
			.path()
			.iter()
			.map(|segment| match segment {
				Segment::Map { key } => key.clone(),
				_ => String::new(),
			})
			.collect::<Vec<_>>();

		let Some((path, raw)) = raw_values.iter().find(|(key, _)| *key == path) else {
			return Err(err.into());
		};

		if matches!(get_path(table, path), Some(toml::Value::String(_)) | None) {
			return Err(err.into());
		}

		insert_path(table, path, toml::Value::String(raw.clone()));
	}
}

fn get_path<'a>(table: &'a toml::Table, path: &[String]) -> Option<&'a toml::Value> {
	let (last, parents) = path.split_last()?;

	let mut table = table;
	for key in parents {
		table = table.get(key)?.as_table()?;
	}

	table.get(last)
}

fn read_file(path: &str) -> Result<Option<(String, toml::Table)>, ConfigError> {
	let with_ext = format!("{path}.toml");
	let Some(path) = [path, with_ext.as_str()].into_iter().find(|p| Path::new(p).is_file()) else {
		return Ok(None);
	};

	let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
		path: path.to_owned(),
		source,
	})?;

	let table = contents.parse::<toml::Table>().map_err(|source| ConfigError::File {
		path: path.to_owned(),
		source,
	})?;

	let location = std::fs::canonicalize(path)
		.map(|p| p.display().to_string())
		.unwrap_or_else(|_| path.to_owned());

	Ok(Some((location, table)))
}

/// Env values are TOML scalars when they parse as one, plain strings otherwise.
fn env_value(value: &str) -> toml::Value {
	format!("v = {value}")
		.parse::<toml::Table>()
		.ok()
		.and_then(|mut t| t.remove("v"))
		.unwrap_or_else(|| toml::Value::String(value.to_owned()))
}

fn insert_path(table: &mut toml::Table, path: &[String], value: toml::Value) -> bool {
	match path {
		[] => false,
		[key] => {
			table.insert(key.clone(), value);
			true
		}
		[key, rest @ ..] => match table.entry(key.clone()).or_insert(toml::Value::Table(toml::Table::new())) {
			toml::Value::Table(inner) => insert_path(inner, rest, value),
			_ => false,
		},
	}
}

fn merge(base: &mut toml::Table, overrides: toml::Table) {
	for (key, value) in overrides {
		if let toml::Value::Table(value) = value {
			if let Some(toml::Value::Table(inner)) = base.get_mut(&key) {
				merge(inner, value);
				continue;
			}

			base.insert(key, toml::Value::Table(value));
		} else {
			base.insert(key, value);
		}
	}
}
