use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use binary_helper::global::setup_database;

use crate::config::{AppConfig, StoreBackend};
use crate::entry::{Entry, NewEntry};

mod memory;
mod postgres;
mod rest;

pub use self::memory::MemoryStore;
pub use self::postgres::PostgresStore;
pub use self::rest::RestStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("failed to get a database connection: {0}")]
	Pool(#[from] deadpool_postgres::PoolError),
	#[error("database query failed: {0}")]
	Postgres(#[from] tokio_postgres::Error),
	#[error("request to the store failed: {0}")]
	Http(#[from] reqwest::Error),
	#[error("invalid store api key")]
	InvalidKey(#[from] reqwest::header::InvalidHeaderValue),
	#[error("store responded with {status}: {body}")]
	Status { status: u16, body: String },
	#[error("store did not return the inserted row")]
	MissingRow,
}

/// Persistence for guestbook entries.
///
/// Listings are ordered by id, newest first.
#[async_trait::async_trait]
pub trait EntryStore: Send + Sync {
	async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError>;

	async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, StoreError>;

	/// Cheap round trip used by the health endpoint.
	async fn health(&self) -> Result<(), StoreError>;
}

/// Builds the store selected in the config.
pub async fn setup(config: &AppConfig) -> anyhow::Result<Arc<dyn EntryStore>> {
	let store = &config.extra.store;

	tracing::info!(backend = ?store.backend, table = %store.table, "setting up store");

	Ok(match store.backend {
		StoreBackend::Postgres => {
			let pool = setup_database(&config.database).await?;
			let postgres = PostgresStore::new(pool, &store.table);

			if store.create_table {
				postgres.ensure_schema().await.context("failed to create entries table")?;
			}

			Arc::new(postgres)
		}
		StoreBackend::Rest => {
			let url = store.rest.url.as_deref().context("rest store url is not set")?;
			let key = store.rest.key.as_deref().context("rest store key is not set")?;

			Arc::new(
				RestStore::new(url, key, &store.table, Duration::from_secs(store.rest.timeout_secs))
					.context("failed to create rest store")?,
			)
		}
		StoreBackend::Memory => {
			tracing::warn!("using the in-memory store, entries are lost on restart");
			Arc::new(MemoryStore::default())
		}
	})
}
