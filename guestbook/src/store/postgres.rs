use std::sync::Arc;

use deadpool_postgres::Pool;
use postgres_from_row::FromRow;

use super::{EntryStore, StoreError};
use crate::entry::{Entry, NewEntry};

pub struct PostgresStore {
	pool: Arc<Pool>,
	/// Quoted table name, validated as an identifier when the config is loaded.
	table: String,
}

impl PostgresStore {
	pub fn new(pool: Arc<Pool>, table: &str) -> Self {
		Self {
			pool,
			table: format!("\"{table}\""),
		}
	}

	pub async fn ensure_schema(&self) -> Result<(), StoreError> {
		let client = self.pool.get().await?;

		client
			.batch_execute(&format!(
				"CREATE TABLE IF NOT EXISTS {} (
					id BIGSERIAL PRIMARY KEY,
					name TEXT NOT NULL,
					message TEXT NOT NULL,
					created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
				)",
				self.table
			))
			.await?;

		Ok(())
	}
}

#[async_trait::async_trait]
impl EntryStore for PostgresStore {
	async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError> {
		let client = self.pool.get().await?;

		let query = format!(
			"INSERT INTO {} (name, message, created_at) VALUES ($1, $2, $3) RETURNING id, name, message, created_at",
			self.table
		);

		let row = client
			.query_one(query.as_str(), &[&entry.name, &entry.message, &entry.created_at])
			.await?;

		Ok(Entry::try_from_row(&row)?)
	}

	async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, StoreError> {
		let client = self.pool.get().await?;

		let query = format!(
			"SELECT id, name, message, created_at FROM {} ORDER BY id DESC OFFSET $1 LIMIT $2",
			self.table
		);

		let offset = i64::try_from(offset).unwrap_or(i64::MAX);
		let limit = i64::try_from(limit).unwrap_or(i64::MAX);

		let rows = client.query(query.as_str(), &[&offset, &limit]).await?;

		Ok(rows.iter().map(Entry::try_from_row).collect::<Result<_, _>>()?)
	}

	async fn health(&self) -> Result<(), StoreError> {
		let client = self.pool.get().await?;
		client.simple_query("SELECT 1").await?;
		Ok(())
	}
}
