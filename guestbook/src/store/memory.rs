use tokio::sync::Mutex;

use super::{EntryStore, StoreError};
use crate::entry::{Entry, NewEntry};

/// Process local store for development and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<Vec<Entry>>,
}

#[async_trait::async_trait]
impl EntryStore for MemoryStore {
	async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError> {
		let mut entries = self.entries.lock().await;

		let entry = Entry {
			id: entries.len() as i64 + 1,
			name: entry.name,
			message: entry.message,
			created_at: entry.created_at,
		};

		entries.push(entry.clone());

		Ok(entry)
	}

	async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, StoreError> {
		let entries = self.entries.lock().await;

		Ok(entries.iter().rev().skip(offset).take(limit).cloned().collect())
	}

	async fn health(&self) -> Result<(), StoreError> {
		Ok(())
	}
}
