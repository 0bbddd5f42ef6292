use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::task::JoinHandle;
use utils::context::Handler;
use utils::prelude::FutureTimeout;

use super::global::{mock_global_state, GlobalState};
use crate::config::GuestbookConfig;
use crate::entry::NewEntry;
use crate::store::{EntryStore, MemoryStore, StoreError};

pub struct TestServer {
	pub global: Arc<GlobalState>,
	pub handler: Handler,
	pub handle: JoinHandle<anyhow::Result<()>>,
	pub url: String,
}

impl TestServer {
	pub async fn start(config: GuestbookConfig) -> Self {
		Self::start_with_store(config, Arc::new(MemoryStore::default())).await
	}

	pub async fn start_with_store(mut config: GuestbookConfig, store: Arc<dyn EntryStore>) -> Self {
		let port = portpicker::pick_unused_port().expect("failed to pick port");
		let addr = SocketAddr::from(([127, 0, 0, 1], port));
		config.api.bind_address = addr;

		let (global, handler) = mock_global_state(config, store);

		let handle = tokio::spawn(crate::api::run(global.clone()));

		// Wait for the listener to come up.
		for _ in 0..100 {
			if tokio::net::TcpStream::connect(addr).await.is_ok() {
				break;
			}

			tokio::time::sleep(Duration::from_millis(10)).await;
		}

		Self {
			global,
			handler,
			handle,
			url: format!("http://{addr}"),
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{path}", self.url)
	}

	pub async fn teardown(self) {
		drop(self.global);

		self.handler
			.cancel()
			.timeout(Duration::from_secs(1))
			.await
			.expect("failed to cancel context");

		self.handle
			.timeout(Duration::from_secs(1))
			.await
			.expect("api did not stop")
			.expect("api task panicked")
			.expect("api returned an error");
	}
}

/// A store whose every call fails.
pub struct FailingStore;

#[async_trait::async_trait]
impl EntryStore for FailingStore {
	async fn insert(&self, _: NewEntry) -> Result<crate::entry::Entry, StoreError> {
		Err(StoreError::MissingRow)
	}

	async fn list(&self, _: usize, _: usize) -> Result<Vec<crate::entry::Entry>, StoreError> {
		Err(StoreError::Status {
			status: 503,
			body: "down".to_string(),
		})
	}

	async fn health(&self) -> Result<(), StoreError> {
		Err(StoreError::Status {
			status: 503,
			body: "down".to_string(),
		})
	}
}

pub fn new_entry(name: &str, message: &str) -> NewEntry {
	NewEntry {
		name: name.to_string(),
		message: message.to_string(),
		created_at: Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap(),
	}
}

pub async fn seed(store: &dyn EntryStore, count: usize) {
	for i in 1..=count {
		store
			.insert(new_entry(&format!("guest {i}"), &format!("message {i}")))
			.await
			.expect("failed to insert entry");
	}
}
