use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use super::{EntryStore, StoreError};
use crate::entry::{Entry, NewEntry};

const COLUMNS: &str = "id,name,message,created_at";

/// Store backed by a PostgREST endpoint, such as the one Supabase exposes.
pub struct RestStore {
	client: reqwest::Client,
	endpoint: String,
}

impl RestStore {
	pub fn new(url: &str, key: &str, table: &str, timeout: Duration) -> Result<Self, StoreError> {
		let mut headers = HeaderMap::new();
		headers.insert("apikey", HeaderValue::from_str(key)?);

		let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))?;
		bearer.set_sensitive(true);
		headers.insert(AUTHORIZATION, bearer);

		let client = reqwest::Client::builder()
			.default_headers(headers)
			.timeout(timeout)
			.build()?;

		Ok(Self {
			client,
			endpoint: format!("{}/rest/v1/{table}", url.trim_end_matches('/')),
		})
	}

	async fn check(res: reqwest::Response) -> Result<reqwest::Response, StoreError> {
		let status = res.status();
		if status.is_success() {
			return Ok(res);
		}

		let body = res.text().await.unwrap_or_default();
		Err(StoreError::Status {
			status: status.as_u16(),
			body,
		})
	}
}

#[async_trait::async_trait]
impl EntryStore for RestStore {
	async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError> {
		let res = self
			.client
			.post(&self.endpoint)
			.query(&[("select", COLUMNS)])
			.header("Prefer", "return=representation")
			.json(&entry)
			.send()
			.await?;

		let rows: Vec<Entry> = Self::check(res).await?.json().await?;

		rows.into_iter().next().ok_or(StoreError::MissingRow)
	}

	async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, StoreError> {
		let res = self
			.client
			.get(&self.endpoint)
			.query(&[("select", COLUMNS), ("order", "id.desc")])
			.query(&[("offset", offset), ("limit", limit)])
			.send()
			.await?;

		Ok(Self::check(res).await?.json().await?)
	}

	async fn health(&self) -> Result<(), StoreError> {
		let res = self
			.client
			.get(&self.endpoint)
			.query(&[("select", "id"), ("limit", "1")])
			.send()
			.await?;

		Self::check(res).await?;
		Ok(())
	}
}
