//! Guestbook operations, independent of the HTTP layer.

use chrono::Utc;

use crate::config::LimitsConfig;
use crate::entry::{Entry, Submission, ValidationError};
use crate::store::{EntryStore, StoreError};

/// One page of the listing, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPage {
	/// 1-based page number
	pub page: usize,
	pub entries: Vec<Entry>,
	/// Whether at least one older entry exists after this page
	pub has_more: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
	#[error(transparent)]
	Validation(#[from] ValidationError),
	#[error(transparent)]
	Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("page must be a positive integer, got {0:?}")]
pub struct InvalidPage(pub String);

/// Validates and stores a submission, then returns the first page so the caller
/// can show the new entry.
pub async fn submit(store: &dyn EntryStore, limits: &LimitsConfig, submission: &Submission) -> Result<EntryPage, SubmitError> {
	let entry = submission.validate(limits, Utc::now())?;

	let entry = store.insert(entry).await?;

	tracing::info!(id = entry.id, "entry created");

	Ok(list_page(store, 1, limits.page_size).await?)
}

/// Fetches one extra row so `has_more` is exact.
///
/// Pages whose offset does not fit a database offset (`i64`) are past the end
/// of any store and come back empty without a query.
pub async fn list_page(store: &dyn EntryStore, page: usize, page_size: usize) -> Result<EntryPage, StoreError> {
	let Some(offset) = page
		.saturating_sub(1)
		.checked_mul(page_size)
		.filter(|offset| i64::try_from(*offset).is_ok())
	else {
		return Ok(EntryPage {
			page,
			entries: Vec::new(),
			has_more: false,
		});
	};

	let mut entries = store.list(offset, page_size.saturating_add(1)).await?;

	let has_more = entries.len() > page_size;
	entries.truncate(page_size);

	Ok(EntryPage { page, entries, has_more })
}

/// A missing or empty page parameter means the first page.
pub fn parse_page(raw: Option<&str>) -> Result<usize, InvalidPage> {
	match raw.map(str::trim) {
		None | Some("") => Ok(1),
		Some(raw) => match raw.parse::<usize>() {
			Ok(page) if page >= 1 => Ok(page),
			_ => Err(InvalidPage(raw.to_owned())),
		},
	}
}
