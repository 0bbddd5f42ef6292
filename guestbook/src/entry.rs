use chrono::{DateTime, Utc};

use crate::config::LimitsConfig;

/// A persisted guestbook entry. `name` and `message` are stored HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, postgres_from_row::FromRow)]
pub struct Entry {
	pub id: i64,
	pub name: String,
	pub message: String,
	pub created_at: DateTime<Utc>,
}

/// A validated entry that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NewEntry {
	pub name: String,
	pub message: String,
	pub created_at: DateTime<Utc>,
}

/// The raw form fields of a submission. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
	pub name: String,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("Please enter your name.")]
	EmptyName,
	#[error("Please enter a message.")]
	EmptyMessage,
	#[error("Your name can be at most {max} characters long.")]
	NameTooLong { max: usize },
	#[error("Your message can be at most {max} characters long.")]
	MessageTooLong { max: usize },
}

impl Submission {
	pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			message: message.into(),
		}
	}

	/// Reads `name` and `message` from an urlencoded form body, unknown fields
	/// are ignored.
	pub fn from_form(body: &[u8]) -> Self {
		let mut submission = Self::default();

		for (key, value) in url::form_urlencoded::parse(body) {
			match key.as_ref() {
				"name" => submission.name = value.into_owned(),
				"message" => submission.message = value.into_owned(),
				_ => {}
			}
		}

		submission
	}

	/// Trims and checks both fields, then escapes them for storage. Lengths are
	/// counted in characters before escaping.
	pub fn validate(&self, limits: &LimitsConfig, now: DateTime<Utc>) -> Result<NewEntry, ValidationError> {
		let name = self.name.trim();
		let message = self.message.trim();

		if name.is_empty() {
			return Err(ValidationError::EmptyName);
		}

		if message.is_empty() {
			return Err(ValidationError::EmptyMessage);
		}

		if name.chars().count() > limits.max_name_chars {
			return Err(ValidationError::NameTooLong {
				max: limits.max_name_chars,
			});
		}

		if let Some(max) = limits.max_message_chars {
			if message.chars().count() > max {
				return Err(ValidationError::MessageTooLong { max });
			}
		}

		Ok(NewEntry {
			name: escape_html(name),
			message: escape_html(message),
			created_at: now,
		})
	}
}

pub fn escape_html(value: &str) -> String {
	maud::html! { (value) }.into_string()
}
