use chrono::{TimeZone, Utc};

use crate::config::{DisplayConfig, LimitsConfig};
use crate::entry::Entry;
use crate::service::EntryPage;
use crate::template;

fn entry(id: i64, name: &str, message: &str) -> Entry {
	Entry {
		id,
		name: name.to_string(),
		message: message.to_string(),
		created_at: Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap(),
	}
}

#[test]
fn test_timestamp() {
	let at = Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();

	assert_eq!(template::timestamp(&DisplayConfig::default(), at), "2024-03-01 02:05:09 PM UTC");

	let ist = DisplayConfig {
		utc_offset_minutes: 330,
		timezone_label: "IST".to_string(),
		..Default::default()
	};
	assert_eq!(template::timestamp(&ist, at), "2024-03-01 07:35:09 PM IST");

	let morning = Utc.with_ymd_and_hms(2024, 3, 1, 0, 30, 0).unwrap();
	let cet = DisplayConfig {
		utc_offset_minutes: 60,
		timezone_label: "CET".to_string(),
		..Default::default()
	};
	assert_eq!(template::timestamp(&cet, morning), "2024-03-01 01:30:00 AM CET");
}

#[test]
fn test_entry_is_not_escaped_twice() {
	let html = template::entry(&DisplayConfig::default(), &entry(7, "&lt;b&gt;Bob&lt;/b&gt;", "a &amp; b")).into_string();

	assert!(html.contains(r#"id="entry-7""#), "{html}");
	assert!(html.contains("&lt;b&gt;Bob&lt;/b&gt;"), "{html}");
	assert!(html.contains("a &amp; b"), "{html}");
	assert!(!html.contains("&amp;lt;"), "{html}");
	assert!(html.contains(r#"datetime="2024-03-01T14:05:09Z""#), "{html}");
	assert!(html.contains("2024-03-01 02:05:09 PM UTC"), "{html}");
}

#[test]
fn test_entry_placeholder() {
	let html = template::entry(&DisplayConfig::default(), &entry(1, "", "")).into_string();

	assert_eq!(html.matches("Unknown").count(), 2, "{html}");
}

#[test]
fn test_message_list_empty_state() {
	let listing = EntryPage {
		page: 1,
		entries: vec![],
		has_more: false,
	};

	let html = template::message_list(&DisplayConfig::default(), &listing).into_string();

	assert!(html.starts_with(r#"<div id="message-list">"#), "{html}");
	assert!(html.contains(r#"id="empty-state""#), "{html}");
	assert!(!html.contains("message-list-items"), "{html}");
}

#[test]
fn test_message_rows_load_more() {
	let listing = EntryPage {
		page: 2,
		entries: vec![entry(12, "b", "second"), entry(11, "a", "first")],
		has_more: true,
	};

	let html = template::message_rows(&DisplayConfig::default(), &listing).into_string();

	assert!(html.find("entry-12").unwrap() < html.find("entry-11").unwrap(), "{html}");
	assert!(html.contains(r#"id="load-more""#), "{html}");
	assert!(html.contains(r#"hx-get="/messages?page=3""#), "{html}");

	let last = EntryPage { has_more: false, ..listing };
	let html = template::message_rows(&DisplayConfig::default(), &last).into_string();
	assert!(!html.contains("load-more"), "{html}");
}

#[test]
fn test_form_limits() {
	let html = template::form(&LimitsConfig::default(), false).into_string();
	assert!(html.contains(r#"maxlength="30""#), "{html}");
	assert!(html.contains(r#"maxlength="500""#), "{html}");
	assert!(html.contains(r#"hx-post="/submit-message""#), "{html}");
	assert!(!html.contains("hx-swap-oob"), "{html}");

	let unlimited = LimitsConfig {
		max_message_chars: None,
		..Default::default()
	};
	let html = template::form(&unlimited, true).into_string();
	assert_eq!(html.matches("maxlength").count(), 1, "{html}");
	assert!(html.contains(r#"hx-swap-oob="true""#), "{html}");
}

#[test]
fn test_submitted_resets_form() {
	let listing = EntryPage {
		page: 1,
		entries: vec![entry(1, "Ana", "Hi!")],
		has_more: false,
	};

	let html = template::submitted(&DisplayConfig::default(), &LimitsConfig::default(), &listing).into_string();

	assert!(html.starts_with(r#"<div id="message-list">"#), "{html}");
	assert!(html.contains(r#"id="message-list-items""#), "{html}");
	assert_eq!(html.matches(r#"hx-swap-oob="true""#).count(), 2, "{html}");
}

#[test]
fn test_page() {
	let display = DisplayConfig {
		title: "My <Guestbook>".to_string(),
		..Default::default()
	};

	let listing = EntryPage {
		page: 1,
		entries: vec![entry(1, "Ana", "Hi!")],
		has_more: false,
	};

	let html = template::page(&display, &LimitsConfig::default(), Some(&listing)).into_string();
	assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
	assert!(html.contains("<title>My &lt;Guestbook&gt;</title>"), "{html}");
	assert!(html.contains(r#"name="htmx-config""#), "{html}");
	assert!(html.contains("Recent Messages"), "{html}");
	assert!(html.contains(r#"id="form-status""#), "{html}");
	assert!(html.contains(r#"hx-get="/refresh-messages""#), "{html}");
	assert!(html.contains("Ana"), "{html}");

	let html = template::page(&display, &LimitsConfig::default(), None).into_string();
	assert!(html.contains(r#"id="guestbook-form""#), "{html}");
	assert!(html.contains(r#"class="error""#), "{html}");
	assert!(html.contains("unavailable"), "{html}");
}
