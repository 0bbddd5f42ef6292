//! HTML rendering for the page and the htmx fragments.
//!
//! Entry names and messages are escaped before they are stored, so they are
//! emitted as is.

use chrono::{DateTime, SecondsFormat, Utc};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::{DisplayConfig, LimitsConfig};
use crate::entry::Entry;
use crate::service::EntryPage;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.3";

/// Swap error responses too, the server retargets them at the status area.
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"[45]..","swap":true,"error":true}]}"#;

const PLACEHOLDER: &str = "Unknown";

pub fn page(display: &DisplayConfig, limits: &LimitsConfig, listing: Option<&EntryPage>) -> Markup {
	html! {
		(DOCTYPE)
		html lang="en" {
			head {
				meta charset="utf-8";
				meta name="viewport" content="width=device-width, initial-scale=1";
				meta name="htmx-config" content=(HTMX_CONFIG);
				title { (display.title) }
				script src=(HTMX_SRC) {}
			}
			body {
				main {
					h1 { (display.title) }
					(form(limits, false))
					(status(false))
					section aria-labelledby="messages-heading" {
						header {
							h2 id="messages-heading" { "Recent Messages" }
							button type="button" id="refresh" hx-get="/refresh-messages" hx-target="#message-list" hx-swap="outerHTML" {
								"Refresh"
							}
						}
						@match listing {
							Some(listing) => { (message_list(display, listing)) }
							None => { (unavailable()) }
						}
					}
				}
			}
		}
	}
}

/// The submission form. With `oob` set it replaces the form already on the
/// page, which clears the inputs after a successful submit.
pub fn form(limits: &LimitsConfig, oob: bool) -> Markup {
	html! {
		form id="guestbook-form" hx-post="/submit-message" hx-target="#message-list" hx-swap="outerHTML" hx-swap-oob=[oob.then_some("true")] {
			label for="name" { "Name" }
			input id="name" type="text" name="name" required maxlength=(limits.max_name_chars) placeholder="Your name";
			label for="message" { "Message" }
			textarea id="message" name="message" required maxlength=[limits.max_message_chars] placeholder="Your message" {}
			button type="submit" { "Sign the guestbook" }
		}
	}
}

fn status(oob: bool) -> Markup {
	html! {
		div id="form-status" role="status" aria-live="polite" hx-swap-oob=[oob.then_some("true")] {}
	}
}

/// Response to a successful submit: the refreshed list plus out-of-band swaps
/// that reset the form and clear any previous error.
pub fn submitted(display: &DisplayConfig, limits: &LimitsConfig, listing: &EntryPage) -> Markup {
	html! {
		(message_list(display, listing))
		(form(limits, true))
		(status(true))
	}
}

pub fn message_list(display: &DisplayConfig, listing: &EntryPage) -> Markup {
	html! {
		div id="message-list" {
			@if listing.entries.is_empty() && listing.page == 1 {
				(empty_state())
			} @else {
				div id="message-list-items" {
					(message_rows(display, listing))
				}
			}
		}
	}
}

/// The entries of a page followed by the control that loads the next one.
pub fn message_rows(display: &DisplayConfig, listing: &EntryPage) -> Markup {
	html! {
		@for item in &listing.entries {
			(entry(display, item))
		}
		@if listing.has_more {
			(load_more(listing.page + 1))
		}
	}
}

pub fn entry(display: &DisplayConfig, entry: &Entry) -> Markup {
	html! {
		article class="entry" id=(format!("entry-{}", entry.id)) {
			header {
				strong class="entry-name" { (PreEscaped(or_placeholder(&entry.name))) }
				" "
				time datetime=(entry.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)) {
					(timestamp(display, entry.created_at))
				}
			}
			p class="entry-message" { (PreEscaped(or_placeholder(&entry.message))) }
		}
	}
}

pub fn load_more(next_page: usize) -> Markup {
	html! {
		div id="load-more" {
			button type="button" hx-get=(format!("/messages?page={next_page}")) hx-target="#load-more" hx-swap="outerHTML" {
				"Load more"
			}
		}
	}
}

pub fn empty_state() -> Markup {
	html! {
		p id="empty-state" { "No messages yet. Be the first to sign the guestbook!" }
	}
}

fn unavailable() -> Markup {
	html! {
		div id="message-list" {
			(utils::http::error_fragment("Messages are unavailable right now, please try again later."))
		}
	}
}

/// Formats an instant in the configured display offset, e.g.
/// `2024-03-01 02:05:09 PM UTC`.
pub fn timestamp(display: &DisplayConfig, at: DateTime<Utc>) -> String {
	format!(
		"{} {}",
		at.with_timezone(&display.offset()).format("%Y-%m-%d %I:%M:%S %p"),
		display.timezone_label
	)
}

fn or_placeholder(value: &str) -> &str {
	if value.trim().is_empty() {
		PLACEHOLDER
	} else {
		value
	}
}
