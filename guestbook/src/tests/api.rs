use std::sync::Arc;

use reqwest::StatusCode;

use crate::config::GuestbookConfig;
use crate::store::EntryStore;
use crate::tests::utils::{FailingStore, TestServer};

fn http_client() -> reqwest::Client {
	reqwest::Client::builder().build().unwrap()
}

#[tokio::test]
async fn test_index() {
	let server = TestServer::start(GuestbookConfig::default()).await;
	let client = http_client();

	let res = client.get(server.url("/")).send().await.unwrap();
	assert_eq!(res.status(), StatusCode::OK);
	assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");

	let body = res.text().await.unwrap();
	assert!(body.contains("Recent Messages"), "{body}");
	assert!(body.contains(r#"id="empty-state""#), "{body}");
	assert!(body.contains(r#"name="htmx-config""#), "{body}");
	assert!(body.contains(r#"id="guestbook-form""#), "{body}");

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_submit_message() {
	let server = TestServer::start(GuestbookConfig::default()).await;
	let client = http_client();

	let res = client
		.post(server.url("/submit-message"))
		.header("HX-Request", "true")
		.form(&[("name", "Ana"), ("message", "Hi!")])
		.send()
		.await
		.unwrap();
	assert_eq!(res.status(), StatusCode::OK);
	assert!(res.headers().get("hx-retarget").is_none());

	let body = res.text().await.unwrap();
	assert!(body.starts_with(r#"<div id="message-list">"#), "{body}");
	assert!(body.contains(r#"id="message-list-items""#), "{body}");
	assert!(body.contains(r#"id="entry-1""#), "{body}");
	assert_eq!(body.matches(r#"hx-swap-oob="true""#).count(), 2, "{body}");

	let body = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
	assert!(body.contains("Ana"), "{body}");
	assert!(body.contains("Hi!"), "{body}");
	assert!(!body.contains("empty-state"), "{body}");

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_submit_invalid() {
	let server = TestServer::start(GuestbookConfig::default()).await;
	let client = http_client();

	let res = client
		.post(server.url("/submit-message"))
		.header("HX-Request", "true")
		.form(&[("name", "   "), ("message", "Hi!")])
		.send()
		.await
		.unwrap();
	assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(res.headers()["hx-retarget"], "#form-status");
	assert_eq!(res.headers()["hx-reswap"], "innerHTML");

	let body = res.text().await.unwrap();
	assert!(body.contains(r#"class="error""#), "{body}");
	assert!(body.contains("Please enter your name."), "{body}");

	// Plain form posts get the same fragment without the htmx headers.
	let res = client
		.post(server.url("/submit-message"))
		.form(&[("name", "Ana")])
		.send()
		.await
		.unwrap();
	assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
	assert!(res.headers().get("hx-retarget").is_none());
	assert!(res.text().await.unwrap().contains("Please enter a message."));

	let res = client
		.post(server.url("/submit-message"))
		.form(&[("name", "a".repeat(31).as_str()), ("message", "Hi!")])
		.send()
		.await
		.unwrap();
	assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

	assert!(server.global.store.list(0, 10).await.unwrap().is_empty());

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_submit_too_large() {
	let mut config = GuestbookConfig::default();
	config.api.max_body_size = 64;

	let server = TestServer::start(config).await;
	let client = http_client();

	let message = "m".repeat(1024);
	let res = client
		.post(server.url("/submit-message"))
		.form(&[("name", "Ana"), ("message", message.as_str())])
		.send()
		.await
		.unwrap();
	assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
	assert!(res.text().await.unwrap().contains("too large"));

	assert!(server.global.store.list(0, 10).await.unwrap().is_empty());

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_invalid_page() {
	let server = TestServer::start(GuestbookConfig::default()).await;
	let client = http_client();

	for page in ["abc", "0", "-2"] {
		let res = client
			.get(server.url(&format!("/messages?page={page}")))
			.send()
			.await
			.unwrap();
		assert_eq!(res.status(), StatusCode::BAD_REQUEST, "page={page}");
		assert!(res.text().await.unwrap().contains("Invalid page number."));
	}

	// A missing page is the first one.
	let res = client.get(server.url("/messages")).send().await.unwrap();
	assert_eq!(res.status(), StatusCode::OK);
	assert!(res.text().await.unwrap().contains("empty-state"));

	// Far past the end is an empty page, not a store error.
	let res = client
		.get(server.url("/messages?page=1000000000000000000"))
		.send()
		.await
		.unwrap();
	assert_eq!(res.status(), StatusCode::OK);
	assert!(!res.text().await.unwrap().contains("error"));

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_paging() {
	let server = TestServer::start(GuestbookConfig::default()).await;
	let client = http_client();

	for i in 1..=11 {
		let res = client
			.post(server.url("/submit-message"))
			.form(&[("name", format!("guest {i}")), ("message", format!("message {i}"))])
			.send()
			.await
			.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
	}

	let body = client.get(server.url("/refresh-messages")).send().await.unwrap().text().await.unwrap();
	assert!(body.starts_with(r#"<div id="message-list">"#), "{body}");
	assert!(body.contains("guest 11"), "{body}");
	assert!(body.contains("guest 2"), "{body}");
	assert!(!body.contains(r#"id="entry-1""#), "{body}");
	assert!(body.contains(r#"hx-get="/messages?page=2""#), "{body}");

	let body = client
		.get(server.url("/messages?page=2"))
		.send()
		.await
		.unwrap()
		.text()
		.await
		.unwrap();
	assert!(body.contains(r#"id="entry-1""#), "{body}");
	assert!(body.contains("message 1"), "{body}");
	assert!(!body.contains("load-more"), "{body}");

	// Past the end there is nothing left to show.
	let body = client
		.get(server.url("/messages?page=3"))
		.send()
		.await
		.unwrap()
		.text()
		.await
		.unwrap();
	assert!(!body.contains("entry-"), "{body}");
	assert!(!body.contains("empty-state"), "{body}");

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_submitted_html_is_escaped() {
	let server = TestServer::start(GuestbookConfig::default()).await;
	let client = http_client();

	let res = client
		.post(server.url("/submit-message"))
		.form(&[("name", "<b>Bob</b>"), ("message", "<script>alert(1)</script>")])
		.send()
		.await
		.unwrap();
	assert_eq!(res.status(), StatusCode::OK);

	let body = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
	assert!(body.contains("&lt;b&gt;Bob&lt;/b&gt;"), "{body}");
	assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"), "{body}");
	assert!(!body.contains("<b>Bob</b>"), "{body}");
	assert!(!body.contains("&amp;lt;"), "{body}");

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_health() {
	let server = TestServer::start(GuestbookConfig::default()).await;
	let client = http_client();

	let res = client.get(server.url("/health")).send().await.unwrap();
	assert_eq!(res.status(), StatusCode::OK);
	assert_eq!(res.headers()["content-type"], "application/json");
	assert_eq!(res.json::<serde_json::Value>().await.unwrap(), serde_json::json!({ "status": "ok" }));

	drop(client);
	server.teardown().await;

	let server = TestServer::start_with_store(GuestbookConfig::default(), Arc::new(FailingStore)).await;
	let client = http_client();

	let res = client.get(server.url("/health")).send().await.unwrap();
	assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(
		res.json::<serde_json::Value>().await.unwrap(),
		serde_json::json!({ "status": "unavailable" })
	);

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_not_found() {
	let server = TestServer::start(GuestbookConfig::default()).await;
	let client = http_client();

	let res = client.get(server.url("/nope")).send().await.unwrap();
	assert_eq!(res.status(), StatusCode::NOT_FOUND);
	assert!(res.text().await.unwrap().contains(r#"<p class="error" role="alert">Page not found.</p>"#));

	// Routes only answer on their own method.
	let res = client.get(server.url("/submit-message")).send().await.unwrap();
	assert_eq!(res.status(), StatusCode::NOT_FOUND);

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_store_unavailable() {
	let server = TestServer::start_with_store(GuestbookConfig::default(), Arc::new(FailingStore)).await;
	let client = http_client();

	let res = client.get(server.url("/")).send().await.unwrap();
	assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let body = res.text().await.unwrap();
	assert!(body.contains(r#"id="guestbook-form""#), "{body}");
	assert!(body.contains("unavailable"), "{body}");

	let res = client
		.post(server.url("/submit-message"))
		.header("HX-Request", "true")
		.form(&[("name", "Ana"), ("message", "Hi!")])
		.send()
		.await
		.unwrap();
	assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(res.headers()["hx-retarget"], "#form-status");
	assert!(res.text().await.unwrap().contains("Failed to save your message"));

	let res = client.get(server.url("/messages?page=2")).send().await.unwrap();
	assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

	drop(client);
	server.teardown().await;
}

#[tokio::test]
async fn test_store_shared_with_global() {
	let server = TestServer::start(GuestbookConfig::default()).await;

	crate::tests::utils::seed(server.global.store.as_ref(), 3).await;

	let body = reqwest::get(server.url("/refresh-messages")).await.unwrap().text().await.unwrap();
	assert!(body.contains("guest 3"), "{body}");

	let entries = server.global.store.list(0, 10).await.unwrap();
	assert_eq!(entries.len(), 3);

	server.teardown().await;
}
