use std::sync::{Arc, Mutex};

use http::StatusCode;

use super::error::RouterError;
use super::middleware::{middleware_fn, NextFn};
use super::Router;

fn request(method: hyper::Method, path: &str) -> hyper::Request<()> {
	hyper::Request::builder()
		.method(method)
		.uri(path)
		.body(())
		.expect("valid request")
}

fn ok(body: &str) -> Result<hyper::Response<String>, String> {
	Ok(hyper::Response::new(body.to_owned()))
}

#[tokio::test]
async fn test_routes_match_on_method_and_path() {
	let router = Router::<(), String, String>::builder()
		.get("/", |_| async move { ok("index") })
		.post("/submit-message", |_| async move { ok("submitted") })
		.get("/messages", |_| async move { ok("messages") })
		.build();

	let res = router.handle(request(hyper::Method::GET, "/")).await.unwrap();
	assert_eq!(res.body(), "index");

	let res = router
		.handle(request(hyper::Method::POST, "/submit-message"))
		.await
		.unwrap();
	assert_eq!(res.body(), "submitted");

	let res = router
		.handle(request(hyper::Method::GET, "/messages?page=2"))
		.await
		.unwrap();
	assert_eq!(res.body(), "messages");

	let err = router
		.handle(request(hyper::Method::GET, "/submit-message"))
		.await
		.expect_err("GET is not registered for this path");
	assert!(matches!(err, RouterError::NotFound));
}

#[tokio::test]
async fn test_not_found_fallback() {
	let router = Router::<(), String, String>::builder()
		.get("/", |_| async move { ok("index") })
		.not_found(|_| async move { ok("missing") })
		.build();

	let res = router.handle(request(hyper::Method::GET, "/")).await.unwrap();
	assert_eq!(res.body(), "index");

	for (method, path) in [
		(hyper::Method::GET, "/nope"),
		(hyper::Method::DELETE, "/"),
		(hyper::Method::POST, "/a/b/c"),
	] {
		let res = router.handle(request(method, path)).await.unwrap();
		assert_eq!(res.body(), "missing");
	}
}

#[derive(Clone)]
struct Greeting(&'static str);

#[tokio::test]
async fn test_data_and_error_handler_ordering() {
	let seen = Arc::new(Mutex::new(Vec::new()));

	let trace = {
		let seen = seen.clone();
		middleware_fn(move |req: hyper::Request<()>, next: NextFn<(), String, String>| {
			let seen = seen.clone();
			async move {
				// Request data is injected before any generic middleware runs.
				assert!(req.extensions().get::<Greeting>().is_some());
				let res = next(req).await;
				seen.lock().unwrap().push(res.is_ok());
				res
			}
		})
	};

	let router = Router::<(), String, String>::builder()
		.middleware(trace)
		.get("/hello", |req: hyper::Request<()>| async move {
			let greeting = req.extensions().get::<Greeting>().expect("data missing");
			ok(greeting.0)
		})
		.get("/fail", |_| async move { Err("broken".to_owned()) })
		.error_handler(|_, err: String| async move {
			let mut res = hyper::Response::new(format!("handled: {err}"));
			*res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
			res
		})
		.data(Greeting("hi"))
		.build();

	let res = router.handle(request(hyper::Method::GET, "/hello")).await.unwrap();
	assert_eq!(res.body(), "hi");

	let res = router.handle(request(hyper::Method::GET, "/fail")).await.unwrap();
	assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(res.body(), "handled: broken");

	// The error handler wraps generic middlewares, so they observe the raw error.
	assert_eq!(*seen.lock().unwrap(), vec![true, false]);
}
