use hyper::header::HeaderValue;
use utils::http::RouteError;

use super::Body;
use crate::entry::ValidationError;
use crate::service::InvalidPage;
use crate::store::StoreError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("failed to read request body: {0}")]
	ReadBody(#[source] Box<dyn std::error::Error + Send + Sync>),
	#[error("invalid submission: {0}")]
	Validation(#[from] ValidationError),
	#[error("{0}")]
	Page(#[from] InvalidPage),
	#[error("store error: {0}")]
	Store(#[from] StoreError),
}

/// Logs the error and, for htmx requests, points the swap at the status area
/// next to the form so the current list stays on the page.
pub async fn error_handler(req: hyper::Request<()>, err: RouteError<ApiError>) -> hyper::Response<Body> {
	let htmx = req.headers().contains_key("hx-request");

	let mut res = utils::http::error_handler(req, err).await;

	if htmx {
		res.headers_mut().insert("hx-retarget", HeaderValue::from_static("#form-status"));
		res.headers_mut().insert("hx-reswap", HeaderValue::from_static("innerHTML"));
	}

	res
}
