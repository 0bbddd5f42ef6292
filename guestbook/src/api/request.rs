use std::sync::Arc;

use binary_helper::global::RequestGlobalExt;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::StatusCode;

use super::error::{ApiError, Result};

pub fn global_state<G: Send + Sync + 'static>(req: &hyper::Request<impl Sized>) -> Result<Arc<G>> {
	req.get_global()
}

/// Reads the whole body, rejecting it once it grows past `limit` bytes.
pub async fn read_body<B>(req: hyper::Request<B>, limit: usize) -> Result<Bytes>
where
	B: hyper::body::Body,
	B::Error: std::error::Error + Send + Sync + 'static,
{
	match Limited::new(req.into_body(), limit).collect().await {
		Ok(collected) => Ok(collected.to_bytes()),
		Err(err) if err.is::<LengthLimitError>() => {
			Err((StatusCode::PAYLOAD_TOO_LARGE, "Your submission is too large.", ApiError::ReadBody(err)).into())
		}
		Err(err) => Err((StatusCode::BAD_REQUEST, "Failed to read your submission.", ApiError::ReadBody(err)).into()),
	}
}

/// Value of the first `key` parameter in the query string.
pub fn query_param(req: &hyper::Request<impl Sized>, key: &str) -> Option<String> {
	url::form_urlencoded::parse(req.uri().query()?.as_bytes())
		.find(|(k, _)| k == key)
		.map(|(_, v)| v.into_owned())
}
