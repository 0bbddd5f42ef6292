use hyper::body::Incoming;
use hyper::StatusCode;
use serde_json::json;
use utils::make_response;

use super::error::Result;
use super::request::global_state;
use super::Body;
use crate::global::GuestbookGlobal;

const JSON_CONTENT_TYPE: &str = "application/json";

pub async fn health<G: GuestbookGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
	let global = global_state::<G>(&req)?;

	Ok(match global.store().health().await {
		Ok(()) => make_response!(StatusCode::OK, JSON_CONTENT_TYPE, json!({ "status": "ok" })),
		Err(err) => {
			tracing::warn!(error = %err, "store health check failed");
			make_response!(StatusCode::SERVICE_UNAVAILABLE, JSON_CONTENT_TYPE, json!({ "status": "unavailable" }))
		}
	})
}
