use hyper::body::Incoming;
use hyper::StatusCode;
use utils::make_response;

use super::error::Result;
use super::request::global_state;
use super::Body;
use crate::config::GuestbookConfig;
use crate::global::GuestbookGlobal;
use crate::{service, template};

/// The full page. A failing store still renders the form, with a notice in
/// place of the list.
pub async fn index<G: GuestbookGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
	let global = global_state::<G>(&req)?;
	let config = global.config::<GuestbookConfig>();

	let (status, listing) = match service::list_page(global.store().as_ref(), 1, config.limits.page_size).await {
		Ok(listing) => (StatusCode::OK, Some(listing)),
		Err(err) => {
			tracing::error!(error = %err, "failed to list entries");
			(StatusCode::INTERNAL_SERVER_ERROR, None)
		}
	};

	Ok(make_response!(
		status,
		template::page(&config.display, &config.limits, listing.as_ref()).into_string()
	))
}
