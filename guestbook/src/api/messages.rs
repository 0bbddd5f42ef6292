use hyper::body::Incoming;
use hyper::StatusCode;
use utils::http::ext::ResultExt;
use utils::make_response;

use super::error::Result;
use super::request::{global_state, query_param, read_body};
use super::Body;
use crate::config::GuestbookConfig;
use crate::entry::Submission;
use crate::global::GuestbookGlobal;
use crate::service::{self, SubmitError};
use crate::template;

const STORE_UNAVAILABLE: &str = "Messages are unavailable right now, please try again later.";

pub async fn submit<G: GuestbookGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
	let global = global_state::<G>(&req)?;
	let config = global.config::<GuestbookConfig>();

	let body = read_body(req, config.api.max_body_size).await?;
	let submission = Submission::from_form(&body);

	let listing = match service::submit(global.store().as_ref(), &config.limits, &submission).await {
		Ok(listing) => listing,
		Err(SubmitError::Validation(err)) => {
			return Err((StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), err).into());
		}
		Err(SubmitError::Store(err)) => {
			return Err((
				StatusCode::INTERNAL_SERVER_ERROR,
				"Failed to save your message, please try again.",
				err,
			)
				.into());
		}
	};

	Ok(make_response!(
		StatusCode::OK,
		template::submitted(&config.display, &config.limits, &listing).into_string()
	))
}

/// One page of rows for the load more control.
pub async fn list<G: GuestbookGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
	let global = global_state::<G>(&req)?;
	let config = global.config::<GuestbookConfig>();

	let page = service::parse_page(query_param(&req, "page").as_deref())
		.map_err_route((StatusCode::BAD_REQUEST, "Invalid page number."))?;

	let listing = service::list_page(global.store().as_ref(), page, config.limits.page_size)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, STORE_UNAVAILABLE))?;

	let body = if listing.entries.is_empty() && listing.page == 1 {
		template::empty_state()
	} else {
		template::message_rows(&config.display, &listing)
	};

	Ok(make_response!(StatusCode::OK, body.into_string()))
}

pub async fn refresh<G: GuestbookGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
	let global = global_state::<G>(&req)?;
	let config = global.config::<GuestbookConfig>();

	let listing = service::list_page(global.store().as_ref(), 1, config.limits.page_size)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, STORE_UNAVAILABLE))?;

	Ok(make_response!(
		StatusCode::OK,
		template::message_list(&config.display, &listing).into_string()
	))
}
