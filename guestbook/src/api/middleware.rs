use std::time::Instant;

use tracing::Instrument;
use utils::http::router::middleware::{middleware_fn, Middleware, NextFn};
use utils::http::RouteError;

use super::error::ApiError;
use super::Body;

/// Runs every request in a `request` span and logs its outcome.
pub fn trace<I: Send + 'static>() -> impl Middleware<I, Body, RouteError<ApiError>> {
	middleware_fn(|req: hyper::Request<I>, next: NextFn<I, Body, RouteError<ApiError>>| {
		let span = tracing::info_span!("request", method = %req.method(), path = %req.uri().path());

		async move {
			let start = Instant::now();

			let res = next(req).await;

			let status = match &res {
				Ok(res) => res.status(),
				Err(err) => err.status(),
			};

			tracing::info!(status = status.as_u16(), elapsed_ms = start.elapsed().as_millis() as u64, "request completed");

			res
		}
		.instrument(span)
	})
}
