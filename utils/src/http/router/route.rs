use std::fmt::{Debug, Formatter};
use std::pin::Pin;
use std::sync::Arc;

use futures_util::Future;

pub(crate) type RouteHandler<I, O, E> = Arc<
	dyn Fn(hyper::Request<I>) -> Pin<Box<dyn Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>>
		+ Send
		+ Sync
		+ 'static,
>;

pub(crate) struct Route<I, O, E> {
	pub method: Option<hyper::Method>,
	pub handler: RouteHandler<I, O, E>,
}

impl<I, O, E> Debug for Route<I, O, E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route").field("method", &self.method).finish()
	}
}

#[derive(Debug)]
pub(crate) struct RouteInfo {
	pub route: usize,
	pub middleware: Vec<usize>,
}
