use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use self::builder::RouterBuilder;
use self::error::RouterError;
use self::middleware::{Middleware, NextFn, NextFut};
use self::route::{RouteHandler, RouteInfo};

pub mod builder;
pub mod error;
pub mod middleware;
mod route;

/// A method + path router on top of [`path_tree`].
///
/// Routes are stored as `/{METHOD}/{path}`, routes registered for any method
/// use `*` as the method segment so they act as a fallback.
pub struct Router<I, O, E> {
	routes: Vec<RouteHandler<I, O, E>>,
	middlewares: Vec<Arc<dyn Middleware<I, O, E>>>,
	tree: path_tree::PathTree<RouteInfo>,
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> Router<I, O, E> {
	pub fn builder() -> RouterBuilder<I, O, E> {
		RouterBuilder::new()
	}

	pub async fn handle(&self, req: hyper::Request<I>) -> Result<hyper::Response<O>, RouterError<E>> {
		let path = format!("/{}{}", req.method().as_str(), req.uri().path());
		let (info, _) = self.tree.find(&path).ok_or(RouterError::NotFound)?;

		let handler = self.routes[info.route].clone();

		let next: NextFn<I, O, E> = Box::new(move |req| Box::pin(async move { handler(req).await }) as NextFut<O, E>);

		info.middleware
			.iter()
			.rev()
			.map(|i| self.middlewares[*i].clone())
			.fold(next, |next, middleware| {
				Box::new(move |req| Box::pin(async move { middleware.handle(req, next).await }) as NextFut<O, E>)
					as NextFn<I, O, E>
			})(req)
		.await
		.map_err(RouterError::Unhandled)
	}
}

impl<I, O, E> Debug for Router<I, O, E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router").field("routes", &self.routes.len()).finish()
	}
}

#[cfg(test)]
mod tests;
