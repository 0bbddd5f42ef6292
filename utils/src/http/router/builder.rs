use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use futures_util::Future;

use super::middleware::{Middleware, NextFn};
use super::route::{Route, RouteInfo};
use super::Router;

/// Middlewares run in this order regardless of registration order: request data
/// first, then the error handler, then everything else.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
enum MiddlewareKind {
	Data,
	Error,
	Generic,
}

pub struct RouterBuilder<I, O, E> {
	routes: Vec<(&'static str, Route<I, O, E>)>,
	middlewares: Vec<(Arc<dyn Middleware<I, O, E>>, MiddlewareKind)>,
}

impl<I, O, E> Debug for RouterBuilder<I, O, E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterBuilder").field("routes", &self.routes).finish()
	}
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> Default for RouterBuilder<I, O, E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> RouterBuilder<I, O, E> {
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			middlewares: Vec::new(),
		}
	}

	pub fn middleware(mut self, middleware: impl Middleware<I, O, E> + 'static) -> Self {
		self.middlewares.push((Arc::new(middleware), MiddlewareKind::Generic));
		self
	}

	/// Inserts a clone of `data` into the extensions of every request.
	pub fn data<T: Clone + Send + Sync + 'static>(mut self, data: T) -> Self {
		self.middlewares.push((
			Arc::new(move |mut req: hyper::Request<I>, next: NextFn<I, O, E>| {
				req.extensions_mut().insert(data.clone());
				next(req)
			}),
			MiddlewareKind::Data,
		));

		self
	}

	/// Turns every error returned further down the chain into a response.
	pub fn error_handler<F: Future<Output = hyper::Response<O>> + Send + 'static>(
		mut self,
		handler: impl Fn(hyper::Request<()>, E) -> F + Send + Sync + 'static,
	) -> Self {
		let handler = Arc::new(handler);
		self.middlewares.push((
			Arc::new(move |req: hyper::Request<I>, next: NextFn<I, O, E>| {
				let handler = handler.clone();
				async move {
					let (parts, body) = req.into_parts();

					match next(hyper::Request::from_parts(parts.clone(), body)).await {
						Ok(res) => Ok(res),
						Err(err) => Ok(handler(hyper::Request::from_parts(parts, ()), err).await),
					}
				}
			}),
			MiddlewareKind::Error,
		));

		self
	}

	pub fn get<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(Some(hyper::Method::GET), path, handler)
	}

	pub fn post<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(Some(hyper::Method::POST), path, handler)
	}

	pub fn any<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(None, path, handler)
	}

	pub fn add_route<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		mut self,
		method: Option<hyper::Method>,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.routes.push((
			path,
			Route {
				method,
				handler: Arc::new(move |req| Box::pin(handler(req))),
			},
		));
		self
	}

	/// Fallback for any method and path that no other route matches.
	pub fn not_found<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(None, "/*", handler)
	}

	pub fn build(mut self) -> Router<I, O, E> {
		let mut router = Router {
			routes: Vec::new(),
			middlewares: Vec::new(),
			tree: path_tree::PathTree::new(),
		};

		self.middlewares.sort_by_key(|(_, kind)| *kind);

		let middleware = self
			.middlewares
			.into_iter()
			.map(|(handler, _)| {
				router.middlewares.push(handler);
				router.middlewares.len() - 1
			})
			.collect::<Vec<_>>();

		for (path, route) in self.routes {
			let method = route.method.as_ref().map(|m| m.as_str()).unwrap_or("*");
			let full_path = format!("/{method}/{}", path.trim_matches('/'));

			tracing::debug!(path, full_path, "adding route");

			router.routes.push(route.handler);
			let _ = router.tree.insert(
				&full_path,
				RouteInfo {
					route: router.routes.len() - 1,
					middleware: middleware.clone(),
				},
			);
		}

		router
	}
}
