use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use binary_helper::config::TlsConfig;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use tokio::net::TcpSocket;
use tokio::select;
use utils::http::router::Router;
use utils::http::RouteError;
use utils::prelude::FutureTimeout;

use self::error::ApiError;
use crate::config::GuestbookConfig;
use crate::global::GuestbookGlobal;

pub mod error;
mod health;
mod messages;
mod middleware;
mod pages;
mod request;

pub type Body = Full<Bytes>;

pub fn routes<G: GuestbookGlobal>(global: &Arc<G>) -> Router<Incoming, Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		.middleware(middleware::trace())
		.get("/", pages::index::<G>)
		.post("/submit-message", messages::submit::<G>)
		.get("/messages", messages::list::<G>)
		.get("/refresh-messages", messages::refresh::<G>)
		.get("/health", health::health::<G>)
		.error_handler(error::error_handler)
		.not_found(|_| async move { Err((StatusCode::NOT_FOUND, "Page not found.").into()) })
		.build()
}

async fn tls_acceptor(tls: &TlsConfig) -> anyhow::Result<tokio_rustls::TlsAcceptor> {
	let cert = tokio::fs::read(&tls.cert).await.context("failed to read api ssl cert")?;
	let key = tokio::fs::read(&tls.key).await.context("failed to read api ssl private key")?;

	let key = rustls_pemfile::private_key(&mut io::BufReader::new(io::Cursor::new(key)))?
		.ok_or_else(|| anyhow::anyhow!("failed to find private key in api private key file"))?;

	let certs = rustls_pemfile::certs(&mut io::BufReader::new(io::Cursor::new(cert))).collect::<Result<Vec<_>, _>>()?;

	Ok(tokio_rustls::TlsAcceptor::from(Arc::new(
		rustls::ServerConfig::builder()
			.with_no_client_auth()
			.with_single_cert(certs, key)?,
	)))
}

pub async fn run<G: GuestbookGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = &global.config::<GuestbookConfig>().api;

	tracing::info!("listening on {}", config.bind_address);
	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.set_reuseport(true)?;
	socket.bind(config.bind_address)?;
	let listener = socket.listen(1024)?;

	let tls_acceptor = match &config.tls {
		Some(tls) => {
			tracing::info!("tls enabled");
			Some(Arc::new(tls_acceptor(tls).await?))
		}
		None => None,
	};

	// The router only holds a weak reference to the global state, so open
	// keep-alive connections do not keep it alive during shutdown.
	let router = Arc::new(routes(&global));
	let service = service_fn(move |req| {
		let this = router.clone();
		async move { this.handle(req).await }
	});

	loop {
		select! {
			_ = global.ctx().done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;

				let service = service.clone();
				let tls_acceptor = tls_acceptor.clone();

				tracing::debug!("accepted connection from {}", addr);

				tokio::spawn(async move {
					let http = http1::Builder::new();

					if let Some(tls_acceptor) = tls_acceptor {
						let Ok(Ok(socket)) = tls_acceptor.accept(socket).timeout(Duration::from_secs(5)).await else {
							tracing::debug!("tls handshake failed");
							return;
						};

						http.serve_connection(TokioIo::new(socket), service).await.ok();
					} else {
						http.serve_connection(TokioIo::new(socket), service).await.ok();
					}
				});
			},
		}
	}
}
