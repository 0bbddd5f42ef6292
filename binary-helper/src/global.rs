use std::io;
use std::sync::{Arc, Weak};

use anyhow::Context as _;
use bytes::Bytes;
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use hyper::StatusCode;
use rustls::RootCertStore;
use tokio_postgres::NoTls;
pub use utils::context::Context;
use utils::http::RouteError;

use crate::config::{DatabaseConfig, TlsConfig};

#[macro_export]
macro_rules! impl_global_traits {
	($struct:ty) => {
		impl $crate::global::GlobalCtx for $struct {
			#[inline(always)]
			fn ctx(&self) -> &$crate::global::Context {
				&self.ctx
			}
		}

		impl $crate::global::GlobalConfig for $struct {}
	};
}

pub trait GlobalCtx {
	fn ctx(&self) -> &Context;
}

pub trait GlobalConfig {
	#[inline(always)]
	fn config<C>(&self) -> &C
	where
		Self: GlobalConfigProvider<C>,
	{
		GlobalConfigProvider::provide_config(self)
	}
}

pub trait GlobalConfigProvider<C> {
	fn provide_config(&self) -> &C;
}

async fn client_tls(tls: &TlsConfig) -> anyhow::Result<rustls::ClientConfig> {
	let mut cert_store = RootCertStore::empty();
	if let Some(ca_cert) = &tls.ca_cert {
		let ca_cert = tokio::fs::read(ca_cert).await.context("failed to read database ca cert")?;
		let ca_certs =
			rustls_pemfile::certs(&mut io::BufReader::new(io::Cursor::new(ca_cert))).collect::<Result<Vec<_>, _>>()?;
		for cert in ca_certs {
			cert_store.add(cert).context("failed to add database ca cert")?;
		}
	}

	let builder = rustls::ClientConfig::builder().with_root_certificates(cert_store);

	// Client auth is only used when a client cert is configured.
	if tls.cert.is_empty() {
		return Ok(builder.with_no_client_auth());
	}

	let cert = tokio::fs::read(&tls.cert).await.context("failed to read database client cert")?;
	let key = tokio::fs::read(&tls.key)
		.await
		.context("failed to read database client private key")?;

	let key = rustls_pemfile::private_key(&mut io::BufReader::new(io::Cursor::new(key)))?
		.ok_or_else(|| anyhow::anyhow!("failed to find private key in database client private key file"))?;

	let certs = rustls_pemfile::certs(&mut io::BufReader::new(io::Cursor::new(cert))).collect::<Result<Vec<_>, _>>()?;

	builder
		.with_client_auth_cert(certs, key)
		.context("failed to create database tls config")
}

/// Builds a postgres pool. Connections are opened lazily, so an unreachable
/// database only shows up on first use.
pub async fn setup_database(config: &DatabaseConfig) -> anyhow::Result<Arc<Pool>> {
	let uri = config.uri.as_deref().context("database uri is not set")?;

	let mut pg_config = uri.parse::<tokio_postgres::Config>().context("invalid database uri")?;

	let manager_config = ManagerConfig {
		recycling_method: RecyclingMethod::Fast,
	};

	let manager = if let Some(tls) = &config.tls {
		pg_config.ssl_mode(tokio_postgres::config::SslMode::Require);

		Manager::from_config(
			pg_config,
			tokio_postgres_rustls::MakeRustlsConnect::new(client_tls(tls).await?),
			manager_config,
		)
	} else {
		Manager::from_config(pg_config, NoTls, manager_config)
	};

	Ok(Arc::new(
		Pool::builder(manager)
			.config(PoolConfig::default())
			.runtime(Runtime::Tokio1)
			.build()
			.context("failed to create database pool")?,
	))
}

pub trait RequestGlobalExt<E> {
	fn get_global<G: Sync + Send + 'static, B: From<Bytes>>(&self) -> std::result::Result<Arc<G>, RouteError<E, B>>;
}

impl<E, B> RequestGlobalExt<E> for hyper::Request<B> {
	fn get_global<G: Sync + Send + 'static, B2: From<Bytes>>(&self) -> std::result::Result<Arc<G>, RouteError<E, B2>> {
		Ok(self
			.extensions()
			.get::<Weak<G>>()
			.ok_or((StatusCode::INTERNAL_SERVER_ERROR, "global state not set"))?
			.upgrade()
			.ok_or((StatusCode::INTERNAL_SERVER_ERROR, "failed to upgrade global state"))?)
	}
}
