use std::sync::Arc;

use anyhow::Context as _;
use binary_helper::global::Context;
use binary_helper::{bootstrap, impl_global_traits};
use guestbook::config::{AppConfig, GuestbookConfig};
use guestbook::store::EntryStore;

struct GlobalState {
	ctx: Context,
	config: AppConfig,
	store: Arc<dyn EntryStore>,
}

impl_global_traits!(GlobalState);

impl binary_helper::global::GlobalConfigProvider<GuestbookConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &GuestbookConfig {
		&self.config.extra
	}
}

impl guestbook::global::GuestbookState for GlobalState {
	#[inline(always)]
	fn store(&self) -> &Arc<dyn EntryStore> {
		&self.store
	}
}

impl binary_helper::Global<AppConfig> for GlobalState {
	async fn new(ctx: Context, config: AppConfig) -> anyhow::Result<Self> {
		let store = guestbook::store::setup(&config).await?;

		Ok(Self { ctx, config, store })
	}
}

#[tokio::main]
pub async fn main() {
	if let Err(err) = bootstrap::<AppConfig, GlobalState, _>(|global| async move {
		guestbook::api::run(global).await.context("api server stopped unexpectedly")
	})
	.await
	{
		tracing::error!("{:#}", err);
		std::process::exit(1);
	}
}
