use std::sync::Arc;

use crate::config::GuestbookConfig;
use crate::store::EntryStore;

pub trait GuestbookState {
	fn store(&self) -> &Arc<dyn EntryStore>;
}

pub trait GuestbookGlobal:
	binary_helper::global::GlobalCtx
	+ binary_helper::global::GlobalConfigProvider<GuestbookConfig>
	+ binary_helper::global::GlobalConfig
	+ GuestbookState
	+ Send
	+ Sync
	+ 'static
{
}

impl<T> GuestbookGlobal for T where
	T: binary_helper::global::GlobalCtx
		+ binary_helper::global::GlobalConfigProvider<GuestbookConfig>
		+ binary_helper::global::GlobalConfig
		+ GuestbookState
		+ Send
		+ Sync
		+ 'static
{
}
