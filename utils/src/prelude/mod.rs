use std::time::Duration;

use futures_util::Future;
use tokio::time::Timeout;

/// `fut.timeout(d)` instead of `tokio::time::timeout(d, fut)`, reads better at
/// the end of a builder chain.
pub trait FutureTimeout: Future + Sized {
	fn timeout(self, duration: Duration) -> Timeout<Self> {
		tokio::time::timeout(duration, self)
	}
}

impl<F: Future> FutureTimeout for F {}
