use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};

struct RawContext {
	// Dropped together with the last context clone, which wakes `Handler::cancel`.
	_alive: oneshot::Sender<()>,
	cancel_receiver: broadcast::Receiver<()>,
}

/// The owning side of a [`Context`].
///
/// Cancelling the handler wakes every task waiting on [`Context::done`] and then
/// waits until all clones of the context have been dropped.
pub struct Handler {
	alive: oneshot::Receiver<()>,
	cancel_sender: broadcast::Sender<()>,
}

impl Handler {
	pub async fn cancel(self) {
		drop(self.cancel_sender);

		let _ = self.alive.await;
	}
}

/// A cheap, clonable cancellation signal shared by every long running task of
/// the process.
#[derive(Clone)]
pub struct Context(Arc<RawContext>);

impl Context {
	#[must_use]
	pub fn new() -> (Self, Handler) {
		let (alive_sender, alive) = oneshot::channel();
		let (cancel_sender, cancel_receiver) = broadcast::channel(1);

		(
			Self(Arc::new(RawContext {
				_alive: alive_sender,
				cancel_receiver,
			})),
			Handler { alive, cancel_sender },
		)
	}

	/// Resolves when the owning [`Handler`] is cancelled or dropped.
	pub async fn done(&self) {
		let mut recv = self.0.cancel_receiver.resubscribe();
		let _ = recv.recv().await;
	}
}

#[cfg(test)]
mod tests;
