use std::time::Duration;

use super::*;

#[tokio::test]
async fn test_context_cancel() {
	let (ctx, handler) = Context::new();

	let handle = tokio::spawn(async move {
		ctx.done().await;
	});

	tokio::time::timeout(Duration::from_millis(300), handler.cancel())
		.await
		.expect("task should be cancelled");
	tokio::time::timeout(Duration::from_millis(300), handle)
		.await
		.expect("task should be cancelled")
		.expect("panic in task");
}

#[tokio::test]
async fn test_context_cancel_waits_for_clones() {
	let (ctx, handler) = Context::new();
	let clone = ctx.clone();
	drop(ctx);

	let cancel = tokio::spawn(handler.cancel());

	// The clone is still alive so cancel must not have completed yet.
	tokio::time::sleep(Duration::from_millis(50)).await;
	assert!(!cancel.is_finished());

	clone.done().await;
	drop(clone);

	tokio::time::timeout(Duration::from_millis(300), cancel)
		.await
		.expect("cancel should complete once all contexts are dropped")
		.expect("panic in task");
}
