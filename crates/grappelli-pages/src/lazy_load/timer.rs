//! Timers used for retry backoff and the post-load delay

use async_trait::async_trait;
use std::time::Duration;

/// An async sleep.
#[async_trait(?Send)]
pub trait Timer {
	async fn sleep(&self, duration: Duration);
}

/// [`Timer`] backed by `tokio::time::sleep`.
///
/// Works with a paused tokio clock, which makes backoff timing testable.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Timer for TokioTimer {
	async fn sleep(&self, duration: Duration) {
		tokio::time::sleep(duration).await;
	}
}
