//! Cache warming ahead of visibility
//!
//! These helpers share nothing with attached elements; they only ask the probe
//! to fetch sources so the browser cache holds them before they scroll into view.

use super::{ImageProbe, LoadError};
use futures::future::try_join_all;

/// Loads a single image source.
pub async fn preload_image<P>(probe: &P, src: &str) -> Result<(), LoadError>
where
	P: ImageProbe + ?Sized,
{
	probe.probe(src).await
}

/// Loads every source concurrently; fails with the first error reported.
pub async fn preload_images<P, I, S>(probe: &P, sources: I) -> Result<(), LoadError>
where
	P: ImageProbe + ?Sized,
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let sources: Vec<S> = sources.into_iter().collect();
	try_join_all(sources.iter().map(|src| probe.probe(src.as_ref()))).await?;
	Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use rstest::rstest;
	use std::cell::RefCell;

	#[derive(Default)]
	struct RecordingProbe {
		requested: RefCell<Vec<String>>,
	}

	#[async_trait(?Send)]
	impl ImageProbe for RecordingProbe {
		async fn probe(&self, src: &str) -> Result<(), LoadError> {
			self.requested.borrow_mut().push(src.to_string());
			if src.contains("missing") {
				Err(LoadError::failed(src))
			} else {
				Ok(())
			}
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_preload_image_success() {
		let probe = RecordingProbe::default();
		assert_eq!(preload_image(&probe, "/a.png").await, Ok(()));
		assert_eq!(*probe.requested.borrow(), vec!["/a.png".to_string()]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_preload_images_requests_every_source() {
		let probe = RecordingProbe::default();
		preload_images(&probe, ["/a.png", "/b.png", "/c.png"])
			.await
			.unwrap();
		assert_eq!(probe.requested.borrow().len(), 3);
	}

	#[rstest]
	#[tokio::test]
	async fn test_preload_images_fails_if_any_source_fails() {
		let probe = RecordingProbe::default();
		let result = preload_images(&probe, vec!["/a.png", "/missing.png"]).await;
		assert_eq!(result, Err(LoadError::failed("/missing.png")));
	}

	#[rstest]
	#[tokio::test]
	async fn test_preload_images_empty_is_ok() {
		let probe = RecordingProbe::default();
		let sources: Vec<String> = Vec::new();
		assert_eq!(preload_images(&probe, sources).await, Ok(()));
	}
}
