//! Image load errors

use thiserror::Error;

/// Errors produced while probing an image source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
	/// The browser reported an error event for the source.
	#[error("Failed to load image: {src}")]
	Failed {
		/// The source that failed to load
		src: String,
	},
	/// The probe could not be started (no window, no image element, ...).
	#[error("Image probe unavailable: {0}")]
	Unavailable(String),
}

impl LoadError {
	/// Creates a [`LoadError::Failed`] for `src`.
	pub fn failed(src: impl Into<String>) -> Self {
		Self::Failed { src: src.into() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_failed_display() {
		let err = LoadError::failed("/a.png");
		assert_eq!(err.to_string(), "Failed to load image: /a.png");
	}

	#[rstest]
	fn test_unavailable_display() {
		let err = LoadError::Unavailable("no window".into());
		assert_eq!(err.to_string(), "Image probe unavailable: no window");
	}
}
