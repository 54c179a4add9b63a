//! Lazy-load configuration
//!
//! [`LazyLoadOptions`] is the complete configuration an attached element works
//! with. [`LazyLoadOverrides`] is its partial form, used both for per-element
//! bindings and for changing the process-wide defaults.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// Grey picture outline shown before the element becomes visible.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = r##"data:image/svg+xml,%3Csvg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24"%3E%3Cpath fill="%23d1d5db" d="M4 4a2 2 0 00-2 2v12a2 2 0 002 2h16a2 2 0 002-2V6a2 2 0 00-2-2H4zm16 2v8.59l-3.3-3.3a1 1 0 00-1.4 0L9 17.59l-2.3-2.3a1 1 0 00-1.4 0L4 16.59V6h16z"/%3E%3C/svg%3E"##;

/// Red badge shown once every retry has failed.
pub const DEFAULT_ERROR_IMAGE: &str = r##"data:image/svg+xml,%3Csvg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24"%3E%3Cpath fill="%23ef4444" d="M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm-2 15l-5-5 1.41-1.41L10 14.17l7.59-7.59L19 8l-9 9z"/%3E%3C/svg%3E"##;

/// Animated spinner shown while the real image is being fetched.
pub const DEFAULT_LOADING_IMAGE: &str = r##"data:image/svg+xml,%3Csvg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24"%3E%3Cpath fill="%236b7280" d="M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm0 18c-4.41 0-8-3.59-8-8s3.59-8 8-8 8 3.59 8 8-3.59 8-8 8z" opacity="0.3"/%3E%3Cpath fill="%233b82f6" d="M12 2C6.48 2 2 6.48 2 12h3c0-3.31 2.69-6 6-6V2z"%3E%3CanimateTransform attributeName="transform" attributeType="XML" dur="1s" from="0 12 12" repeatCount="indefinite" to="360 12 12" type="rotate"/%3E%3C/path%3E%3C/svg%3E"##;

/// Complete lazy-load configuration.
///
/// Deserializes from any serde format; missing fields take their defaults.
///
/// ```
/// use grappelli_pages::LazyLoadOptions;
///
/// let options: LazyLoadOptions = serde_json::from_str(r#"{"retry": 5}"#).unwrap();
/// assert_eq!(options.retry, 5);
/// assert_eq!(options.root_margin, "50px");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyLoadOptions {
	/// Image shown until the element becomes visible
	pub placeholder: String,
	/// Image shown after the last retry fails
	pub error: String,
	/// Image shown while the real source is fetched
	pub loading: String,
	/// Intersection ratio that counts as visible
	pub threshold: f64,
	/// Margin around the root used when computing intersections
	#[serde(alias = "rootMargin")]
	pub root_margin: String,
	/// Number of failed attempts before giving up
	pub retry: u32,
	/// Pause between a successful probe and the source swap, in milliseconds
	#[serde(alias = "delay")]
	pub delay_ms: u64,
}

impl Default for LazyLoadOptions {
	fn default() -> Self {
		Self {
			placeholder: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
			error: DEFAULT_ERROR_IMAGE.to_string(),
			loading: DEFAULT_LOADING_IMAGE.to_string(),
			threshold: 0.1,
			root_margin: "50px".to_string(),
			retry: 3,
			delay_ms: 0,
		}
	}
}

impl LazyLoadOptions {
	/// The post-load delay as a [`Duration`].
	pub fn delay(&self) -> Duration {
		Duration::from_millis(self.delay_ms)
	}

	/// Returns a copy of these options with `overrides` applied on top.
	pub fn merged(&self, overrides: &LazyLoadOverrides) -> Self {
		let mut merged = self.clone();
		merged.apply(overrides);
		merged
	}

	/// Applies every field set in `overrides` in place.
	pub fn apply(&mut self, overrides: &LazyLoadOverrides) {
		if let Some(placeholder) = &overrides.placeholder {
			self.placeholder = placeholder.clone();
		}
		if let Some(error) = &overrides.error {
			self.error = error.clone();
		}
		if let Some(loading) = &overrides.loading {
			self.loading = loading.clone();
		}
		if let Some(threshold) = overrides.threshold {
			self.threshold = threshold;
		}
		if let Some(root_margin) = &overrides.root_margin {
			self.root_margin = root_margin.clone();
		}
		if let Some(retry) = overrides.retry {
			self.retry = retry;
		}
		if let Some(delay_ms) = overrides.delay_ms {
			self.delay_ms = delay_ms;
		}
	}
}

/// Partial [`LazyLoadOptions`]; unset fields inherit from the base options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyLoadOverrides {
	pub placeholder: Option<String>,
	pub error: Option<String>,
	pub loading: Option<String>,
	pub threshold: Option<f64>,
	#[serde(alias = "rootMargin")]
	pub root_margin: Option<String>,
	pub retry: Option<u32>,
	#[serde(alias = "delay")]
	pub delay_ms: Option<u64>,
}

impl LazyLoadOverrides {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	pub fn with_error(mut self, error: impl Into<String>) -> Self {
		self.error = Some(error.into());
		self
	}

	pub fn with_loading(mut self, loading: impl Into<String>) -> Self {
		self.loading = Some(loading.into());
		self
	}

	pub fn with_threshold(mut self, threshold: f64) -> Self {
		self.threshold = Some(threshold);
		self
	}

	pub fn with_root_margin(mut self, root_margin: impl Into<String>) -> Self {
		self.root_margin = Some(root_margin.into());
		self
	}

	pub fn with_retry(mut self, retry: u32) -> Self {
		self.retry = Some(retry);
		self
	}

	pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
		self.delay_ms = Some(delay_ms);
		self
	}
}

fn global_config() -> &'static Mutex<LazyLoadOptions> {
	static CONFIG: OnceLock<Mutex<LazyLoadOptions>> = OnceLock::new();
	CONFIG.get_or_init(|| Mutex::new(LazyLoadOptions::default()))
}

/// Returns a snapshot of the process-wide default options.
pub fn global_options() -> LazyLoadOptions {
	global_config()
		.lock()
		.unwrap_or_else(|e| e.into_inner())
		.clone()
}

/// Merges `overrides` into the process-wide defaults.
///
/// Elements that are already attached keep the snapshot they were mounted with.
pub fn configure_lazy_load(overrides: &LazyLoadOverrides) {
	global_config()
		.lock()
		.unwrap_or_else(|e| e.into_inner())
		.apply(overrides);
}

/// Restores the process-wide defaults to [`LazyLoadOptions::default`].
pub fn reset_lazy_load_config() {
	*global_config().lock().unwrap_or_else(|e| e.into_inner()) = LazyLoadOptions::default();
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	fn test_defaults() {
		let options = LazyLoadOptions::default();
		assert_eq!(options.threshold, 0.1);
		assert_eq!(options.root_margin, "50px");
		assert_eq!(options.retry, 3);
		assert_eq!(options.delay(), Duration::ZERO);
		assert!(options.placeholder.starts_with("data:image/svg+xml,"));
		assert!(options.error.contains("%23ef4444"));
		assert!(options.loading.contains("animateTransform"));
	}

	#[rstest]
	fn test_merged_only_touches_set_fields() {
		let base = LazyLoadOptions::default();
		let merged = base.merged(&LazyLoadOverrides::new().with_retry(5).with_delay_ms(250));

		assert_eq!(merged.retry, 5);
		assert_eq!(merged.delay(), Duration::from_millis(250));
		assert_eq!(merged.placeholder, base.placeholder);
		assert_eq!(merged.root_margin, base.root_margin);
	}

	#[rstest]
	fn test_deserialize_accepts_camel_case_aliases() {
		let overrides: LazyLoadOverrides =
			serde_json::from_str(r#"{"rootMargin": "0px", "delay": 100, "threshold": 0.5}"#)
				.unwrap();

		assert_eq!(overrides.root_margin.as_deref(), Some("0px"));
		assert_eq!(overrides.delay_ms, Some(100));
		assert_eq!(overrides.threshold, Some(0.5));
		assert_eq!(overrides.retry, None);
	}

	#[rstest]
	fn test_deserialize_empty_object_is_default() {
		let options: LazyLoadOptions = serde_json::from_str("{}").unwrap();
		assert_eq!(options, LazyLoadOptions::default());
	}

	#[rstest]
	#[serial(lazy_load_config)]
	fn test_configure_merges_into_global() {
		reset_lazy_load_config();

		configure_lazy_load(&LazyLoadOverrides::new().with_retry(7));
		configure_lazy_load(&LazyLoadOverrides::new().with_root_margin("100px"));

		let options = global_options();
		assert_eq!(options.retry, 7);
		assert_eq!(options.root_margin, "100px");

		reset_lazy_load_config();
		assert_eq!(global_options(), LazyLoadOptions::default());
	}
}
