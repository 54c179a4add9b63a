//! # Grappelli
//!
//! The engines behind the Grappelli component library.
//!
//! ## Feature Flags
//!
//! - `forms` (default) - Client-side form validation ([`forms`])
//! - `pages` (default) - Lazy image loading directive ([`pages`])
//! - `debug-hooks` - Enables `debug_log!` output in `pages` (debug builds only)
//! - `full` - All of the above except `debug-hooks`
//!
//! ## Quick Example
//!
//! ```
//! use grappelli::prelude::*;
//! use serde_json::json;
//!
//! let mut form = ValidationEngine::new([("email", json!("a@b"))]);
//! form.add_field("email", vec![ValidationRule::required(), ValidationRule::email()]);
//!
//! assert!(!form.validate_all());
//! assert_eq!(form.errors()["email"], "Invalid email address");
//! ```

#[cfg(feature = "forms")]
pub use grappelli_forms as forms;

#[cfg(feature = "pages")]
pub use grappelli_pages as pages;

// Re-export form validation
#[cfg(feature = "forms")]
pub use grappelli_forms::{
	CustomOutcome, CustomValidator, FieldState, FormError, FormEvent, FormResult, ReceiverId,
	ValidationEngine, ValidationRule,
};

// Re-export lazy loading
#[cfg(feature = "pages")]
pub use grappelli_pages::{
	LAZY_LOAD_STYLES, LazyBinding, LazyImage, LazyLoadDirective, LazyLoadOptions,
	LazyLoadOverrides, LazyPhase, LoadError, configure_lazy_load, preload_image, preload_images,
};

/// Commonly used types
pub mod prelude {
	#[cfg(feature = "forms")]
	pub use crate::{
		CustomOutcome, FieldState, FormEvent, ValidationEngine, ValidationRule,
	};

	#[cfg(feature = "pages")]
	pub use crate::{
		LazyBinding, LazyLoadDirective, LazyLoadOptions, LazyLoadOverrides, LazyPhase,
		configure_lazy_load,
	};
}
