//! Client-side form validation for Grappelli
//!
//! This crate provides the validation engine behind Grappelli's form
//! components:
//! - Procedural validation rules (required, length, range, pattern, email, URL, custom)
//! - Per-field state with touch tracking and reset to initial values
//! - Whole-form validation that reports every error at once
//! - Manual error injection for server-side rejections
//! - Change notification for the rendering layer
//!
//! ## Security Note
//!
//! Client-side validation is for UX only and MUST NOT be relied upon for
//! security. The server has to validate submissions again.
//!
//! ## Example
//!
//! ```
//! use grappelli_forms::{ValidationEngine, ValidationRule};
//! use serde_json::json;
//!
//! let mut form = ValidationEngine::new([("username", json!(""))]);
//! form.add_field(
//!     "username",
//!     vec![ValidationRule::required(), ValidationRule::min_length(3)],
//! );
//!
//! form.set_value("username", json!("al"));
//! form.touch_field("username");
//! assert!(!form.validate_field("username"));
//! assert!(form.field("username").unwrap().should_display_error());
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod field;
pub mod rule;
mod value;

pub use engine::ValidationEngine;
pub use error::{FormError, FormResult};
pub use events::{FormEvent, ReceiverFn, ReceiverId};
pub use field::FieldState;
pub use rule::{
	CustomOutcome, CustomValidator, INVALID_EMAIL_MESSAGE, INVALID_FORMAT_MESSAGE,
	INVALID_URL_MESSAGE, INVALID_VALUE_MESSAGE, REQUIRED_MESSAGE, ValidationRule,
};
