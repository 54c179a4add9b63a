//! Construction errors for the validation engine.
//!
//! Validation failures are never reported through these types: a failing rule
//! is a normal outcome stored on the field as an error message. `FormError`
//! only covers mistakes made while *building* a form or a rule.

/// Errors raised while constructing rules or forms.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Invalid pattern `{pattern}`: {source}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},
	#[error("Initial form data must be a JSON object, got {0}")]
	NotAnObject(&'static str),
}

pub type FormResult<T> = Result<T, FormError>;
