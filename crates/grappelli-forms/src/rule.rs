//! Validation rules.
//!
//! A [`ValidationRule`] bundles an optional `required` flag with any number of
//! value checks. Checks inside one rule always run in the same order,
//! regardless of how the rule was built:
//!
//! ```text
//! required → min_length → max_length → min → max → pattern → email → url → custom
//! ```
//!
//! The first failing check decides the error message; later checks of the same
//! rule are not evaluated.
//!
//! ## Example
//!
//! ```
//! use grappelli_forms::ValidationRule;
//! use serde_json::json;
//!
//! let rule = ValidationRule::min_length(5).with_pattern_str(r"^[0-9]+$").unwrap();
//!
//! // Length is checked before the pattern
//! assert_eq!(
//!     rule.evaluate(Some(&json!("ab"))),
//!     Err("Minimum length is 5 characters".to_string())
//! );
//! assert_eq!(rule.evaluate(Some(&json!("abcde"))), Err("Invalid format".to_string()));
//! assert_eq!(rule.evaluate(Some(&json!("12345"))), Ok(()));
//! ```

use crate::error::{FormError, FormResult};
use crate::value::{format_number, is_blank, is_missing, length_of, to_number, to_text};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_VALUE_MESSAGE: &str = "Invalid value";
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid format";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL";

// Something, an @, something, a dot, something; no whitespace anywhere.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

/// Result of a custom predicate.
///
/// Closures passed to [`ValidationRule::custom`] may return anything that
/// converts into this type: a `bool`, a message string, an `Option<String>`
/// or `()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomOutcome {
	/// The value is acceptable.
	Valid,
	/// The value is rejected with the rule's message (or the generic one).
	Invalid,
	/// The value is rejected and this text becomes the error message.
	Message(String),
}

impl From<bool> for CustomOutcome {
	fn from(valid: bool) -> Self {
		if valid { Self::Valid } else { Self::Invalid }
	}
}

impl From<String> for CustomOutcome {
	fn from(message: String) -> Self {
		Self::Message(message)
	}
}

impl From<&str> for CustomOutcome {
	fn from(message: &str) -> Self {
		Self::Message(message.to_string())
	}
}

impl From<Option<String>> for CustomOutcome {
	fn from(message: Option<String>) -> Self {
		message.map_or(Self::Valid, Self::Message)
	}
}

impl From<()> for CustomOutcome {
	fn from(_: ()) -> Self {
		Self::Valid
	}
}

/// Shared custom predicate.
#[derive(Clone)]
pub struct CustomValidator(Arc<dyn Fn(&Value) -> CustomOutcome + Send + Sync>);

impl CustomValidator {
	pub fn new<F, R>(f: F) -> Self
	where
		F: Fn(&Value) -> R + Send + Sync + 'static,
		R: Into<CustomOutcome>,
	{
		Self(Arc::new(move |value: &Value| -> CustomOutcome { f(value).into() }))
	}

	pub fn call(&self, value: &Value) -> CustomOutcome {
		(self.0)(value)
	}
}

impl fmt::Debug for CustomValidator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("CustomValidator(..)")
	}
}

/// A single validation rule attached to a field.
///
/// All checks are optional; a default rule accepts every value. `message`,
/// when set, replaces the default text of every failing check in this rule
/// except a custom predicate that supplies its own message.
#[derive(Debug, Clone, Default)]
pub struct ValidationRule {
	pub required: bool,
	pub min_length: Option<usize>,
	pub max_length: Option<usize>,
	pub min: Option<f64>,
	pub max: Option<f64>,
	pub pattern: Option<Regex>,
	pub email: bool,
	pub url: bool,
	pub custom: Option<CustomValidator>,
	pub message: Option<String>,
}

impl ValidationRule {
	/// A rule with no checks.
	pub fn new() -> Self {
		Self::default()
	}

	/// Rejects missing, `null`, empty-string and empty-array values.
	pub fn required() -> Self {
		Self::new().with_required()
	}

	pub fn min_length(min: usize) -> Self {
		Self::new().with_min_length(min)
	}

	pub fn max_length(max: usize) -> Self {
		Self::new().with_max_length(max)
	}

	pub fn min(min: f64) -> Self {
		Self::new().with_min(min)
	}

	pub fn max(max: f64) -> Self {
		Self::new().with_max(max)
	}

	pub fn pattern(pattern: Regex) -> Self {
		Self::new().with_pattern(pattern)
	}

	/// Compiles `pattern` and builds a pattern rule from it.
	///
	/// # Errors
	///
	/// Returns [`FormError::InvalidPattern`] if the expression does not compile.
	pub fn pattern_str(pattern: &str) -> FormResult<Self> {
		Self::new().with_pattern_str(pattern)
	}

	pub fn email() -> Self {
		Self::new().with_email()
	}

	pub fn url() -> Self {
		Self::new().with_url()
	}

	/// Builds a rule around a custom predicate.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_forms::ValidationRule;
	/// use serde_json::json;
	///
	/// let no_admin = ValidationRule::custom(|value| {
	///     if value == "admin" { Some("Reserved name".to_string()) } else { None }
	/// });
	/// assert_eq!(no_admin.evaluate(Some(&json!("admin"))), Err("Reserved name".to_string()));
	/// assert!(no_admin.evaluate(Some(&json!("alice"))).is_ok());
	/// ```
	pub fn custom<F, R>(f: F) -> Self
	where
		F: Fn(&Value) -> R + Send + Sync + 'static,
		R: Into<CustomOutcome>,
	{
		Self::new().with_custom(f)
	}

	pub fn with_required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_min_length(mut self, min: usize) -> Self {
		self.min_length = Some(min);
		self
	}

	pub fn with_max_length(mut self, max: usize) -> Self {
		self.max_length = Some(max);
		self
	}

	pub fn with_min(mut self, min: f64) -> Self {
		self.min = Some(min);
		self
	}

	pub fn with_max(mut self, max: f64) -> Self {
		self.max = Some(max);
		self
	}

	pub fn with_pattern(mut self, pattern: Regex) -> Self {
		self.pattern = Some(pattern);
		self
	}

	/// # Errors
	///
	/// Returns [`FormError::InvalidPattern`] if the expression does not compile.
	pub fn with_pattern_str(self, pattern: &str) -> FormResult<Self> {
		let compiled = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
			pattern: pattern.to_string(),
			source,
		})?;
		Ok(self.with_pattern(compiled))
	}

	pub fn with_email(mut self) -> Self {
		self.email = true;
		self
	}

	pub fn with_url(mut self) -> Self {
		self.url = true;
		self
	}

	pub fn with_custom<F, R>(mut self, f: F) -> Self
	where
		F: Fn(&Value) -> R + Send + Sync + 'static,
		R: Into<CustomOutcome>,
	{
		self.custom = Some(CustomValidator::new(f));
		self
	}

	/// Overrides the default message of every check in this rule.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	fn message_or(&self, default: impl Into<String>) -> String {
		match &self.message {
			Some(message) => message.clone(),
			None => default.into(),
		}
	}

	/// Evaluates this rule against a value (`None` means the field has no value).
	///
	/// Returns `Err(message)` for the first failing check. Non-required rules
	/// accept blank values without running any check.
	pub fn evaluate(&self, value: Option<&Value>) -> Result<(), String> {
		if self.required && is_missing(value) {
			return Err(self.message_or(REQUIRED_MESSAGE));
		}
		let value = match value {
			Some(value) if !is_blank(Some(value)) => value,
			// Only reachable for non-required rules: optional fields skip
			// format checks while empty.
			_ => return Ok(()),
		};

		if let Some(min) = self.min_length.filter(|n| *n > 0) {
			if length_of(value).is_some_and(|len| len < min) {
				return Err(self.message_or(format!("Minimum length is {} characters", min)));
			}
		}

		if let Some(max) = self.max_length.filter(|n| *n > 0) {
			if length_of(value).is_some_and(|len| len > max) {
				return Err(self.message_or(format!("Maximum length is {} characters", max)));
			}
		}

		if let Some(min) = self.min {
			if to_number(value) < min {
				return Err(self.message_or(format!("Minimum value is {}", format_number(min))));
			}
		}

		if let Some(max) = self.max {
			if to_number(value) > max {
				return Err(self.message_or(format!("Maximum value is {}", format_number(max))));
			}
		}

		if let Some(pattern) = &self.pattern {
			if !pattern.is_match(&to_text(value)) {
				return Err(self.message_or(INVALID_FORMAT_MESSAGE));
			}
		}

		if self.email && !EMAIL_REGEX.is_match(&to_text(value)) {
			return Err(self.message_or(INVALID_EMAIL_MESSAGE));
		}

		if self.url && url::Url::parse(&to_text(value)).is_err() {
			return Err(self.message_or(INVALID_URL_MESSAGE));
		}

		if let Some(custom) = &self.custom {
			match custom.call(value) {
				CustomOutcome::Valid => {}
				// An empty message would leave the field invalid without an error.
				CustomOutcome::Message(message) if !message.is_empty() => return Err(message),
				CustomOutcome::Message(_) | CustomOutcome::Invalid => {
					return Err(self.message_or(INVALID_VALUE_MESSAGE));
				}
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(None)]
	#[case(Some(json!(null)))]
	#[case(Some(json!("")))]
	#[case(Some(json!([])))]
	fn test_required_rejects_empty(#[case] value: Option<Value>) {
		let rule = ValidationRule::required();
		assert_eq!(rule.evaluate(value.as_ref()), Err(REQUIRED_MESSAGE.to_string()));
	}

	#[rstest]
	fn test_required_uses_override_message() {
		let rule = ValidationRule::required().with_message("Name please");
		assert_eq!(rule.evaluate(None), Err("Name please".to_string()));
	}

	#[rstest]
	#[case(None)]
	#[case(Some(json!(null)))]
	#[case(Some(json!("")))]
	fn test_optional_rule_skips_blank(#[case] value: Option<Value>) {
		let rule = ValidationRule::min_length(3).with_email().with_custom(|_| false);
		assert!(rule.evaluate(value.as_ref()).is_ok());
	}

	#[rstest]
	fn test_optional_rule_still_checks_empty_array() {
		let rule = ValidationRule::min_length(1);
		assert_eq!(
			rule.evaluate(Some(&json!([]))),
			Err("Minimum length is 1 characters".to_string())
		);
	}

	#[rstest]
	fn test_required_with_value_runs_remaining_checks() {
		let rule = ValidationRule::required().with_min_length(4);
		assert_eq!(
			rule.evaluate(Some(&json!("abc"))),
			Err("Minimum length is 4 characters".to_string())
		);
		assert!(rule.evaluate(Some(&json!("abcd"))).is_ok());
	}

	#[rstest]
	#[case(json!("abc"), Ok(()))]
	#[case(json!("abcdef"), Err("Maximum length is 5 characters".to_string()))]
	#[case(json!(123456), Ok(()))]
	fn test_max_length(#[case] value: Value, #[case] expected: Result<(), String>) {
		assert_eq!(ValidationRule::max_length(5).evaluate(Some(&value)), expected);
	}

	#[rstest]
	fn test_zero_length_bounds_are_ignored() {
		let rule = ValidationRule::max_length(0);
		assert!(rule.evaluate(Some(&json!("anything"))).is_ok());
	}

	#[rstest]
	#[case(json!(17), Err("Minimum value is 18".to_string()))]
	#[case(json!("17"), Err("Minimum value is 18".to_string()))]
	#[case(json!(18), Ok(()))]
	#[case(json!(121), Err("Maximum value is 120".to_string()))]
	#[case(json!("not a number"), Ok(()))]
	fn test_numeric_range(#[case] value: Value, #[case] expected: Result<(), String>) {
		let rule = ValidationRule::min(18.0).with_max(120.0);
		assert_eq!(rule.evaluate(Some(&value)), expected);
	}

	#[rstest]
	fn test_fractional_bound_message() {
		let rule = ValidationRule::min(0.5);
		assert_eq!(
			rule.evaluate(Some(&json!(0.25))),
			Err("Minimum value is 0.5".to_string())
		);
	}

	#[rstest]
	fn test_huge_bound_message_uses_exponent_notation() {
		let rule = ValidationRule::max(1e21);
		assert_eq!(
			rule.evaluate(Some(&json!(2e21))),
			Err("Maximum value is 1e+21".to_string())
		);
	}

	#[rstest]
	fn test_pattern_runs_on_numbers_as_text() {
		let rule = ValidationRule::pattern_str(r"^\d{3}$").unwrap();
		assert!(rule.evaluate(Some(&json!(123))).is_ok());
		assert_eq!(
			rule.evaluate(Some(&json!(12))),
			Err(INVALID_FORMAT_MESSAGE.to_string())
		);
	}

	#[rstest]
	fn test_pattern_str_rejects_bad_regex() {
		let result = ValidationRule::pattern_str("([a-z]");
		assert!(matches!(result, Err(FormError::InvalidPattern { .. })));
	}

	#[rstest]
	#[case("a@b.com", true)]
	#[case("first.last@sub.example.org", true)]
	#[case("a@b", false)]
	#[case("a b@c.com", false)]
	#[case("@b.com", false)]
	fn test_email(#[case] input: &str, #[case] valid: bool) {
		let result = ValidationRule::email().evaluate(Some(&json!(input)));
		if valid {
			assert!(result.is_ok());
		} else {
			assert_eq!(result, Err(INVALID_EMAIL_MESSAGE.to_string()));
		}
	}

	#[rstest]
	#[case("https://example.com", true)]
	#[case("mailto:someone@example.com", true)]
	#[case("ftp://files.example.com/a.txt", true)]
	#[case("example.com", false)]
	#[case("not a url", false)]
	fn test_url(#[case] input: &str, #[case] valid: bool) {
		let result = ValidationRule::url().evaluate(Some(&json!(input)));
		if valid {
			assert!(result.is_ok());
		} else {
			assert_eq!(result, Err(INVALID_URL_MESSAGE.to_string()));
		}
	}

	#[rstest]
	fn test_custom_outcomes() {
		let boolean = ValidationRule::custom(|v| v != "bad");
		assert!(boolean.evaluate(Some(&json!("good"))).is_ok());
		assert_eq!(
			boolean.evaluate(Some(&json!("bad"))),
			Err(INVALID_VALUE_MESSAGE.to_string())
		);

		let overridden = ValidationRule::custom(|_| false).with_message("Nope");
		assert_eq!(overridden.evaluate(Some(&json!("x"))), Err("Nope".to_string()));

		// A returned message wins over the override
		let message = ValidationRule::custom(|_| "Taken").with_message("Nope");
		assert_eq!(message.evaluate(Some(&json!("x"))), Err("Taken".to_string()));

		let unit = ValidationRule::custom(|_| ());
		assert!(unit.evaluate(Some(&json!("x"))).is_ok());
	}

	#[rstest]
	fn test_custom_empty_message_falls_back() {
		let rule = ValidationRule::custom(|_| String::new());
		assert_eq!(
			rule.evaluate(Some(&json!("x"))),
			Err(INVALID_VALUE_MESSAGE.to_string())
		);
	}

	#[rstest]
	fn test_checks_short_circuit_inside_rule() {
		let rule = ValidationRule::min_length(5)
			.with_pattern_str(r"^[0-9]+$")
			.unwrap()
			.with_custom(|_| -> bool { panic!("custom check must not run") });
		assert_eq!(
			rule.evaluate(Some(&json!("ab"))),
			Err("Minimum length is 5 characters".to_string())
		);
	}

	#[rstest]
	fn test_custom_validator_debug_is_opaque() {
		let rule = ValidationRule::custom(|_| true);
		assert!(format!("{:?}", rule).contains("CustomValidator(..)"));
	}
}
