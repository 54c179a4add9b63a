//! Per-field validation state.

use crate::rule::ValidationRule;
use serde_json::Value;

/// Validation-relevant state for one form input.
///
/// The live value is owned by the engine's value bag; the field keeps the
/// value it was created with so that a reset can restore it.
///
/// After every validation pass `valid() == error().is_empty()`. Manual error
/// injection and external value changes may desynchronize the two until the
/// next pass.
#[derive(Debug, Clone)]
pub struct FieldState {
	pub(crate) initial: Value,
	pub(crate) rules: Vec<ValidationRule>,
	pub(crate) error: String,
	pub(crate) touched: bool,
	pub(crate) valid: bool,
}

impl FieldState {
	pub(crate) fn new(initial: Value, rules: Vec<ValidationRule>) -> Self {
		Self {
			initial,
			rules,
			error: String::new(),
			touched: false,
			valid: true,
		}
	}

	/// Value the field was created with.
	pub fn initial(&self) -> &Value {
		&self.initial
	}

	/// Rules in evaluation order.
	pub fn rules(&self) -> &[ValidationRule] {
		&self.rules
	}

	/// Current error message; empty when there is none.
	pub fn error(&self) -> &str {
		&self.error
	}

	pub fn has_error(&self) -> bool {
		!self.error.is_empty()
	}

	pub fn touched(&self) -> bool {
		self.touched
	}

	pub fn valid(&self) -> bool {
		self.valid
	}

	/// Whether a rendering layer should show the error right now.
	///
	/// Errors are only displayed once the user has interacted with the field.
	pub fn should_display_error(&self) -> bool {
		self.touched && self.has_error()
	}

	/// Runs the rules in order and records the first failure.
	pub(crate) fn validate(&mut self, value: Option<&Value>) -> bool {
		self.error.clear();
		match self.rules.iter().find_map(|rule| rule.evaluate(value).err()) {
			Some(message) => {
				self.error = message;
				self.valid = false;
			}
			None => self.valid = true,
		}
		self.valid
	}

	pub(crate) fn reset(&mut self) {
		self.error.clear();
		self.touched = false;
		self.valid = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_first_failing_rule_wins() {
		let mut field = FieldState::new(
			json!(""),
			vec![
				ValidationRule::min_length(3).with_message("too short"),
				ValidationRule::custom(|_| "never reached"),
			],
		);

		assert!(!field.validate(Some(&json!("ab"))));
		assert_eq!(field.error(), "too short");
	}

	#[rstest]
	fn test_validate_clears_previous_error() {
		let mut field = FieldState::new(json!(""), vec![ValidationRule::required()]);
		assert!(!field.validate(None));
		assert!(field.has_error());

		assert!(field.validate(Some(&json!("filled"))));
		assert_eq!(field.error(), "");
		assert!(field.valid());
	}

	#[rstest]
	fn test_should_display_error_requires_touch() {
		let mut field = FieldState::new(json!(""), vec![ValidationRule::required()]);
		field.validate(None);
		assert!(!field.should_display_error());

		field.touched = true;
		assert!(field.should_display_error());
	}
}
