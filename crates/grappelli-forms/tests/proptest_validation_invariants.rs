//! Property tests for validation invariants.

use grappelli_forms::{REQUIRED_MESSAGE, ValidationEngine, ValidationRule};
use proptest::prelude::*;
use serde_json::{Value, json};

fn optional_rules() -> Vec<ValidationRule> {
	vec![
		ValidationRule::min_length(4),
		ValidationRule::max_length(2),
		ValidationRule::min(10.0).with_max(5.0),
		ValidationRule::email(),
		ValidationRule::url(),
		ValidationRule::custom(|_| false),
	]
}

fn blank_value() -> impl Strategy<Value = Option<Value>> {
	prop_oneof![Just(None), Just(Some(json!(null))), Just(Some(json!("")))]
}

proptest! {
	/// Blank values pass any set of non-required rules.
	#[test]
	fn optional_fields_accept_blank_values(value in blank_value()) {
		let mut form = ValidationEngine::default();
		if let Some(value) = value {
			form.set_value("field", value);
		}
		form.add_field("field", optional_rules());

		prop_assert!(form.validate_field("field"));
		prop_assert_eq!(form.field("field").unwrap().error(), "");
	}

	/// A required rule anywhere in the list wins over every other rule for blank input.
	#[test]
	fn required_wins_for_blank_values(
		value in blank_value(),
		position in 0usize..=6,
	) {
		let mut rules: Vec<ValidationRule> = optional_rules();
		rules.insert(position, ValidationRule::required());
		let mut form = ValidationEngine::default();
		if let Some(value) = value {
			form.set_value("field", value);
		}
		form.add_field("field", rules);

		prop_assert!(!form.validate_field("field"));
		prop_assert_eq!(form.field("field").unwrap().error(), REQUIRED_MESSAGE);
	}

	/// `valid` and `error` agree after any validation pass.
	#[test]
	fn valid_agrees_with_error(input in ".{0,12}") {
		let mut form = ValidationEngine::new([("field", json!(input))]);
		form.add_field(
			"field",
			vec![
				ValidationRule::min_length(3),
				ValidationRule::pattern_str("^[a-z]*$").unwrap(),
			],
		);

		let valid = form.validate_field("field");
		let field = form.field("field").unwrap();
		prop_assert_eq!(valid, field.valid());
		prop_assert_eq!(field.valid(), field.error().is_empty());
	}

	/// validate_all is the AND of per-field results and visits every field.
	#[test]
	fn validate_all_visits_every_field(lengths in proptest::collection::vec(0usize..6, 1..8)) {
		let mut form = ValidationEngine::new(
			lengths
				.iter()
				.enumerate()
				.map(|(i, len)| (format!("f{}", i), json!("x".repeat(*len)))),
		);
		let names: Vec<String> = form.field_names().map(str::to_string).collect();
		for name in &names {
			form.add_field(name.clone(), vec![ValidationRule::required().with_min_length(3)]);
		}

		let all_valid = form.validate_all();

		let expected_failures = lengths.iter().filter(|len| **len < 3).count();
		prop_assert_eq!(all_valid, expected_failures == 0);
		prop_assert_eq!(form.errors().len(), expected_failures);
	}
}
