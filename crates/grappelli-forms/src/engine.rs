//! The form validation engine.
//!
//! [`ValidationEngine`] owns a value bag (`name → value`) and a field mapping
//! (`name → FieldState`). Input bindings write into the value bag, the engine
//! validates on demand, and the rendering layer reads back errors and touch
//! state to decide what to display.
//!
//! Every operation that names a field is a silent no-op for unknown names, so
//! a dynamically composed form cannot fail on a stale field reference.
//!
//! ## Example
//!
//! ```
//! use grappelli_forms::{ValidationEngine, ValidationRule};
//! use serde_json::json;
//!
//! let mut form = ValidationEngine::new([("email", json!("")), ("age", json!(""))]);
//! form.add_field("email", vec![ValidationRule::required(), ValidationRule::email()]);
//! form.add_field("age", vec![ValidationRule::min(18.0)]);
//!
//! assert!(!form.validate_all());
//! assert_eq!(form.errors().get("email").map(String::as_str), Some("This field is required"));
//!
//! form.set_value("email", json!("ada@example.com"));
//! assert!(form.validate_all());
//! assert!(form.is_valid());
//! ```

use crate::error::{FormError, FormResult};
use crate::events::{FormEvent, ReceiverId, Receivers};
use crate::field::FieldState;
use crate::rule::ValidationRule;
use crate::value::is_falsy;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Field state, value bag and submission flag for one form.
#[derive(Debug, Default)]
pub struct ValidationEngine {
	data: IndexMap<String, Value>,
	fields: IndexMap<String, FieldState>,
	is_submitting: bool,
	receivers: Receivers,
}

impl ValidationEngine {
	/// Creates an engine with one rule-less field per initial entry.
	///
	/// Field order follows the iteration order of `initial`.
	pub fn new<I, K>(initial: I) -> Self
	where
		I: IntoIterator<Item = (K, Value)>,
		K: Into<String>,
	{
		let mut data = IndexMap::new();
		let mut fields = IndexMap::new();
		for (name, value) in initial {
			let name = name.into();
			fields.insert(name.clone(), FieldState::new(value.clone(), Vec::new()));
			data.insert(name, value);
		}
		Self {
			data,
			fields,
			is_submitting: false,
			receivers: Receivers::default(),
		}
	}

	/// Creates an engine from a JSON object of initial values.
	///
	/// # Errors
	///
	/// Returns [`FormError::NotAnObject`] if `initial` is not a JSON object.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_forms::ValidationEngine;
	/// use serde_json::json;
	///
	/// let form = ValidationEngine::from_json(json!({"name": "Ada"})).unwrap();
	/// assert_eq!(form.value("name"), Some(&json!("Ada")));
	/// assert!(ValidationEngine::from_json(json!([1, 2])).is_err());
	/// ```
	pub fn from_json(initial: Value) -> FormResult<Self> {
		match initial {
			Value::Object(map) => Ok(Self::new(map)),
			Value::Null => Err(FormError::NotAnObject("null")),
			Value::Bool(_) => Err(FormError::NotAnObject("boolean")),
			Value::Number(_) => Err(FormError::NotAnObject("number")),
			Value::String(_) => Err(FormError::NotAnObject("string")),
			Value::Array(_) => Err(FormError::NotAnObject("array")),
		}
	}

	// ------------------------------------------------------------------
	// Field registration
	// ------------------------------------------------------------------

	/// Declares a field, or replaces the rules of an existing one.
	///
	/// A new field starts from the current bag value when that value is
	/// truthy, and from `""` otherwise. An existing field keeps its initial
	/// value, error and touch state; only its rule set changes.
	pub fn add_field(&mut self, name: impl Into<String>, rules: Vec<ValidationRule>) {
		let name = name.into();
		if let Some(field) = self.fields.get_mut(&name) {
			field.rules = rules;
			self.receivers.send(FormEvent::RulesReplaced { name });
			return;
		}

		let initial = match self.data.get(&name) {
			Some(value) if !is_falsy(value) => value.clone(),
			_ => Value::String(String::new()),
		};
		self.fields.insert(name.clone(), FieldState::new(initial, rules));
		self.receivers.send(FormEvent::FieldAdded { name });
	}

	pub fn field(&self, name: &str) -> Option<&FieldState> {
		self.fields.get(name)
	}

	/// All fields in declaration order.
	pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldState)> {
		self.fields.iter().map(|(name, field)| (name.as_str(), field))
	}

	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	// ------------------------------------------------------------------
	// Value bag
	// ------------------------------------------------------------------

	pub fn value(&self, name: &str) -> Option<&Value> {
		self.data.get(name)
	}

	/// Writes a value into the bag. Does not validate.
	pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
		let name = name.into();
		self.data.insert(name.clone(), value);
		self.receivers.send(FormEvent::ValueChanged { name });
	}

	/// The whole value bag, e.g. for building a submission payload.
	pub fn data(&self) -> &IndexMap<String, Value> {
		&self.data
	}

	/// The value bag as a JSON object.
	pub fn to_json(&self) -> Value {
		Value::Object(
			self.data
				.iter()
				.map(|(name, value)| (name.clone(), value.clone()))
				.collect(),
		)
	}

	// ------------------------------------------------------------------
	// Validation
	// ------------------------------------------------------------------

	/// Validates one field against its current bag value.
	///
	/// Rules run in declaration order and the first failure stops the pass.
	/// Unknown fields are reported as valid.
	pub fn validate_field(&mut self, name: &str) -> bool {
		let Some(field) = self.fields.get_mut(name) else {
			return true;
		};

		let valid = field.validate(self.data.get(name));
		if valid {
			tracing::trace!(field = name, "field passed validation");
		} else {
			tracing::debug!(field = name, error = %field.error, "field failed validation");
		}

		self.receivers.send(FormEvent::FieldValidated {
			name: name.to_string(),
			valid,
		});
		valid
	}

	/// Validates every field and returns whether all of them passed.
	///
	/// Does not stop at the first invalid field, so every error is populated.
	pub fn validate_all(&mut self) -> bool {
		let names: Vec<String> = self.fields.keys().cloned().collect();
		let mut all_valid = true;
		for name in &names {
			all_valid &= self.validate_field(name);
		}
		all_valid
	}

	// ------------------------------------------------------------------
	// Touch tracking
	// ------------------------------------------------------------------

	pub fn touch_field(&mut self, name: &str) {
		let Some(field) = self.fields.get_mut(name) else {
			return;
		};
		if !field.touched {
			field.touched = true;
			self.receivers.send(FormEvent::FieldTouched {
				name: name.to_string(),
			});
		}
	}

	pub fn touch_all(&mut self) {
		let names: Vec<String> = self.fields.keys().cloned().collect();
		for name in &names {
			self.touch_field(name);
		}
	}

	// ------------------------------------------------------------------
	// Reset
	// ------------------------------------------------------------------

	/// Restores the field's initial value and clears its error and touch state.
	pub fn reset_field(&mut self, name: &str) {
		let Some(field) = self.fields.get_mut(name) else {
			return;
		};
		field.reset();
		self.data.insert(name.to_string(), field.initial.clone());
		self.receivers.send(FormEvent::FieldReset {
			name: name.to_string(),
		});
	}

	/// Resets every field and clears the submitting flag.
	pub fn reset_form(&mut self) {
		let names: Vec<String> = self.fields.keys().cloned().collect();
		for name in &names {
			self.reset_field(name);
		}
		self.is_submitting = false;
		self.receivers.send(FormEvent::FormReset);
	}

	// ------------------------------------------------------------------
	// Manual errors
	// ------------------------------------------------------------------

	/// Forces an error onto a field without consulting its rules, e.g. after
	/// the server rejected a submission.
	pub fn set_field_error(&mut self, name: &str, error: impl Into<String>) {
		let Some(field) = self.fields.get_mut(name) else {
			return;
		};
		field.error = error.into();
		field.valid = false;
		self.receivers.send(FormEvent::ErrorSet {
			name: name.to_string(),
		});
	}

	pub fn clear_field_error(&mut self, name: &str) {
		let Some(field) = self.fields.get_mut(name) else {
			return;
		};
		if field.error.is_empty() && field.valid {
			return;
		}
		field.error.clear();
		field.valid = true;
		self.receivers.send(FormEvent::ErrorCleared {
			name: name.to_string(),
		});
	}

	// ------------------------------------------------------------------
	// Submission flag
	// ------------------------------------------------------------------

	pub fn is_submitting(&self) -> bool {
		self.is_submitting
	}

	pub fn set_submitting(&mut self, submitting: bool) {
		if self.is_submitting != submitting {
			self.is_submitting = submitting;
			self.receivers.send(FormEvent::SubmittingChanged { submitting });
		}
	}

	// ------------------------------------------------------------------
	// Aggregates (recomputed on every call)
	// ------------------------------------------------------------------

	/// True iff every field's `valid` flag is set.
	pub fn is_valid(&self) -> bool {
		self.fields.values().all(FieldState::valid)
	}

	pub fn has_errors(&self) -> bool {
		self.fields.values().any(FieldState::has_error)
	}

	/// Names of touched fields, in declaration order.
	pub fn touched_fields(&self) -> Vec<&str> {
		self.fields
			.iter()
			.filter(|(_, field)| field.touched)
			.map(|(name, _)| name.as_str())
			.collect()
	}

	/// `name → message` for every field with a non-empty error.
	pub fn errors(&self) -> IndexMap<String, String> {
		self.fields
			.iter()
			.filter(|(_, field)| field.has_error())
			.map(|(name, field)| (name.clone(), field.error.clone()))
			.collect()
	}

	// ------------------------------------------------------------------
	// Change notification
	// ------------------------------------------------------------------

	/// Connects a receiver that is called after every state change.
	pub fn connect<F>(&mut self, receiver: F) -> ReceiverId
	where
		F: Fn(&FormEvent) + Send + Sync + 'static,
	{
		self.receivers.connect(Arc::new(receiver))
	}

	/// Returns `false` if the receiver was not connected.
	pub fn disconnect(&mut self, id: ReceiverId) -> bool {
		self.receivers.disconnect(id)
	}

	pub fn receiver_count(&self) -> usize {
		self.receivers.len()
	}
}
