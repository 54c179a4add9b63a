//! Change notification for the validation engine.
//!
//! The engine holds plain mutable state. A rendering layer that needs to
//! re-render when a field changes connects a receiver and is called
//! synchronously after every effective mutation.
//!
//! ## Example
//!
//! ```
//! use grappelli_forms::{FormEvent, ValidationEngine};
//! use serde_json::json;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut form = ValidationEngine::new([("email", json!(""))]);
//! let id = form.connect({
//!     let seen = Arc::clone(&seen);
//!     move |event: &FormEvent| seen.lock().unwrap().push(event.clone())
//! });
//!
//! form.touch_field("email");
//! assert_eq!(
//!     seen.lock().unwrap().as_slice(),
//!     &[FormEvent::FieldTouched { name: "email".to_string() }]
//! );
//! assert!(form.disconnect(id));
//! ```

use std::fmt;
use std::sync::Arc;

/// A state change on a [`ValidationEngine`](crate::ValidationEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
	FieldAdded { name: String },
	RulesReplaced { name: String },
	ValueChanged { name: String },
	FieldValidated { name: String, valid: bool },
	FieldTouched { name: String },
	FieldReset { name: String },
	ErrorSet { name: String },
	ErrorCleared { name: String },
	FormReset,
	SubmittingChanged { submitting: bool },
}

impl FormEvent {
	/// Name of the field this event concerns, if any.
	pub fn field_name(&self) -> Option<&str> {
		match self {
			Self::FieldAdded { name }
			| Self::RulesReplaced { name }
			| Self::ValueChanged { name }
			| Self::FieldValidated { name, .. }
			| Self::FieldTouched { name }
			| Self::FieldReset { name }
			| Self::ErrorSet { name }
			| Self::ErrorCleared { name } => Some(name),
			Self::FormReset | Self::SubmittingChanged { .. } => None,
		}
	}
}

/// Handle returned by `connect`, used to disconnect the receiver again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

pub type ReceiverFn = Arc<dyn Fn(&FormEvent) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Receivers {
	next_id: u64,
	receivers: Vec<(ReceiverId, ReceiverFn)>,
}

impl Receivers {
	pub(crate) fn connect(&mut self, receiver: ReceiverFn) -> ReceiverId {
		let id = ReceiverId(self.next_id);
		self.next_id += 1;
		self.receivers.push((id, receiver));
		id
	}

	pub(crate) fn disconnect(&mut self, id: ReceiverId) -> bool {
		let before = self.receivers.len();
		self.receivers.retain(|(existing, _)| *existing != id);
		self.receivers.len() != before
	}

	pub(crate) fn len(&self) -> usize {
		self.receivers.len()
	}

	pub(crate) fn send(&self, event: FormEvent) {
		for (_, receiver) in &self.receivers {
			receiver(&event);
		}
	}
}

impl fmt::Debug for Receivers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Receivers")
			.field("count", &self.receivers.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::Mutex;

	#[rstest]
	fn test_receivers_fire_in_connection_order() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let mut receivers = Receivers::default();
		for tag in ["first", "second"] {
			let log = Arc::clone(&log);
			receivers.connect(Arc::new(move |_: &FormEvent| log.lock().unwrap().push(tag)));
		}

		receivers.send(FormEvent::FormReset);

		assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
	}

	#[rstest]
	fn test_disconnect_unknown_id_is_false() {
		let mut receivers = Receivers::default();
		let id = receivers.connect(Arc::new(|_: &FormEvent| {}));
		assert!(receivers.disconnect(id));
		assert!(!receivers.disconnect(id));
		assert_eq!(receivers.len(), 0);
	}

	#[rstest]
	fn test_field_name() {
		let event = FormEvent::FieldValidated {
			name: "age".to_string(),
			valid: false,
		};
		assert_eq!(event.field_name(), Some("age"));
		assert_eq!(FormEvent::FormReset.field_name(), None);
	}
}
