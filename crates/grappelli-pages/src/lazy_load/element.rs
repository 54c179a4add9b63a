//! DOM collaborators of the lazy-load directive
//!
//! The directive never touches `web_sys` directly. It drives an element, a
//! visibility observer and an image probe through the traits below; the
//! browser implementations live in [`dom`](super::dom) (wasm32 only) and tests
//! supply in-memory fakes.

use super::{LazyLoadOptions, LoadError};
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use std::rc::Rc;

/// An element the directive can drive.
///
/// All methods take `&self`; DOM handles are shared references with interior
/// mutability on the browser side.
pub trait LazyElement {
	/// Whether this is an `<img>`; only images get placeholder sources.
	fn is_image(&self) -> bool;

	/// The currently displayed source, empty when there is none.
	fn src(&self) -> String;

	fn set_src(&self, src: &str);

	/// The `data-src` attribute, if present.
	fn data_src(&self) -> Option<String>;

	fn add_class(&self, class: &str);

	fn remove_class(&self, class: &str);
}

impl<T: LazyElement + ?Sized> LazyElement for Rc<T> {
	fn is_image(&self) -> bool {
		(**self).is_image()
	}

	fn src(&self) -> String {
		(**self).src()
	}

	fn set_src(&self, src: &str) {
		(**self).set_src(src)
	}

	fn data_src(&self) -> Option<String> {
		(**self).data_src()
	}

	fn add_class(&self, class: &str) {
		(**self).add_class(class)
	}

	fn remove_class(&self, class: &str) {
		(**self).remove_class(class)
	}
}

/// A visibility notification for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
	pub is_intersecting: bool,
	pub intersection_ratio: f64,
}

impl IntersectionEntry {
	/// An entry for an element that just became fully visible.
	pub fn visible() -> Self {
		Self {
			is_intersecting: true,
			intersection_ratio: 1.0,
		}
	}

	/// An entry for an element that left the viewport.
	pub fn hidden() -> Self {
		Self {
			is_intersecting: false,
			intersection_ratio: 0.0,
		}
	}
}

/// Observer settings derived from [`LazyLoadOptions`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverInit {
	pub threshold: f64,
	pub root_margin: String,
}

impl From<&LazyLoadOptions> for ObserverInit {
	fn from(options: &LazyLoadOptions) -> Self {
		Self {
			threshold: options.threshold,
			root_margin: options.root_margin.clone(),
		}
	}
}

/// Callback an observer invokes for each intersection entry.
///
/// The returned future runs the load cycle; the observer decides how to drive
/// it (`spawn_local` in the browser, a plain `.await` in tests).
pub type IntersectionHandler = Rc<dyn Fn(IntersectionEntry) -> LocalBoxFuture<'static, ()>>;

/// A visibility observer bound to a single element.
pub trait VisibilityObserver {
	fn observe(&self);

	fn unobserve(&self);

	/// Releases the observer; it must not deliver entries afterwards.
	fn disconnect(&self);
}

/// Creates one [`VisibilityObserver`] per attached element.
pub trait ObserverFactory<E> {
	/// Whether the runtime supports intersection observation at all.
	///
	/// When this returns `false` the directive assigns sources directly.
	fn is_supported(&self) -> bool {
		true
	}

	fn create(
		&self,
		element: &E,
		init: &ObserverInit,
		handler: IntersectionHandler,
	) -> Box<dyn VisibilityObserver>;
}

/// Loads an image source off-DOM to find out whether it is displayable.
#[async_trait(?Send)]
pub trait ImageProbe {
	async fn probe(&self, src: &str) -> Result<(), LoadError>;
}
