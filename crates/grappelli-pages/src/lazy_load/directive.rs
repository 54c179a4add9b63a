//! The `v-lazy-load` directive and its per-element state machine
//!
//! ```text
//! unobserved ─mount─▶ placeholder ─visible─▶ loading ─probe ok─▶ loaded
//!                          ▲                   │  ▲
//!                          │                   │  └─ backoff (1s × attempts)
//!                          │                   └─ attempts ≥ retry ─▶ error
//!                          └──────── source change (any phase) ────────┘
//! ```

use super::{
	ImageProbe, IntersectionEntry, IntersectionHandler, LazyElement, LazyLoadOptions,
	LazyLoadOverrides, LinearBackoff, ObserverFactory, ObserverInit, Timer, VisibilityObserver,
	global_options,
};
use crate::{debug_log, warn_log};
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{AbortHandle, Abortable};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

const CLASS_IMAGE: &str = "lazy-image";
const CLASS_LOADING: &str = "lazy-loading";
const CLASS_LOADED: &str = "lazy-loaded";
const CLASS_ERROR: &str = "lazy-error";

/// Stage of an element in the lazy-load state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LazyPhase {
	/// Not attached: no source resolved, no intersection support, or unmounted
	Unobserved,
	/// Placeholder shown, waiting to become visible
	Placeholder,
	/// Visible; the real source is being probed or retried
	Loading,
	/// Real source displayed; observation stopped
	Loaded,
	/// Retry limit reached; error image displayed
	Error,
}

impl LazyPhase {
	/// The phase-specific CSS class, if any.
	///
	/// Every attached element additionally carries `lazy-image`.
	pub fn css_class(self) -> Option<&'static str> {
		match self {
			Self::Unobserved | Self::Placeholder => None,
			Self::Loading => Some(CLASS_LOADING),
			Self::Loaded => Some(CLASS_LOADED),
			Self::Error => Some(CLASS_ERROR),
		}
	}
}

/// Value bound to the directive on an element.
#[derive(Debug, Clone, PartialEq)]
pub enum LazyBinding {
	/// Load this source with the default options
	Src(String),
	/// Load the element's `data-src` (or current `src`) with these overrides
	Options(LazyLoadOverrides),
}

impl LazyBinding {
	pub fn src(src: impl Into<String>) -> Self {
		Self::Src(src.into())
	}

	pub fn options(overrides: LazyLoadOverrides) -> Self {
		Self::Options(overrides)
	}
}

impl From<&str> for LazyBinding {
	fn from(src: &str) -> Self {
		Self::Src(src.to_string())
	}
}

impl From<String> for LazyBinding {
	fn from(src: String) -> Self {
		Self::Src(src)
	}
}

impl From<LazyLoadOverrides> for LazyBinding {
	fn from(overrides: LazyLoadOverrides) -> Self {
		Self::Options(overrides)
	}
}

/// Mounts [`LazyImage`]s onto elements.
///
/// The directive holds the collaborators shared by every element it mounts.
/// Without [`with_defaults`](Self::with_defaults) each mount snapshots
/// [`global_options`].
pub struct LazyLoadDirective<E> {
	factory: Rc<dyn ObserverFactory<E>>,
	probe: Rc<dyn ImageProbe>,
	timer: Rc<dyn Timer>,
	backoff: LinearBackoff,
	defaults: Option<LazyLoadOptions>,
}

impl<E: LazyElement + 'static> LazyLoadDirective<E> {
	pub fn new<F, P, T>(factory: F, probe: P, timer: T) -> Self
	where
		F: ObserverFactory<E> + 'static,
		P: ImageProbe + 'static,
		T: Timer + 'static,
	{
		Self {
			factory: Rc::new(factory),
			probe: Rc::new(probe),
			timer: Rc::new(timer),
			backoff: LinearBackoff::default(),
			defaults: None,
		}
	}

	/// Uses `defaults` instead of the process-wide options.
	pub fn with_defaults(mut self, defaults: LazyLoadOptions) -> Self {
		self.defaults = Some(defaults);
		self
	}

	/// Replaces the retry schedule.
	pub fn with_backoff(mut self, backoff: LinearBackoff) -> Self {
		self.backoff = backoff;
		self
	}

	/// The options new mounts start from.
	pub fn defaults(&self) -> LazyLoadOptions {
		self.defaults.clone().unwrap_or_else(global_options)
	}

	/// Attaches lazy loading to `element`.
	///
	/// The returned handle must be kept alive for as long as the element is
	/// mounted; dropping it disconnects the observer.
	pub fn mounted(&self, element: E, binding: &LazyBinding) -> Rc<LazyImage<E>> {
		let image = Rc::new(LazyImage {
			element,
			factory: Rc::clone(&self.factory),
			probe: Rc::clone(&self.probe),
			timer: Rc::clone(&self.timer),
			backoff: self.backoff,
			defaults: self.defaults(),
			state: RefCell::new(None),
			observer: RefCell::new(None),
			generation: Cell::new(0),
			in_flight: RefCell::new(None),
		});
		image.attach(binding);
		image
	}
}

impl<E> Clone for LazyLoadDirective<E> {
	fn clone(&self) -> Self {
		Self {
			factory: Rc::clone(&self.factory),
			probe: Rc::clone(&self.probe),
			timer: Rc::clone(&self.timer),
			backoff: self.backoff,
			defaults: self.defaults.clone(),
		}
	}
}

impl<E> fmt::Debug for LazyLoadDirective<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyLoadDirective")
			.field("backoff", &self.backoff)
			.field("defaults", &self.defaults)
			.finish_non_exhaustive()
	}
}

#[derive(Debug, Clone)]
struct LazyState {
	original_src: String,
	attempts: u32,
	options: LazyLoadOptions,
	phase: LazyPhase,
}

/// The load cycle currently running for an element.
struct InFlight {
	generation: u64,
	abort: AbortHandle,
	// Resolves once the cycle future, and the load it awaits, has been dropped.
	done: oneshot::Receiver<()>,
}

/// Lazy-load state attached to one element.
pub struct LazyImage<E> {
	element: E,
	factory: Rc<dyn ObserverFactory<E>>,
	probe: Rc<dyn ImageProbe>,
	timer: Rc<dyn Timer>,
	backoff: LinearBackoff,
	defaults: LazyLoadOptions,
	state: RefCell<Option<LazyState>>,
	observer: RefCell<Option<Box<dyn VisibilityObserver>>>,
	// Bumped on source change and unmount; load cycles from older generations stop at their next await.
	generation: Cell<u64>,
	in_flight: RefCell<Option<InFlight>>,
}

impl<E: LazyElement + 'static> LazyImage<E> {
	pub fn element(&self) -> &E {
		&self.element
	}

	pub fn phase(&self) -> LazyPhase {
		self.state
			.borrow()
			.as_ref()
			.map_or(LazyPhase::Unobserved, |state| state.phase)
	}

	/// Failed load attempts for the current source.
	pub fn attempts(&self) -> u32 {
		self.state.borrow().as_ref().map_or(0, |state| state.attempts)
	}

	/// The source being lazily loaded, if attached.
	pub fn original_src(&self) -> Option<String> {
		self.state
			.borrow()
			.as_ref()
			.map(|state| state.original_src.clone())
	}

	/// The merged options snapshot taken at attach time.
	pub fn options(&self) -> Option<LazyLoadOptions> {
		self.state.borrow().as_ref().map(|state| state.options.clone())
	}

	pub fn is_attached(&self) -> bool {
		self.state.borrow().is_some()
	}

	fn attach(self: &Rc<Self>, binding: &LazyBinding) {
		let options = match binding {
			LazyBinding::Src(_) => self.defaults.clone(),
			LazyBinding::Options(overrides) => self.defaults.merged(overrides),
		};
		let src = self.resolve_src(binding, None);

		if !self.factory.is_supported() {
			if !src.is_empty() && self.element.is_image() {
				self.element.set_src(&src);
			}
			return;
		}

		if src.is_empty() {
			warn_log!("v-lazy-load: No source provided");
			return;
		}

		debug_log!("v-lazy-load: attaching {}", src);
		if self.element.is_image() {
			self.element.set_src(&options.placeholder);
		}
		self.element.add_class(CLASS_IMAGE);

		let observer = self
			.factory
			.create(&self.element, &ObserverInit::from(&options), self.handler());
		*self.state.borrow_mut() = Some(LazyState {
			original_src: src,
			attempts: 0,
			options,
			phase: LazyPhase::Placeholder,
		});
		*self.observer.borrow_mut() = Some(observer);
		self.observe();
	}

	/// Resolves the target source: the explicit binding, then `data-src`, then
	/// `fallback` (the stored source when attached, the displayed one otherwise).
	fn resolve_src(&self, binding: &LazyBinding, fallback: Option<&str>) -> String {
		match binding {
			LazyBinding::Src(src) => src.clone(),
			LazyBinding::Options(_) => self
				.element
				.data_src()
				.filter(|src| !src.is_empty())
				.or_else(|| fallback.map(str::to_string))
				.unwrap_or_else(|| self.element.src()),
		}
	}

	fn handler(self: &Rc<Self>) -> IntersectionHandler {
		let image = Rc::downgrade(self);
		Rc::new(move |entry: IntersectionEntry| match image.upgrade() {
			Some(image) => image.handle_intersection(entry).boxed_local(),
			None => futures::future::ready(()).boxed_local(),
		})
	}

	/// Re-binds the element.
	///
	/// A different source restarts the state machine from the placeholder; an
	/// unchanged one is ignored. An element that never attached tries again.
	pub fn updated(self: &Rc<Self>, binding: &LazyBinding) {
		let current = match self.original_src() {
			Some(current) => current,
			None => {
				self.attach(binding);
				return;
			}
		};

		let new_src = self.resolve_src(binding, Some(&current));
		if new_src == current {
			return;
		}

		debug_log!("v-lazy-load: source changed from {} to {}", current, new_src);
		self.unobserve();
		self.generation.set(self.generation.get().wrapping_add(1));
		self.cancel_load();

		let placeholder = {
			let mut state = self.state.borrow_mut();
			let Some(state) = state.as_mut() else {
				return;
			};
			state.original_src = new_src;
			state.attempts = 0;
			state.phase = LazyPhase::Placeholder;
			state.options.placeholder.clone()
		};

		self.element.remove_class(CLASS_LOADING);
		self.element.remove_class(CLASS_LOADED);
		self.element.remove_class(CLASS_ERROR);
		if self.element.is_image() {
			self.element.set_src(&placeholder);
		}
		self.observe();
	}

	/// Detaches the element: aborts any pending load, stops and releases the
	/// observer and clears all state.
	///
	/// Safe to call on an element that never attached, and more than once.
	pub fn unmounted(&self) {
		self.generation.set(self.generation.get().wrapping_add(1));
		self.cancel_load();
		if let Some(observer) = self.observer.borrow_mut().take() {
			observer.unobserve();
			observer.disconnect();
		}
		self.state.borrow_mut().take();
	}

	/// Runs the load cycle for a visibility notification.
	///
	/// Only an element waiting in the placeholder phase starts a cycle. Retries
	/// happen inside the cycle after the backoff delay, without waiting for
	/// another notification.
	///
	/// At most one load is in flight per element: a source change or unmount
	/// aborts the running cycle, and the next cycle starts loading only once
	/// the aborted one has been dropped.
	pub async fn handle_intersection(self: Rc<Self>, entry: IntersectionEntry) {
		if !entry.is_intersecting {
			return;
		}

		let generation = self.generation.get();
		let (src, options) = {
			let mut state = self.state.borrow_mut();
			let Some(state) = state.as_mut() else {
				return;
			};
			if state.phase != LazyPhase::Placeholder {
				return;
			}
			state.phase = LazyPhase::Loading;
			(state.original_src.clone(), state.options.clone())
		};

		let (abort, registration) = AbortHandle::new_pair();
		let (done_tx, done_rx) = oneshot::channel::<()>();
		let previous = self.in_flight.replace(Some(InFlight {
			generation,
			abort,
			done: done_rx,
		}));
		if let Some(previous) = previous {
			previous.abort.abort();
			// Canceled once the previous cycle's sender is dropped.
			let _ = previous.done.await;
		}

		if !self.is_stale(generation) {
			let cycle = Rc::clone(&self).run_cycle(generation, src, options);
			if Abortable::new(cycle, registration).await.is_err() {
				debug_log!("v-lazy-load: aborted load cycle {}", generation);
			}
		}
		drop(done_tx);

		let mut in_flight = self.in_flight.borrow_mut();
		if in_flight
			.as_ref()
			.is_some_and(|current| current.generation == generation)
		{
			*in_flight = None;
		}
	}

	/// Aborts the running cycle, if any.
	///
	/// The entry stays registered until the cycle has unwound, so the next
	/// cycle can wait for it.
	fn cancel_load(&self) {
		if let Some(in_flight) = self.in_flight.borrow().as_ref() {
			in_flight.abort.abort();
		}
	}

	async fn run_cycle(self: Rc<Self>, generation: u64, src: String, options: LazyLoadOptions) {
		loop {
			self.element.add_class(CLASS_LOADING);
			if self.element.is_image() {
				self.element.set_src(&options.loading);
			}

			let result = self.probe.probe(&src).await;
			if self.is_stale(generation) {
				return;
			}

			let failures = match result {
				Ok(()) => {
					if !options.delay().is_zero() {
						self.timer.sleep(options.delay()).await;
						if self.is_stale(generation) {
							return;
						}
					}
					self.finish(&src, LazyPhase::Loaded);
					return;
				}
				Err(_err) => {
					let failures = self.record_failure();
					debug_log!("v-lazy-load: attempt {} failed: {}", failures, _err);
					failures
				}
			};

			if failures >= options.retry {
				warn_log!("v-lazy-load: giving up on {} after {} attempts", src, failures);
				self.finish(&options.error, LazyPhase::Error);
				return;
			}

			self.timer.sleep(self.backoff.delay_after(failures)).await;
			if self.is_stale(generation) {
				return;
			}
		}
	}

	fn is_stale(&self, generation: u64) -> bool {
		self.generation.get() != generation || self.state.borrow().is_none()
	}

	fn record_failure(&self) -> u32 {
		let mut state = self.state.borrow_mut();
		match state.as_mut() {
			Some(state) => {
				state.attempts += 1;
				state.attempts
			}
			None => 0,
		}
	}

	/// Shows `src` and settles in a terminal phase, stopping observation.
	fn finish(&self, src: &str, phase: LazyPhase) {
		if phase == LazyPhase::Loaded || self.element.is_image() {
			self.element.set_src(src);
		}
		self.element.remove_class(CLASS_LOADING);
		if let Some(class) = phase.css_class() {
			self.element.add_class(class);
		}
		if let Some(state) = self.state.borrow_mut().as_mut() {
			state.phase = phase;
		}
		self.unobserve();
	}

	fn observe(&self) {
		if let Some(observer) = self.observer.borrow().as_ref() {
			observer.observe();
		}
	}

	fn unobserve(&self) {
		if let Some(observer) = self.observer.borrow().as_ref() {
			observer.unobserve();
		}
	}
}

impl<E> Drop for LazyImage<E> {
	fn drop(&mut self) {
		if let Some(observer) = self.observer.get_mut().take() {
			observer.disconnect();
		}
	}
}

impl<E> fmt::Debug for LazyImage<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyImage")
			.field("state", &self.state)
			.field("generation", &self.generation)
			.field("loading", &self.in_flight.borrow().is_some())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(LazyPhase::Unobserved, None)]
	#[case(LazyPhase::Placeholder, None)]
	#[case(LazyPhase::Loading, Some("lazy-loading"))]
	#[case(LazyPhase::Loaded, Some("lazy-loaded"))]
	#[case(LazyPhase::Error, Some("lazy-error"))]
	fn test_phase_css_class(#[case] phase: LazyPhase, #[case] expected: Option<&str>) {
		assert_eq!(phase.css_class(), expected);
	}

	#[rstest]
	fn test_binding_conversions() {
		assert_eq!(LazyBinding::from("/a.png"), LazyBinding::src("/a.png"));
		assert_eq!(
			LazyBinding::from(LazyLoadOverrides::new().with_retry(1)),
			LazyBinding::Options(LazyLoadOverrides {
				retry: Some(1),
				..Default::default()
			})
		);
	}
}
