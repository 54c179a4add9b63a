//! Grappelli Pages - DOM-side behaviours for Grappelli components
//!
//! ## Features
//!
//! - **Lazy image loading**: intersection-driven image loading with placeholder,
//!   loading and error images, linear-backoff retry and one-shot observation
//! - **Preloading**: warm the browser cache before an image scrolls into view
//! - **Target independence**: the state machine talks to the DOM through small
//!   traits, so it runs in the browser (wasm32) and in native tests alike
//!
//! ## Architecture
//!
//! - [`lazy_load`]: the `v-lazy-load` directive and its collaborators
//! - [`logging`]: console / `tracing` logging macros
//!
//! ## Example
//!
//! ```ignore
//! use grappelli_pages::lazy_load::{LazyBinding, LazyLoadDirective};
//! use grappelli_pages::lazy_load::dom::{DomImage, DomImageProbe, DomObserverFactory, DomTimer};
//!
//! let directive = LazyLoadDirective::new(DomObserverFactory, DomImageProbe, DomTimer);
//! let image = directive.mounted(DomImage::new(element), &LazyBinding::src("/media/hero.jpg"));
//! ```

pub mod lazy_load;
pub mod logging;

pub use lazy_load::{
	ImageProbe, IntersectionEntry, LAZY_LOAD_STYLES, LazyBinding, LazyElement, LazyImage,
	LazyLoadDirective, LazyLoadOptions, LazyLoadOverrides, LazyPhase, LoadError, ObserverFactory,
	ObserverInit, Timer, VisibilityObserver, configure_lazy_load, global_options, preload_image,
	preload_images, reset_lazy_load_config,
};

#[cfg(not(target_arch = "wasm32"))]
pub use lazy_load::TokioTimer;

#[doc(hidden)]
pub mod __private {
	pub use tracing;
}
