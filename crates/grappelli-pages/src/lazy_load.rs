//! Lazy image loading
//!
//! An image bound with the directive shows a placeholder until it scrolls into
//! view. Once visible it shows a loading image, probes the real source off-DOM
//! and swaps it in on success. Failures are retried with linear backoff
//! (1s, 2s, 3s, ...) until the retry limit is reached, after which the error
//! image is shown.
//!
//! Phase changes map onto CSS classes:
//!
//! | Phase | Classes |
//! |-------|---------|
//! | placeholder | `lazy-image` |
//! | loading | `lazy-image lazy-loading` |
//! | loaded | `lazy-image lazy-loaded` |
//! | error | `lazy-image lazy-error` |
//!
//! See [`LAZY_LOAD_STYLES`] for a stylesheet that targets them.

mod directive;
mod element;
mod error;
mod options;
mod preload;
mod retry;
mod styles;
mod timer;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use directive::{LazyBinding, LazyImage, LazyLoadDirective, LazyPhase};
pub use element::{
	ImageProbe, IntersectionEntry, IntersectionHandler, LazyElement, ObserverFactory,
	ObserverInit, VisibilityObserver,
};
pub use error::LoadError;
pub use options::{
	DEFAULT_ERROR_IMAGE, DEFAULT_LOADING_IMAGE, DEFAULT_PLACEHOLDER_IMAGE, LazyLoadOptions,
	LazyLoadOverrides, configure_lazy_load, global_options, reset_lazy_load_config,
};
pub use preload::{preload_image, preload_images};
pub use retry::LinearBackoff;
pub use styles::LAZY_LOAD_STYLES;
pub use timer::Timer;

#[cfg(not(target_arch = "wasm32"))]
pub use timer::TokioTimer;
