//! Browser implementations of the lazy-load collaborators
//!
//! Only compiled for wasm32.

use super::{
	ImageProbe, IntersectionEntry, IntersectionHandler, LazyElement, LoadError, ObserverFactory,
	ObserverInit, Timer, VisibilityObserver,
};
use crate::error_log;
use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect};
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
	Element, HtmlElement, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
	IntersectionObserverInit,
};

/// A DOM element driven by the directive.
#[derive(Debug, Clone)]
pub struct DomImage {
	element: HtmlElement,
}

impl DomImage {
	pub fn new(element: HtmlElement) -> Self {
		Self { element }
	}

	pub fn element(&self) -> &HtmlElement {
		&self.element
	}
}

impl LazyElement for DomImage {
	fn is_image(&self) -> bool {
		self.element.tag_name().eq_ignore_ascii_case("img")
	}

	fn src(&self) -> String {
		match self.element.dyn_ref::<HtmlImageElement>() {
			Some(image) => image.src(),
			None => self.element.get_attribute("src").unwrap_or_default(),
		}
	}

	fn set_src(&self, src: &str) {
		match self.element.dyn_ref::<HtmlImageElement>() {
			Some(image) => image.set_src(src),
			None => {
				if let Err(err) = self.element.set_attribute("src", src) {
					error_log!("v-lazy-load: failed to set src: {:?}", err);
				}
			}
		}
	}

	fn data_src(&self) -> Option<String> {
		self.element.get_attribute("data-src")
	}

	fn add_class(&self, class: &str) {
		if let Err(err) = self.element.class_list().add_1(class) {
			error_log!("v-lazy-load: failed to add class {}: {:?}", class, err);
		}
	}

	fn remove_class(&self, class: &str) {
		if let Err(err) = self.element.class_list().remove_1(class) {
			error_log!("v-lazy-load: failed to remove class {}: {:?}", class, err);
		}
	}
}

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct DomObserver {
	// None when the browser rejected the observer options.
	observer: Option<IntersectionObserver>,
	target: Element,
	_callback: ObserverCallback,
}

impl VisibilityObserver for DomObserver {
	fn observe(&self) {
		if let Some(observer) = &self.observer {
			observer.observe(&self.target);
		}
	}

	fn unobserve(&self) {
		if let Some(observer) = &self.observer {
			observer.unobserve(&self.target);
		}
	}

	fn disconnect(&self) {
		if let Some(observer) = &self.observer {
			observer.disconnect();
		}
	}
}

/// Creates one `IntersectionObserver` per element.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomObserverFactory;

impl ObserverFactory<DomImage> for DomObserverFactory {
	fn is_supported(&self) -> bool {
		web_sys::window()
			.map(|window| {
				Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
			})
			.unwrap_or(false)
	}

	fn create(
		&self,
		element: &DomImage,
		init: &ObserverInit,
		handler: IntersectionHandler,
	) -> Box<dyn VisibilityObserver> {
		let callback: ObserverCallback = Closure::wrap(Box::new(
			move |entries: Array, _observer: IntersectionObserver| {
				for entry in entries.iter() {
					let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
						continue;
					};
					spawn_local(handler(IntersectionEntry {
						is_intersecting: entry.is_intersecting(),
						intersection_ratio: entry.intersection_ratio(),
					}));
				}
			},
		) as Box<dyn FnMut(Array, IntersectionObserver)>);

		let options = IntersectionObserverInit::new();
		options.set_threshold(&JsValue::from_f64(init.threshold));
		options.set_root_margin(&init.root_margin);

		let observer =
			match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
				Ok(observer) => Some(observer),
				Err(err) => {
					error_log!("v-lazy-load: failed to create IntersectionObserver: {:?}", err);
					None
				}
			};

		Box::new(DomObserver {
			observer,
			target: Element::from(element.element().clone()),
			_callback: callback,
		})
	}
}

/// Detached image used for one load; detaches its handlers and stops the
/// request when dropped, including when the load is aborted.
struct PendingImage(HtmlImageElement);

impl Drop for PendingImage {
	fn drop(&mut self) {
		self.0.set_onload(None);
		self.0.set_onerror(None);
		if let Err(err) = self.0.remove_attribute("src") {
			error_log!("v-lazy-load: failed to release image: {:?}", err);
		}
	}
}

/// Probes a source with a detached `HtmlImageElement`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomImageProbe;

#[async_trait(?Send)]
impl ImageProbe for DomImageProbe {
	async fn probe(&self, src: &str) -> Result<(), LoadError> {
		let image = HtmlImageElement::new()
			.map(PendingImage)
			.map_err(|err| LoadError::Unavailable(format!("{:?}", err)))?;

		let promise = Promise::new(&mut |resolve: Function, reject: Function| {
			image.0.set_onload(Some(&resolve));
			image.0.set_onerror(Some(&reject));
		});
		image.0.set_src(src);

		let result = JsFuture::from(promise).await;
		drop(image);
		result.map(|_| ()).map_err(|_| LoadError::failed(src))
	}
}

/// [`Timer`] backed by `window.setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomTimer;

#[async_trait(?Send)]
impl Timer for DomTimer {
	async fn sleep(&self, duration: Duration) {
		let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
		let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
			let scheduled = web_sys::window().map(|window| {
				window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
			});
			if !matches!(scheduled, Some(Ok(_))) {
				let _ = resolve.call0(&JsValue::NULL);
			}
		});
		let _ = JsFuture::from(promise).await;
	}
}
