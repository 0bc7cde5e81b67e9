//! Thin conveniences over `web_sys` that log instead of failing.

use crate::{Error, Result};
use js_sys::Promise;
use tracing::{error, trace};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, Window};

pub fn window() -> Result<Window> {
	web_sys::window().ok_or_else(|| Error::Js("No `window` in this context.".to_owned()))
}

pub fn document(window: &Window) -> Result<Document> {
	window.document().ok_or_else(|| Error::Js("No `document` on `window`.".to_owned()))
}

pub fn element_by_id(document: &Document, id: &str) -> Result<Element> {
	document.get_element_by_id(id).ok_or_else(|| Error::MissingElement(id.to_owned()))
}

/// `querySelectorAll` collected into `Element`s. An invalid selector is logged and yields nothing.
pub fn query_all(root: &impl QueryRoot, selector: &str) -> Vec<Element> {
	let list = match root.query_selector_all_(selector) {
		Ok(list) => list,
		Err(error) => {
			error!("Invalid selector {:?}: {:?}", selector, error);
			return Vec::new();
		}
	};
	(0..list.length()).filter_map(|i| list.get(i)).filter_map(|node| node.dyn_into::<Element>().ok()).collect()
}

pub fn query_one(root: &impl QueryRoot, selector: &str) -> Option<Element> {
	match root.query_selector_(selector) {
		Ok(element) => element,
		Err(error) => {
			error!("Invalid selector {:?}: {:?}", selector, error);
			None
		}
	}
}

/// [`Document`] and [`Element`] both support selector queries, but share no `web_sys` trait for it.
pub trait QueryRoot {
	fn query_selector_all_(&self, selector: &str) -> core::result::Result<web_sys::NodeList, JsValue>;
	fn query_selector_(&self, selector: &str) -> core::result::Result<Option<Element>, JsValue>;
}
impl QueryRoot for Document {
	fn query_selector_all_(&self, selector: &str) -> core::result::Result<web_sys::NodeList, JsValue> {
		self.query_selector_all(selector)
	}
	fn query_selector_(&self, selector: &str) -> core::result::Result<Option<Element>, JsValue> {
		self.query_selector(selector)
	}
}
impl QueryRoot for Element {
	fn query_selector_all_(&self, selector: &str) -> core::result::Result<web_sys::NodeList, JsValue> {
		self.query_selector_all(selector)
	}
	fn query_selector_(&self, selector: &str) -> core::result::Result<Option<Element>, JsValue> {
		self.query_selector(selector)
	}
}

pub fn add_classes(element: &Element, classes: &[&str]) {
	let class_list = element.class_list();
	for class in classes {
		if let Err(error) = class_list.add_1(class) {
			error!("Failed to add class {:?}: {:?}", class, error);
		}
	}
}

pub fn remove_classes(element: &Element, classes: &[&str]) {
	let class_list = element.class_list();
	for class in classes {
		if let Err(error) = class_list.remove_1(class) {
			error!("Failed to remove class {:?}: {:?}", class, error);
		}
	}
}

pub fn has_class(element: &Element, class: &str) -> bool {
	element.class_list().contains(class)
}

pub fn as_html_element(element: &Element) -> Option<&HtmlElement> {
	element.dyn_ref::<HtmlElement>()
}

/// Milliseconds since the epoch, as used for cache-busting stamps.
#[must_use]
pub fn now_ms() -> u64 {
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let now = js_sys::Date::now() as u64;
	now
}

/// Resolves after `ms` milliseconds on the event loop.
pub async fn sleep(window: &Window, ms: i32) {
	let mut scheduled = Ok(0);
	let promise = Promise::new(&mut |resolve, _reject| {
		scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
	});
	if let Err(error) = scheduled {
		error!("Failed to schedule a {}ms timer: {:?}", ms, error);
		return;
	}
	trace!("Sleeping for {}ms.", ms);
	if let Err(error) = JsFuture::from(promise).await {
		error!("Timer promise rejected: {:?}", error);
	}
}
