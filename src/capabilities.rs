use js_sys::{Object, Reflect};
use tracing::{info, instrument};
use wasm_bindgen::{JsCast, JsValue};

/// Optional browser-side enhancements, probed once at startup.
///
/// Components branch on this value instead of checking global symbols themselves,
/// so that every fallback path can be exercised by constructing a [`Capabilities`] by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
	/// The `gsap` animation library.
	pub gsap: bool,
	/// GSAP's `ScrollTrigger` plugin.
	pub scroll_trigger: bool,
	pub intersection_observer: bool,
	/// The `Prism` syntax highlighter.
	pub prism: bool,
}

impl Capabilities {
	/// Nothing optional available: every component takes its simplest path.
	#[must_use]
	pub fn none() -> Self {
		Self::default()
	}

	#[must_use]
	#[instrument]
	pub fn probe() -> Self {
		let global: Object = js_sys::global().unchecked_into();
		let gsap = is_object(&global, "gsap");
		let capabilities = Self {
			gsap,
			scroll_trigger: gsap && is_object(&global, "ScrollTrigger"),
			intersection_observer: is_object(&global, "IntersectionObserver"),
			prism: is_object(&global, "Prism"),
		};
		info!("Probed capabilities: {:?}", capabilities);
		capabilities
	}
}

fn is_object(global: &Object, name: &str) -> bool {
	match Reflect::get(global, &JsValue::from_str(name)) {
		Ok(value) => !value.is_undefined() && !value.is_null(),
		Err(_) => false,
	}
}
