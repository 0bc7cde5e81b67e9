//! Entrance animations through GSAP, when the page ships it.

use crate::{dom, page::Page, Capabilities};
use js_sys::{Object, Reflect};
use tracing::{error, info, instrument, trace, warn};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use web_sys::Document;

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(catch, js_namespace = gsap, js_name = from)]
	fn gsap_from(targets: &JsValue, vars: &Object) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(catch, js_namespace = gsap, js_name = fromTo)]
	fn gsap_from_to(targets: &JsValue, from_vars: &Object, to_vars: &Object) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(catch, js_namespace = gsap, js_name = registerPlugin)]
	fn gsap_register_plugin(plugin: &JsValue) -> Result<JsValue, JsValue>;
}

/// Starting values of a `gsap.from` tween, animated towards the element's resting style.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
	pub targets: &'static str,
	pub opacity: f64,
	pub x: f64,
	pub y: f64,
	pub scale: Option<f64>,
	pub duration: f64,
	pub delay: f64,
	pub stagger: f64,
	pub ease: &'static str,
	/// Selector of the ScrollTrigger element, if the tween waits until it scrolls into view.
	pub scroll_trigger: Option<&'static str>,
}

impl Tween {
	#[must_use]
	pub fn fade_up(targets: &'static str, y: f64, duration: f64) -> Self {
		Self {
			targets,
			opacity: 0.0,
			x: 0.0,
			y,
			scale: None,
			duration,
			delay: 0.0,
			stagger: 0.0,
			ease: "power2.out",
			scroll_trigger: None,
		}
	}

	#[must_use]
	pub fn delay(mut self, delay: f64) -> Self {
		self.delay = delay;
		self
	}

	#[must_use]
	pub fn stagger(mut self, stagger: f64) -> Self {
		self.stagger = stagger;
		self
	}

	#[must_use]
	pub fn ease(mut self, ease: &'static str) -> Self {
		self.ease = ease;
		self
	}

	#[must_use]
	pub fn x(mut self, x: f64) -> Self {
		self.x = x;
		self
	}

	#[must_use]
	pub fn scale(mut self, scale: f64) -> Self {
		self.scale = Some(scale);
		self
	}

	#[must_use]
	pub fn on_scroll(mut self, trigger: &'static str) -> Self {
		self.scroll_trigger = Some(trigger);
		self
	}

	/// The `vars` object passed to `gsap.from`.
	pub fn to_vars(&self) -> Result<Object, JsValue> {
		let vars = Object::new();
		set(&vars, "opacity", self.opacity)?;
		if self.x != 0.0 {
			set(&vars, "x", self.x)?;
		}
		if self.y != 0.0 {
			set(&vars, "y", self.y)?;
		}
		if let Some(scale) = self.scale {
			set(&vars, "scale", scale)?;
		}
		set(&vars, "duration", self.duration)?;
		if self.delay != 0.0 {
			set(&vars, "delay", self.delay)?;
		}
		if self.stagger != 0.0 {
			set(&vars, "stagger", self.stagger)?;
		}
		set(&vars, "ease", self.ease)?;
		if let Some(trigger) = self.scroll_trigger {
			let scroll_trigger = Object::new();
			set(&scroll_trigger, "trigger", trigger)?;
			set(&scroll_trigger, "start", "top 80%")?;
			set(&vars, "scrollTrigger", scroll_trigger)?;
		}
		Ok(vars)
	}
}

pub(crate) fn set(object: &Object, key: &str, value: impl Into<JsValue>) -> Result<(), JsValue> {
	Reflect::set(object, &JsValue::from_str(key), &value.into()).map(drop)
}

fn tween_from(targets: &JsValue, vars: &Object) -> Result<(), JsValue> {
	gsap_from(targets, vars).map(drop)
}

/// Unlike `gsap.from`, the end state doesn't depend on whatever another tween left behind.
pub(crate) fn tween_from_to(targets: &JsValue, from_vars: &Object, to_vars: &Object) -> Result<(), JsValue> {
	gsap_from_to(targets, from_vars, to_vars).map(drop)
}

/// Tweens for `page`. Scroll-triggered variants are used only if ScrollTrigger is loaded;
/// otherwise cards fall back to a delayed plain entrance.
#[must_use]
pub fn page_tweens(page: &Page, scroll_trigger: bool) -> Vec<Tween> {
	let mut tweens = vec![Tween::fade_up("header", -50.0, 0.5), Tween::fade_up("footer", 50.0, 0.5).delay(0.5)];

	let cards = |targets: &'static str, trigger: &'static str| {
		let tween = Tween::fade_up(targets, 30.0, 0.6).stagger(0.1);
		if scroll_trigger {
			tween.on_scroll(trigger)
		} else {
			tween.delay(0.5)
		}
	};

	match page {
		Page::Home => {
			tweens.push(Tween::fade_up("#hero h1", 30.0, 0.8).delay(0.2).ease("power3.out"));
			tweens.push(Tween::fade_up("#hero p", 20.0, 0.8).delay(0.4).ease("power3.out"));
			tweens.push(Tween::fade_up("#hero a", 20.0, 0.8).delay(0.6).stagger(0.2).ease("power3.out"));
			if scroll_trigger {
				tweens.push(Tween::fade_up("#featured-projects .project-card", 50.0, 0.6).stagger(0.2).on_scroll("#featured-projects"));
				tweens.push(Tween::fade_up("#recent-blogs .blog-card", 50.0, 0.6).stagger(0.2).on_scroll("#recent-blogs"));
			}
		}
		Page::Projects => {
			tweens.push(Tween::fade_up(".filter-btn", 20.0, 0.5).stagger(0.1));
			tweens.push(cards("#projects-grid .project-card", "#projects-grid"));
		}
		Page::Blog => {
			tweens.push(Tween::fade_up(".filter-btn", 20.0, 0.5).stagger(0.1));
			tweens.push(cards("#blog-container .blog-card", "#blog-container"));
		}
		Page::About => {
			tweens.push(Tween::fade_up("#profile-image", 0.0, 0.8).scale(0.8).ease("back.out(1.7)"));
			if scroll_trigger {
				tweens.push(Tween::fade_up("#skills-container > div", 0.0, 0.5).x(-30.0).stagger(0.1).on_scroll("#skills-container"));
			}
		}
		Page::Contact => {
			tweens.push(Tween::fade_up("#contact-form", 30.0, 0.8));
			tweens.push(Tween::fade_up("#contact-form > div", 20.0, 0.5).stagger(0.1).delay(0.3));
			tweens.push(Tween::fade_up(".contact-info .flex", 0.0, 0.5).x(30.0).stagger(0.1).delay(0.5));
		}
		Page::BlogPost | Page::Other(_) => {}
	}
	tweens
}

/// Selectors that get the CSS `fade-in` entrance when GSAP is absent.
pub const FALLBACK_FADE_IN: &str = "header, footer, #hero h1, #hero p, #hero a, .project-card, .blog-card, #contact-form, .filter-btn";

/// Registers ScrollTrigger when available.
pub fn register_scroll_trigger(capabilities: &Capabilities) {
	if !capabilities.scroll_trigger {
		return;
	}
	let plugin = Reflect::get(&js_sys::global(), &JsValue::from_str("ScrollTrigger")).unwrap_or(JsValue::UNDEFINED);
	match gsap_register_plugin(&plugin) {
		Ok(_) => trace!("Registered ScrollTrigger."),
		Err(error) => error!("Failed to register ScrollTrigger: {:?}", error),
	}
}

/// Runs the page's entrance tweens, or the CSS fallback without GSAP. Returns the number of tweens started.
#[instrument(skip(document))]
pub fn init_page_animations(document: &Document, capabilities: &Capabilities, page: &Page) -> usize {
	if !capabilities.gsap {
		warn!("GSAP not loaded; using CSS fade-in fallback.");
		for element in dom::query_all(document, FALLBACK_FADE_IN) {
			dom::add_classes(&element, &["fade-in"]);
		}
		return 0;
	}

	register_scroll_trigger(capabilities);
	let mut started = 0;
	for tween in page_tweens(page, capabilities.scroll_trigger) {
		// GSAP warns on the console for selectors without matches.
		if dom::query_one(document, tween.targets).is_none() {
			continue;
		}
		match tween.to_vars().and_then(|vars| tween_from(&JsValue::from_str(tween.targets), &vars)) {
			Ok(()) => started += 1,
			Err(error) => error!("Tween for {:?} failed: {:?}", tween.targets, error),
		}
	}
	info!("Started {} page tween(s).", started);
	started
}
