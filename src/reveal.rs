//! Reveal-on-scroll.
//!
//! Elements opt in through [`TAG_CLASS`] and are revealed exactly once, by gaining [`REVEALED_CLASS`],
//! the first time they scroll into view. Revealed elements are never hidden again.
//!
//! One of three backends is chosen per page from [`Capabilities`]:
//!
//! - [`Backend::Timeline`]: GSAP with ScrollTrigger plays an entrance tween per element.
//! - [`Backend::Observer`]: an `IntersectionObserver` flips the class; CSS does the transition.
//! - [`Backend::Instant`]: everything is revealed immediately.
//!
//! All three end in the same visual state.

use crate::{animation, dom, Capabilities, Config};
use js_sys::{Array, Object};
use tracing::{error, info, instrument, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

pub const TAG_CLASS: &str = "animate-on-scroll";
pub const REVEALED_CLASS: &str = "animated";
/// Set on `<body>` by the observer backend; the stylesheet hides pending elements only under it.
pub const READY_CLASS: &str = "js-animation-ready";
pub const MAX_DELAY_TIERS: usize = 5;
const ENTRANCE_OFFSET: f64 = 30.0;
const ENTRANCE_DURATION: f64 = 0.8;

/// Tagged by the initial pass.
pub const DEFAULT_SELECTORS: &[&str] = &[
	"h1",
	"h2",
	".section-title",
	".blog-card",
	".project-card",
	".profile-image-container",
	"#hero-container p",
	"#skills-container > div",
	"#experience-container > div",
	"#education-container > div",
	".contact-form",
	".social-links-container a",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
	Untagged,
	Pending,
	Revealed,
}

impl RevealState {
	#[must_use]
	pub fn of(element: &Element) -> Self {
		if dom::has_class(element, REVEALED_CLASS) {
			Self::Revealed
		} else if dom::has_class(element, TAG_CLASS) {
			Self::Pending
		} else {
			Self::Untagged
		}
	}

	/// Opting in is idempotent.
	#[must_use]
	pub fn tag(self) -> Self {
		match self {
			Self::Untagged => Self::Pending,
			other => other,
		}
	}

	/// `Revealed` is terminal: scrolling away never un-reveals.
	#[must_use]
	pub fn on_intersection(self, intersecting: bool) -> Self {
		match self {
			Self::Pending if intersecting => Self::Revealed,
			other => other,
		}
	}
}

/// Whether an intersection report counts as having scrolled into view.
///
/// The initial report after `observe` arrives regardless of the thresholds, so the ratio is checked here too.
#[must_use]
pub fn meets_threshold(intersecting: bool, ratio: f64, threshold: f64) -> bool {
	intersecting && ratio >= threshold
}

/// Stagger bucket for the `index`th item: `0..MAX_DELAY_TIERS`.
#[must_use]
pub fn stagger_tier(index: usize) -> usize {
	index.min(MAX_DELAY_TIERS - 1)
}

/// `delay-100` through `delay-500`.
#[must_use]
pub fn delay_class(index: usize) -> String {
	format!("delay-{}", (stagger_tier(index) + 1) * 100)
}

/// Whether items matched by `selector` are list-like and should be staggered.
#[must_use]
pub fn staggers(selector: &str) -> bool {
	selector.contains("container") || selector.contains("card") || selector.contains("social-links")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
	Timeline,
	Observer,
	Instant,
}

impl Backend {
	#[must_use]
	pub fn select(capabilities: &Capabilities) -> Self {
		if capabilities.gsap && capabilities.scroll_trigger {
			Self::Timeline
		} else if capabilities.intersection_observer {
			Self::Observer
		} else {
			Self::Instant
		}
	}
}

/// Tags every match of `selectors` that isn't tagged yet. Returns the newly tagged elements.
pub fn tag_selectors(document: &Document, selectors: &[&str]) -> Vec<Element> {
	let mut tagged = Vec::new();
	for selector in selectors {
		for (index, element) in dom::query_all(document, selector).into_iter().enumerate() {
			if RevealState::of(&element) != RevealState::Untagged {
				continue;
			}
			dom::add_classes(&element, &[TAG_CLASS]);
			if staggers(selector) {
				dom::add_classes(&element, &[delay_class(index).as_str()]);
			}
			tagged.push(element);
		}
	}
	trace!("Tagged {} element(s).", tagged.len());
	tagged
}

/// Tags the direct children of `#container_id` and gives each a bounded stagger delay.
///
/// Returns the children that were newly tagged, so a running engine can watch them.
pub fn add_staggered_animations(document: &Document, container_id: &str) -> Vec<Element> {
	let container = match document.get_element_by_id(container_id) {
		Some(container) => container,
		None => return Vec::new(),
	};
	let children = container.children();
	let mut tagged = Vec::new();
	for index in 0..children.length() {
		let child = match children.item(index) {
			Some(child) => child,
			None => continue,
		};
		if RevealState::of(&child) == RevealState::Untagged {
			dom::add_classes(&child, &[TAG_CLASS]);
			tagged.push(child.clone());
		}
		dom::add_classes(&child, &[delay_class(index as usize).as_str()]);
	}
	tagged
}

fn reveal(element: &Element) {
	if RevealState::of(element).on_intersection(true) == RevealState::Revealed {
		dom::add_classes(element, &[REVEALED_CLASS]);
	}
}

/// A running reveal pass. Dropping it disconnects its observer.
pub struct RevealEngine {
	backend: Backend,
	observer: Option<IntersectionObserver>,
	_on_intersect: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
	on_enter: Vec<Closure<dyn FnMut()>>,
}

impl core::fmt::Debug for RevealEngine {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("RevealEngine").field("backend", &self.backend).field("on_enter", &self.on_enter.len()).finish()
	}
}

impl RevealEngine {
	/// Runs the tagging pass over [`DEFAULT_SELECTORS`] and starts watching every tagged element.
	#[instrument(skip(document, config))]
	pub fn start(document: &Document, config: &Config, capabilities: &Capabilities) -> Self {
		tag_selectors(document, DEFAULT_SELECTORS);
		let mut engine = Self::with_backend(document, config, Backend::select(capabilities));
		let pending: Vec<Element> = dom::query_all(document, &format!(".{}", TAG_CLASS)).into_iter().filter(|element| RevealState::of(element) == RevealState::Pending).collect();
		info!("Watching {} element(s) with {:?} backend.", pending.len(), engine.backend);
		for element in &pending {
			engine.watch(element);
		}
		engine
	}

	#[must_use]
	pub fn with_backend(document: &Document, config: &Config, backend: Backend) -> Self {
		let mut engine = Self { backend, observer: None, _on_intersect: None, on_enter: Vec::new() };
		if backend == Backend::Observer {
			match Self::create_observer(config) {
				Ok((observer, closure)) => {
					if let Some(body) = document.body() {
						dom::add_classes(&body, &[READY_CLASS]);
					}
					engine.observer = Some(observer);
					engine._on_intersect = Some(closure);
				}
				Err(error) => {
					warn!("IntersectionObserver construction failed ({:?}); revealing instantly.", error);
					engine.backend = Backend::Instant;
				}
			}
		}
		engine
	}

	#[must_use]
	pub fn backend(&self) -> Backend {
		self.backend
	}

	fn create_observer(config: &Config) -> Result<(IntersectionObserver, Closure<dyn FnMut(Array, IntersectionObserver)>), JsValue> {
		let threshold = config.reveal_threshold;
		let closure = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
			for entry in entries.iter() {
				let entry: IntersectionObserverEntry = match entry.dyn_into() {
					Ok(entry) => entry,
					Err(_) => continue,
				};
				let target = entry.target();
				let _enter = trace_span!("Intersection", ratio = entry.intersection_ratio()).entered();
				let visible = meets_threshold(entry.is_intersecting(), entry.intersection_ratio(), threshold);
				if RevealState::of(&target).on_intersection(visible) == RevealState::Revealed {
					dom::add_classes(&target, &[REVEALED_CLASS]);
					observer.unobserve(&target);
				}
			}
		}) as Box<dyn FnMut(Array, IntersectionObserver)>);

		let options = IntersectionObserverInit::new();
		options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
		options.set_root_margin(&config.reveal_root_margin);
		let observer = IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &options)?;
		Ok((observer, closure))
	}

	/// Starts watching a tagged element. Already revealed elements are left alone.
	pub fn watch(&mut self, element: &Element) {
		if RevealState::of(element) != RevealState::Pending {
			return;
		}
		match self.backend {
			Backend::Instant => reveal(element),
			Backend::Observer => match &self.observer {
				Some(observer) => observer.observe(element),
				None => reveal(element),
			},
			Backend::Timeline => {
				if let Err(error) = self.timeline(element) {
					error!("Entrance tween failed ({:?}); revealing instantly.", error);
					reveal(element);
				}
			}
		}
	}

	fn timeline(&mut self, element: &Element) -> Result<(), JsValue> {
		let from_vars = Object::new();
		animation::set(&from_vars, "opacity", 0.0)?;
		animation::set(&from_vars, "y", ENTRANCE_OFFSET)?;

		// Page tweens may still be running on the same element. Ending at explicit values and
		// taking over their properties leaves it fully visible either way.
		let to_vars = Object::new();
		animation::set(&to_vars, "opacity", 1.0)?;
		animation::set(&to_vars, "y", 0.0)?;
		animation::set(&to_vars, "duration", ENTRANCE_DURATION)?;
		animation::set(&to_vars, "ease", "power2.out")?;
		animation::set(&to_vars, "overwrite", "auto")?;

		let scroll_trigger = Object::new();
		animation::set(&scroll_trigger, "trigger", element.clone())?;
		animation::set(&scroll_trigger, "start", "top 80%")?;
		animation::set(&scroll_trigger, "once", true)?;

		let target = element.clone();
		let on_enter = Closure::wrap(Box::new(move || reveal(&target)) as Box<dyn FnMut()>);
		animation::set(&scroll_trigger, "onEnter", on_enter.as_ref().clone())?;
		animation::set(&to_vars, "scrollTrigger", scroll_trigger)?;

		animation::tween_from_to(element.as_ref(), &from_vars, &to_vars)?;
		self.on_enter.push(on_enter);
		Ok(())
	}
}

impl Drop for RevealEngine {
	fn drop(&mut self) {
		if let Some(observer) = &self.observer {
			observer.disconnect();
		}
	}
}
