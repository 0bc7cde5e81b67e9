use crate::{dom, listeners::Listeners, Config};
use tracing::{instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node, ScrollBehavior, ScrollIntoViewOptions, Window};

pub const MOBILE_MENU_BUTTON_ID: &str = "mobile-menu-button";
pub const MOBILE_MENU_ID: &str = "mobile-menu";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const ELEVATED_HEADER_CLASSES: &[&str] = &["shadow-md", "bg-opacity-90", "backdrop-blur-sm"];
pub const ACTIVE_CLASS: &str = "active";

#[must_use]
pub fn header_elevated(scroll_y: f64, threshold: f64) -> bool {
	scroll_y > threshold
}

#[must_use]
pub fn should_close_on_resize(inner_width: f64, desktop_min_width: f64, menu_open: bool) -> bool {
	menu_open && inner_width >= desktop_min_width
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
	pub id: String,
	pub top: f64,
	pub height: f64,
}

/// The section whose `[top - offset, top - offset + height)` band contains `scroll_y`.
///
/// Sections are expected not to overlap. If they do, the last match wins.
#[must_use]
pub fn current_section(scroll_y: f64, sections: &[SectionBounds], offset: f64) -> Option<&str> {
	sections
		.iter()
		.filter(|section| {
			let top = section.top - offset;
			scroll_y >= top && scroll_y < top + section.height
		})
		.last()
		.map(|section| section.id.as_str())
}

/// Whether a nav link's `href` points at the section `id`, e.g. `#about` or `index.html#about`.
#[must_use]
pub fn link_targets_section(href: &str, id: &str) -> bool {
	match href.split_once('#') {
		Some((_, fragment)) => !id.is_empty() && fragment == id,
		None => false,
	}
}

/// The last path segment, or `index.html` at a directory root.
#[must_use]
pub fn page_file_name(pathname: &str) -> &str {
	match pathname.rsplit('/').next() {
		Some(name) if !name.is_empty() => name,
		_ => "index.html",
	}
}

fn is_open(menu: &Element) -> bool {
	!dom::has_class(menu, "hidden")
}

fn close(menu: &Element) {
	dom::add_classes(menu, &["hidden"]);
	dom::remove_classes(menu, &["fade-in"]);
}

/// Wires the mobile menu, header chrome, smooth anchor scrolling and scroll spy.
///
/// Every part is skipped quietly when its elements are missing from the page.
#[instrument(skip(window, document, config, listeners))]
pub fn init_navigation(window: &Window, document: &Document, config: &Config, listeners: &mut Listeners) {
	listeners.replace_scope("navigation");
	init_mobile_menu(window, document, config, listeners);
	init_header_chrome(window, document, config, listeners);
	init_anchor_scrolling(document, listeners);
	init_scroll_spy(window, document, config, listeners);
}

fn init_mobile_menu(window: &Window, document: &Document, config: &Config, listeners: &mut Listeners) {
	let (button, menu) = match (document.get_element_by_id(MOBILE_MENU_BUTTON_ID), document.get_element_by_id(MOBILE_MENU_ID)) {
		(Some(button), Some(menu)) => (button, menu),
		_ => return trace!("No mobile menu on this page."),
	};

	{
		let menu = menu.clone();
		listeners.listen("navigation", button.as_ref(), "click", move |_| {
			if is_open(&menu) {
				close(&menu);
			} else {
				dom::remove_classes(&menu, &["hidden"]);
				dom::add_classes(&menu, &["fade-in"]);
			}
		});
	}

	{
		let menu = menu.clone();
		let button = button.clone();
		listeners.listen("navigation", document.as_ref(), "click", move |event| {
			if !is_open(&menu) {
				return;
			}
			let target = event.target().and_then(|target| target.dyn_into::<Node>().ok());
			let menu_node: &Node = menu.as_ref();
			let button_node: &Node = button.as_ref();
			if !menu_node.contains(target.as_ref()) && !button_node.contains(target.as_ref()) {
				close(&menu);
			}
		});
	}

	let desktop_min_width = config.desktop_min_width;
	let resize_window = window.clone();
	listeners.listen("navigation", window.as_ref(), "resize", move |_| {
		let inner_width = resize_window.inner_width().ok().and_then(|width| width.as_f64()).unwrap_or(0.0);
		if should_close_on_resize(inner_width, desktop_min_width, is_open(&menu)) {
			close(&menu);
		}
	});
}

fn init_header_chrome(window: &Window, document: &Document, config: &Config, listeners: &mut Listeners) {
	let header = match dom::query_one(document, "header") {
		Some(header) => header,
		None => return trace!("No <header> to style on scroll."),
	};
	let threshold = config.header_scroll_threshold;
	let scroll_window = window.clone();
	listeners.listen("navigation", window.as_ref(), "scroll", move |_| {
		let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
		if header_elevated(scroll_y, threshold) {
			dom::add_classes(&header, ELEVATED_HEADER_CLASSES);
		} else {
			dom::remove_classes(&header, ELEVATED_HEADER_CLASSES);
		}
	});
}

fn init_anchor_scrolling(document: &Document, listeners: &mut Listeners) {
	for anchor in dom::query_all(document, r##"a[href^="#"]"##) {
		let document = document.clone();
		let href = anchor.get_attribute("href").unwrap_or_default();
		listeners.listen("navigation", anchor.as_ref(), "click", move |event| {
			event.prevent_default();
			let target = match document.get_element_by_id(href.trim_start_matches('#')) {
				Some(target) => target,
				None => return warn!("Anchor {:?} has no target on this page.", href),
			};
			let options = ScrollIntoViewOptions::new();
			options.set_behavior(ScrollBehavior::Smooth);
			target.scroll_into_view_with_scroll_into_view_options(&options);

			if let Some(menu) = document.get_element_by_id(MOBILE_MENU_ID) {
				if is_open(&menu) {
					close(&menu);
				}
			}
		});
	}
}

fn init_scroll_spy(window: &Window, document: &Document, config: &Config, listeners: &mut Listeners) {
	let sections: Vec<HtmlElement> = dom::query_all(document, "section[id]").into_iter().filter_map(|section| section.dyn_into().ok()).collect();
	let links = dom::query_all(document, NAV_LINK_SELECTOR);
	if sections.is_empty() || links.is_empty() {
		return trace!("No sections to spy on.");
	}

	let offset = config.scroll_spy_offset;
	let spy_window = window.clone();
	listeners.listen("navigation", window.as_ref(), "scroll", move |_| {
		// Layout may shift after images load, so measure on every event.
		let bounds: Vec<SectionBounds> = sections
			.iter()
			.map(|section| SectionBounds {
				id: section.id(),
				top: f64::from(section.offset_top()),
				height: f64::from(section.offset_height()),
			})
			.collect();
		let current = current_section(spy_window.scroll_y().unwrap_or(0.0), &bounds, offset);
		for link in &links {
			let href = link.get_attribute("href").unwrap_or_default();
			match current {
				Some(id) if link_targets_section(&href, id) => dom::add_classes(link, &[ACTIVE_CLASS]),
				_ => dom::remove_classes(link, &[ACTIVE_CLASS]),
			}
		}
	});
}

/// Marks the `.nav-link` pointing at the current page file as active.
pub fn mark_current_page_link(document: &Document, page_file: &str) {
	for link in dom::query_all(document, NAV_LINK_SELECTOR) {
		if link.get_attribute("href").as_deref() == Some(page_file) {
			dom::add_classes(&link, &[ACTIVE_CLASS]);
		}
	}
}
