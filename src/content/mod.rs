//! JSON-backed content listings: projects and blog posts.
//!
//! Both follow the same life cycle:
//! [`load`] (remote JSON, bundled samples on any failure) → [`render`] → [`init_filters`].
//! A landing page additionally shows a bounded subset through [`render_subset`].

pub mod blog;
pub mod project;

use crate::{
	dom,
	fetch::fetch_json,
	listeners::Listeners,
	view::{self, el, Node},
	Config,
};
use core::{cell::RefCell, fmt::Debug};
use serde::de::DeserializeOwned;
use std::rc::Rc;
use tracing::{error, info, instrument, trace, warn};
use web_sys::{Document, Element, Window};

pub use blog::BlogPost;
pub use project::Project;

/// The filter key that bypasses filtering.
pub const ALL: &str = "all";
pub const FILTER_BUTTON_SELECTOR: &str = ".filter-btn";

/// A kind of listed content.
pub trait Catalog: DeserializeOwned + Debug + Sized + 'static {
	/// Plural, lowercase, for messages: `"projects"`.
	const NOUN: &'static str;
	/// The main grid on the dedicated listing page.
	const GRID_ID: &'static str;
	/// The landing page's subset container.
	const SUBSET_ID: &'static str;
	const CARD_CLASS: &'static str;
	const FILTER_ACTIVE_CLASSES: &'static [&'static str];
	const FILTER_INACTIVE_CLASSES: &'static [&'static str];

	fn data_path(config: &Config) -> &str;
	fn category(&self) -> &str;
	fn card(&self) -> Node;
	/// Bundled fallback content.
	fn samples() -> Vec<Self>;
}

pub(crate) fn parse_samples<T: Catalog>(json: &str) -> Vec<T> {
	serde_json::from_str(json).unwrap_or_else(|error| {
		error!("Bundled {} samples are malformed: {}", T::NOUN, error);
		Vec::new()
	})
}

/// In-memory copy of a loaded list, written once per page life.
#[derive(Debug)]
pub struct Collection<T> {
	items: RefCell<Option<Rc<[T]>>>,
}

impl<T> Default for Collection<T> {
	fn default() -> Self {
		Self { items: RefCell::new(None) }
	}
}

impl<T> Collection<T> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn get(&self) -> Option<Rc<[T]>> {
		self.items.borrow().clone()
	}

	/// Stores `items` unless another loader got there first, and returns whatever is stored.
	pub fn set_once(&self, items: Vec<T>) -> Rc<[T]> {
		let mut slot = self.items.borrow_mut();
		match &*slot {
			Some(existing) => {
				trace!("Discarding a concurrently loaded copy.");
				existing.clone()
			}
			None => {
				let items: Rc<[T]> = items.into();
				*slot = Some(items.clone());
				items
			}
		}
	}
}

/// Fetches the catalog's JSON, falling back to [`Catalog::samples`]. Never fails.
#[instrument(skip(window, config, cache), fields(noun = T::NOUN))]
pub async fn load<T: Catalog>(window: &Window, config: &Config, cache: &Collection<T>) -> Rc<[T]> {
	if let Some(items) = cache.get() {
		return items;
	}
	let url = config.url(T::data_path(config));
	let items = match fetch_json::<Vec<T>>(window, &url).await {
		Ok(items) => {
			info!("Loaded {} {} from {}.", items.len(), T::NOUN, url);
			#[cfg(feature = "dangerous-logging")]
			tracing::trace!("{}: {:?}", T::NOUN, items);
			items
		}
		Err(error) => {
			warn!("Failed to load {} from {}: {}. Using bundled samples.", T::NOUN, url, error);
			T::samples()
		}
	};
	cache.set_once(items)
}

/// Case-insensitive exact category match; [`ALL`] matches everything.
#[must_use]
pub fn matches_filter(category: &str, filter: &str) -> bool {
	filter == ALL || category.to_lowercase() == filter.to_lowercase()
}

#[must_use]
pub fn filter<'a, T: Catalog>(items: &'a [T], key: &str) -> Vec<&'a T> {
	items.iter().filter(|item| matches_filter(item.category(), key)).collect()
}

/// Placeholder shown for an empty listing.
#[must_use]
pub fn empty_placeholder(noun: &str) -> Node {
	el("div")
		.class("col-span-full text-center py-8")
		.child(el("p").class("text-gray-600 dark:text-gray-400").text(format!("No {} found.", noun)))
		.into()
}

#[must_use]
pub fn grid_nodes<T: Catalog>(items: &[&T]) -> Vec<Node> {
	if items.is_empty() {
		vec![empty_placeholder(T::NOUN)]
	} else {
		items.iter().map(|item| item.card()).collect()
	}
}

/// Clears and repopulates [`Catalog::GRID_ID`]. Returns whether the grid exists.
pub fn render<T: Catalog>(document: &Document, items: &[&T]) -> bool {
	let grid = match document.get_element_by_id(T::GRID_ID) {
		Some(grid) => grid,
		None => {
			error!("#{} not found; not rendering {}.", T::GRID_ID, T::NOUN);
			return false;
		}
	};
	view::mount(document, &grid, &grid_nodes(items));
	trace!("Rendered {} {}.", items.len(), T::NOUN);
	true
}

fn set_active(buttons: &[Element], active: &Element, active_classes: &[&str], inactive_classes: &[&str]) {
	for button in buttons {
		dom::remove_classes(button, active_classes);
		dom::add_classes(button, inactive_classes);
	}
	dom::remove_classes(active, inactive_classes);
	dom::add_classes(active, active_classes);
}

/// Wires the `.filter-btn[data-filter]` group: one active button at a time, grid re-rendered with the subset.
///
/// Returns the number of buttons wired.
pub fn init_filters<T: Catalog>(document: &Document, listeners: &mut Listeners, items: Rc<[T]>) -> usize {
	listeners.replace_scope("filters");
	let buttons = dom::query_all(document, FILTER_BUTTON_SELECTOR);
	if buttons.is_empty() {
		return 0;
	}
	info!("Wiring {} {} filter button(s).", buttons.len(), T::NOUN);

	let group: Rc<[Element]> = buttons.clone().into();
	for button in &buttons {
		let group = group.clone();
		let active = button.clone();
		let items = items.clone();
		let document = document.clone();
		listeners.listen("filters", button.as_ref(), "click", move |_| {
			set_active(&group, &active, T::FILTER_ACTIVE_CLASSES, T::FILTER_INACTIVE_CLASSES);
			let key = active.get_attribute("data-filter").unwrap_or_else(|| ALL.to_owned());
			trace!("Filtering {} by {:?}.", T::NOUN, key);
			render(&document, &filter(&items, &key));
		});
	}
	buttons.len()
}

/// Full listing page: load, render everything, wire filters.
pub async fn init<T: Catalog>(window: &Window, document: &Document, config: &Config, cache: &Collection<T>, listeners: &RefCell<Listeners>) {
	let items = load(window, config, cache).await;
	let all: Vec<&T> = items.iter().collect();
	if render(document, &all) {
		init_filters(document, &mut listeners.borrow_mut(), items.clone());
	}
}

/// Renders `items` into `#container_id` as fading-in cards, independent of any filter state.
///
/// Returns the number of cards rendered, or [`None`] if the container is missing.
pub fn render_subset<T: Catalog>(document: &Document, container_id: &str, items: &[&T]) -> Option<usize> {
	let container = document.get_element_by_id(container_id)?;
	let cards: Vec<Node> = items.iter().map(|item| item.card()).collect();
	view::mount(document, &container, &cards);
	for card in dom::query_all(&container, &format!(".{}", T::CARD_CLASS)) {
		dom::add_classes(&card, &["fade-in"]);
	}
	Some(cards.len())
}

/// Shared card header: image with a category badge.
pub(crate) fn card_banner(image_url: Option<&str>, placeholder: &str, title: &str, category: &str, image_class: &str) -> Node {
	el("div")
		.class("relative")
		.child(el("img").class(image_class).attr("src", image_url.filter(|url| !url.is_empty()).unwrap_or(placeholder)).attr("alt", title))
		.child(el("div").class("absolute top-0 right-0 bg-blue-600 text-white text-sm font-semibold py-1 px-3 rounded-bl-lg").text(category))
		.into()
}

pub(crate) fn external_link(href: &str, class: &str, label: &str) -> Node {
	el("a").attr("href", href).attr("target", "_blank").attr("rel", "noopener noreferrer").class(class).text(label).into()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn category_match_is_case_insensitive_and_exact() {
		assert!(matches_filter("Web", "web"));
		assert!(matches_filter("web", "WEB"));
		assert!(!matches_filter("Web Apps", "web"));
		assert!(matches_filter("Anything", ALL));
	}

	#[test]
	fn filter_yields_exactly_the_matching_subset() {
		let projects = Project::samples();
		for key in &["web", "mobile", "other", "none"] {
			let filtered = filter(&projects, key);
			let expected: Vec<&Project> = projects.iter().filter(|p| p.category.eq_ignore_ascii_case(key)).collect();
			assert_eq!(filtered, expected);
		}
		assert_eq!(filter(&projects, ALL).len(), projects.len());
	}

	#[test]
	fn empty_grid_gets_a_placeholder() {
		let nodes = grid_nodes::<BlogPost>(&[]);
		assert_eq!(nodes.len(), 1);
		assert_eq!(nodes[0].text_content(), "No blog posts found.");
	}

	#[test]
	fn collection_keeps_the_first_write() {
		let collection = Collection::new();
		assert!(collection.get().is_none());
		collection.set_once(vec![1, 2, 3]);
		let kept = collection.set_once(vec![4]);
		assert_eq!(&*kept, &[1, 2, 3]);
		assert_eq!(&*collection.get().unwrap(), &[1, 2, 3]);
	}
}
