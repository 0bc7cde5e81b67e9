//! Optional client-side router for single-page layouts.
//!
//! The shipped site navigates between real pages and doesn't need this.
//! A page that renders everything into one container can register a handler per path instead:
//!
//! ```ignore
//! let router = Router::new(window, document);
//! router.add_route("/", Rc::new(|_| render_home()));
//! router.add_route("/about", Rc::new(|data| render_about(data)));
//! router.init("app", Some("/"));
//! ```
//!
//! Links opt in with a `data-router-link` attribute.

use crate::{dom, listeners::Listeners};
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::{Rc, Weak};
use tracing::{error, info, instrument, trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, PopStateEvent, Window};

pub const LINK_ATTRIBUTE: &str = "data-router-link";
pub const DEFAULT_ROUTE: &str = "/";

pub type Handler = Rc<dyn Fn(&Value)>;

/// Paths and their handlers, plus the route that catches everything else.
pub struct RouteTable {
	routes: HashMap<String, Handler>,
	default_route: String,
}

impl core::fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("RouteTable").field("routes", &self.routes.keys().collect::<Vec<_>>()).field("default_route", &self.default_route).finish()
	}
}

impl Default for RouteTable {
	fn default() -> Self {
		Self { routes: HashMap::new(), default_route: DEFAULT_ROUTE.to_owned() }
	}
}

impl RouteTable {
	pub fn insert(&mut self, path: impl Into<String>, handler: Handler) {
		self.routes.insert(path.into(), handler);
	}

	#[must_use]
	pub fn contains(&self, path: &str) -> bool {
		self.routes.contains_key(path)
	}

	pub fn set_default_route(&mut self, path: impl Into<String>) {
		self.default_route = path.into();
	}

	#[must_use]
	pub fn default_route(&self) -> &str {
		&self.default_route
	}

	/// The handler for `path`, or else the default route's.
	#[must_use]
	pub fn resolve(&self, path: &str) -> Option<Handler> {
		self.routes.get(path).or_else(|| self.routes.get(&self.default_route)).cloned()
	}
}

/// What goes into `history.state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
	pub path: String,
	#[serde(default)]
	pub data: Value,
}

impl HistoryState {
	fn to_js(&self) -> Result<JsValue, JsValue> {
		let json = serde_json::to_string(self).map_err(|error| JsValue::from_str(&error.to_string()))?;
		js_sys::JSON::parse(&json)
	}

	fn from_js(state: &JsValue) -> Option<Self> {
		if state.is_null() || state.is_undefined() {
			return None;
		}
		let json: String = js_sys::JSON::stringify(state).ok()?.into();
		serde_json::from_str(&json).ok()
	}
}

pub struct Router {
	window: Window,
	document: Document,
	table: RefCell<RouteTable>,
	current: RefCell<Option<String>>,
	container: RefCell<Option<Element>>,
	listeners: RefCell<Listeners>,
	initialized: Cell<bool>,
}

impl core::fmt::Debug for Router {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Router").field("table", &self.table).field("current", &self.current).field("initialized", &self.initialized).finish()
	}
}

impl Router {
	#[must_use]
	pub fn new(window: &Window, document: &Document) -> Rc<Self> {
		Rc::new(Self {
			window: window.clone(),
			document: document.clone(),
			table: RefCell::default(),
			current: RefCell::new(None),
			container: RefCell::new(None),
			listeners: RefCell::default(),
			initialized: Cell::new(false),
		})
	}

	pub fn add_route(&self, path: impl Into<String>, handler: Handler) {
		self.table.borrow_mut().insert(path, handler);
	}

	#[must_use]
	pub fn current_route(&self) -> Option<String> {
		self.current.borrow().clone()
	}

	/// The container given to [`Router::init`].
	#[must_use]
	pub fn container(&self) -> Option<Element> {
		self.container.borrow().clone()
	}

	#[must_use]
	pub fn is_initialized(&self) -> bool {
		self.initialized.get()
	}

	/// Runs the handler for `path` (or the default route's), optionally pushing a history entry.
	///
	/// Returns whether a handler ran.
	#[instrument(skip(self, data))]
	pub fn navigate_to(&self, path: &str, data: &Value, add_to_history: bool) -> bool {
		let handler = match self.table.borrow().resolve(path) {
			Some(handler) => handler,
			None => {
				error!("No handler for route {:?} and no default route.", path);
				return false;
			}
		};
		*self.current.borrow_mut() = Some(path.to_owned());

		if add_to_history {
			let state = HistoryState { path: path.to_owned(), data: data.clone() };
			let pushed = self.window.history().and_then(|history| history.push_state_with_url(&state.to_js()?, "", Some(path)));
			if let Err(error) = pushed {
				error!("Failed to push history entry for {:?}: {:?}", path, error);
			}
		}

		// Handlers may navigate again, so no borrow is held here.
		handler(data);
		true
	}

	/// Wires link interception and history navigation, then dispatches the current location.
	///
	/// Idempotent: later calls return `true` without doing anything.
	#[instrument(skip(self))]
	pub fn init(self: &Rc<Self>, container_id: &str, default_route: Option<&str>) -> bool {
		if self.initialized.get() {
			trace!("Router already initialized.");
			return true;
		}
		match dom::element_by_id(&self.document, container_id) {
			Ok(container) => *self.container.borrow_mut() = Some(container),
			Err(error) => {
				error!("Not initializing router: {}", error);
				return false;
			}
		}
		if let Some(default_route) = default_route {
			self.table.borrow_mut().set_default_route(default_route);
		}

		let mut listeners = self.listeners.borrow_mut();
		listeners.replace_scope("router");

		let router = Rc::downgrade(self);
		listeners.listen("router", self.document.as_ref(), "click", move |event| {
			let router = match Weak::upgrade(&router) {
				Some(router) => router,
				None => return,
			};
			let anchor = event.target().and_then(|target| target.dyn_into::<Element>().ok()).and_then(|target| target.closest("a").ok().flatten());
			if let Some(anchor) = anchor.filter(|anchor| anchor.has_attribute(LINK_ATTRIBUTE)) {
				event.prevent_default();
				let path = anchor.get_attribute("href").unwrap_or_default();
				router.navigate_to(&path, &Value::Object(serde_json::Map::new()), true);
			}
		});

		let router = Rc::downgrade(self);
		listeners.listen("router", self.window.as_ref(), "popstate", move |event| {
			let router = match Weak::upgrade(&router) {
				Some(router) => router,
				None => return,
			};
			let state = event.dyn_ref::<PopStateEvent>().and_then(|event| HistoryState::from_js(&event.state()));
			match state {
				Some(state) => router.navigate_to(&state.path, &state.data, false),
				None => {
					let default_route = router.table.borrow().default_route().to_owned();
					router.navigate_to(&default_route, &Value::Object(serde_json::Map::new()), false)
				}
			};
		});
		drop(listeners);
		self.initialized.set(true);

		let path = self.window.location().pathname().unwrap_or_else(|error| {
			warn!("Couldn't read the location: {:?}", error);
			DEFAULT_ROUTE.to_owned()
		});
		let initial = {
			let table = self.table.borrow();
			if table.contains(&path) {
				path
			} else {
				table.default_route().to_owned()
			}
		};
		info!("Router initialized at {:?}.", initial);
		self.navigate_to(&initial, &Value::Object(serde_json::Map::new()), false);
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recording(log: &Rc<RefCell<Vec<String>>>, name: &'static str) -> Handler {
		let log = log.clone();
		Rc::new(move |data: &Value| log.borrow_mut().push(format!("{} {}", name, data)))
	}

	#[test]
	fn exact_route_wins() {
		let log = Rc::default();
		let mut table = RouteTable::default();
		table.insert("/", recording(&log, "home"));
		table.insert("/about", recording(&log, "about"));
		table.resolve("/about").unwrap()(&Value::Null);
		assert_eq!(*log.borrow(), ["about null"]);
	}

	#[test]
	fn unknown_routes_fall_back_to_default() {
		let log = Rc::default();
		let mut table = RouteTable::default();
		table.insert("/", recording(&log, "home"));
		table.resolve("/missing").unwrap()(&serde_json::json!({ "id": 1 }));
		assert_eq!(*log.borrow(), [r#"home {"id":1}"#]);
	}

	#[test]
	fn custom_default_route() {
		let log = Rc::default();
		let mut table = RouteTable::default();
		table.insert("/start", recording(&log, "start"));
		assert!(table.resolve("/missing").is_none());
		table.set_default_route("/start");
		assert!(table.resolve("/missing").is_some());
	}

	#[test]
	fn history_state_tolerates_missing_data() {
		let state: HistoryState = serde_json::from_str(r#"{ "path": "/about" }"#).unwrap();
		assert_eq!(state, HistoryState { path: "/about".to_owned(), data: Value::Null });
	}
}
