#![cfg(target_arch = "wasm32")]

use folio_dom::{
	dom,
	router::{Handler, Router},
};
use serde_json::{json, Value};
use std::{cell::RefCell, rc::Rc, sync::Once};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Document, Element, HtmlElement, Window};

wasm_bindgen_test_configure!(run_in_browser);

type Log = Rc<RefCell<Vec<String>>>;

fn setup() -> (Window, Document) {
	static LOG: Once = Once::new();
	LOG.call_once(|| {
		tracing_wasm::try_set_as_global_default().ok();
	});
	let window = window().unwrap();
	let document = window.document().unwrap();
	(window, document)
}

fn fixture(document: &Document, html: &str) -> Element {
	let host = document.create_element("div").unwrap();
	host.set_inner_html(html);
	document.body().unwrap().append_child(&host).unwrap();
	host
}

fn recording(log: &Log, name: &'static str) -> Handler {
	let log = log.clone();
	Rc::new(move |data: &Value| log.borrow_mut().push(format!("{} {}", name, data)))
}

fn pathname(window: &Window) -> String {
	window.location().pathname().unwrap()
}

fn restore_location(window: &Window, href: &str) {
	window.history().unwrap().replace_state_with_url(&JsValue::NULL, "", Some(href)).unwrap();
}

#[wasm_bindgen_test]
fn missing_container_leaves_the_router_uninitialized() {
	let (window, document) = setup();
	let router = Router::new(&window, &document);
	assert!(!router.init("no-such-router-container", None));
	assert!(!router.is_initialized());
}

#[wasm_bindgen_test]
fn router_links_are_intercepted_once() {
	let (window, document) = setup();
	let original = window.location().href().unwrap();
	let host = fixture(&document, r#"<div id="router-app"></div><a id="router-link" href="/router-projects" data-router-link>Projects</a>"#);
	let log = Log::default();
	let router = Router::new(&window, &document);
	router.add_route("/", recording(&log, "home"));
	router.add_route("/router-projects", recording(&log, "projects"));

	assert!(router.init("router-app", Some("/")));
	assert_eq!(*log.borrow(), ["home {}"]);
	assert_eq!(router.container().unwrap().id(), "router-app");

	assert!(router.init("router-app", Some("/")));
	assert_eq!(log.borrow().len(), 1);

	document.get_element_by_id("router-link").unwrap().dyn_into::<HtmlElement>().unwrap().click();
	assert_eq!(*log.borrow(), ["home {}", "projects {}"]);
	assert_eq!(router.current_route().as_deref(), Some("/router-projects"));
	assert_eq!(pathname(&window), "/router-projects");

	drop(router);
	host.remove();
	restore_location(&window, &original);
}

#[wasm_bindgen_test]
async fn history_navigation_replays_routes() {
	let (window, document) = setup();
	let original = window.location().href().unwrap();
	let original_path = pathname(&window);
	let host = fixture(&document, r#"<div id="history-app"></div>"#);
	let log = Log::default();
	let router = Router::new(&window, &document);
	router.add_route("/", recording(&log, "home"));
	router.add_route("/router-about", recording(&log, "about"));
	router.add_route("/router-contact", recording(&log, "contact"));
	assert!(router.init("history-app", Some("/")));

	assert!(router.navigate_to("/router-about", &json!({ "tab": "bio" }), true));
	assert_eq!(pathname(&window), "/router-about");
	assert!(router.navigate_to("/router-contact", &Value::Null, true));
	assert_eq!(pathname(&window), "/router-contact");

	let history = window.history().unwrap();
	history.back().unwrap();
	dom::sleep(&window, 200).await;
	assert_eq!(log.borrow().last().map(String::as_str), Some(r#"about {"tab":"bio"}"#));
	assert_eq!(router.current_route().as_deref(), Some("/router-about"));
	assert_eq!(pathname(&window), "/router-about");

	// The entry from before the first push has no route state, so the default route handles it.
	history.back().unwrap();
	dom::sleep(&window, 200).await;
	assert_eq!(log.borrow().last().map(String::as_str), Some("home {}"));
	assert_eq!(pathname(&window), original_path);
	assert_eq!(log.borrow().len(), 5);

	drop(router);
	host.remove();
	restore_location(&window, &original);
}
