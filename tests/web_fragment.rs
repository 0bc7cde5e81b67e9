#![cfg(target_arch = "wasm32")]

use folio_dom::{fragment, Config};
use std::sync::Once;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Document, Element, Window};

wasm_bindgen_test_configure!(run_in_browser);

/// `<nav id="loaded-nav">Hi</nav>`
const NAV_FRAGMENT: &str = "data:text/html,%3Cnav%20id%3D%22loaded-nav%22%3EHi%3C%2Fnav%3E";

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

fn static_config() -> Config {
	Config { cache_bust: false, ..Config::default() }
}

#[wasm_bindgen_test]
async fn loading_twice_leaves_one_copy() {
	let (window, document) = setup();
	let host = fixture(&document, r#"<div id="fragment-twice"></div>"#);

	assert!(fragment::load_fragment(&window, &document, &static_config(), "fragment-twice", NAV_FRAGMENT).await);
	assert!(fragment::load_fragment(&window, &document, &static_config(), "fragment-twice", NAV_FRAGMENT).await);

	let container = document.get_element_by_id("fragment-twice").unwrap();
	assert_eq!(container.query_selector_all("#loaded-nav").unwrap().length(), 1);
	assert_eq!(container.text_content().unwrap(), "Hi");
	host.remove();
}

#[wasm_bindgen_test]
async fn failed_load_leaves_the_container_empty() {
	let (window, document) = setup();
	let host = fixture(&document, r#"<div id="fragment-missing"><p>stale</p></div>"#);

	let loaded = fragment::load_fragment(&window, &document, &Config::default(), "fragment-missing", "components/does-not-exist.html").await;
	assert!(!loaded);
	assert_eq!(document.get_element_by_id("fragment-missing").unwrap().child_nodes().length(), 0);
	host.remove();
}

#[wasm_bindgen_test]
async fn missing_container_is_reported() {
	let (window, document) = setup();
	assert!(!fragment::load_fragment(&window, &document, &static_config(), "no-such-container", NAV_FRAGMENT).await);
	assert!(document.get_element_by_id("loaded-nav").is_none());
}

#[wasm_bindgen_test]
fn stylesheets_are_restamped() {
	let (_, document) = setup();
	let host = fixture(&document, r#"<link rel="stylesheet" href="assets/styles.css?v=1">"#);

	assert!(fragment::refresh_stylesheets(&document) >= 1);
	let href = host.first_element_child().unwrap().get_attribute("href").unwrap();
	assert!(href.contains("assets/styles.css?v="), "{}", href);
	assert!(!href.ends_with("?v=1"), "{}", href);
	host.remove();
}
