#![cfg(target_arch = "wasm32")]

use folio_dom::{
	app::{FOOTER_CONTAINER, HEADER_CONTAINER},
	dom, App, Capabilities, Config,
};
use std::{rc::Rc, sync::Once};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Document, Element, Event, HtmlElement, Window};

wasm_bindgen_test_configure!(run_in_browser);

/// `<nav id="booted-nav">Home</nav>`
const HEADER_FRAGMENT: &str = "data:text/html,%3Cnav%20id%3D%22booted-nav%22%3EHome%3C%2Fnav%3E";
/// `<p>&copy; <span id="current-year"></span></p>`
const FOOTER_FRAGMENT: &str = "data:text/html,%3Cp%3E%26copy%3B%20%3Cspan%20id%3D%22current-year%22%3E%3C%2Fspan%3E%3C%2Fp%3E";

fn setup() -> (Window, Document) {
	static LOG: Once = Once::new();
	LOG.call_once(|| {
		tracing_wasm::try_set_as_global_default().ok();
	});
	let window = window().unwrap();
	let document = window.document().unwrap();
	(window, document)
}

fn layout(document: &Document) -> Element {
	let host = document.create_element("div").unwrap();
	host.set_inner_html(&format!(
		r#"<div id="{}"></div>
		<button id="mobile-menu-button"></button>
		<div id="mobile-menu" class="hidden"></div>
		<div id="theme-toggle"><span id="theme-toggle-dark-icon"></span><span id="theme-toggle-light-icon"></span></div>
		<div id="{}"></div>"#,
		HEADER_CONTAINER, FOOTER_CONTAINER
	));
	document.body().unwrap().append_child(&host).unwrap();
	host
}

fn app(window: Window, document: &Document, header_path: &str) -> Rc<App> {
	let config = Config {
		header_path: header_path.to_owned(),
		footer_path: FOOTER_FRAGMENT.to_owned(),
		cache_bust: false,
		..Config::default()
	};
	Rc::new(App::new(window, document.clone(), config, Capabilities::none()))
}

#[wasm_bindgen_test]
async fn failed_header_skips_only_the_theme() {
	let (window, document) = setup();
	let host = layout(&document);
	let app = app(window, &document, "components/does-not-exist.html");

	let boot = app.clone().init_app().await;
	assert_eq!(boot.number, 1);
	assert!(!boot.header);
	assert_eq!(boot.theme, None);
	assert!(boot.footer);
	assert_eq!(app.listener_count("theme"), 0);
	assert!(app.listener_count("navigation") > 0);

	let year = document.get_element_by_id("current-year").unwrap().text_content().unwrap();
	assert_eq!(year, js_sys::Date::new_0().get_full_year().to_string());

	let menu = document.get_element_by_id("mobile-menu").unwrap();
	document.get_element_by_id("mobile-menu-button").unwrap().dyn_into::<HtmlElement>().unwrap().click();
	assert!(!dom::has_class(&menu, "hidden"));

	drop(app);
	host.remove();
}

#[wasm_bindgen_test]
async fn successful_header_enables_the_theme() {
	let (window, document) = setup();
	let host = layout(&document);
	let app = app(window, &document, HEADER_FRAGMENT);

	let boot = app.clone().init_app().await;
	assert!(boot.header);
	assert!(boot.theme.is_some());
	assert_eq!(app.listener_count("theme"), 1);
	assert!(document.get_element_by_id("booted-nav").is_some());

	drop(app);
	host.remove();
}

#[wasm_bindgen_test]
async fn rebooting_does_not_stack_listeners() {
	let (window, document) = setup();
	let host = layout(&document);
	let app = app(window, &document, HEADER_FRAGMENT);

	app.clone().init_app().await;
	let navigation = app.listener_count("navigation");
	let boot = app.clone().init_app().await;
	assert_eq!(boot.number, 2);
	assert_eq!(app.listener_count("navigation"), navigation);
	assert_eq!(app.listener_count("theme"), 1);

	drop(app);
	host.remove();
}

#[wasm_bindgen_test]
async fn becoming_visible_without_header_reboots() {
	let (window, document) = setup();
	let host = layout(&document);
	let app = app(window.clone(), &document, HEADER_FRAGMENT);
	app.clone().init_app().await;
	app.watch_visibility();

	let visibility_change = || document.dispatch_event(&Event::new("visibilitychange").unwrap()).unwrap();

	visibility_change();
	dom::sleep(&window, 100).await;
	assert_eq!(app.boot_count(), 1);

	document.get_element_by_id(HEADER_CONTAINER).unwrap().set_inner_html("\n\t");
	visibility_change();
	dom::sleep(&window, 100).await;
	assert_eq!(app.boot_count(), 2);
	assert!(document.get_element_by_id("booted-nav").is_some());

	drop(app);
	host.remove();
}

#[wasm_bindgen_test]
async fn reveal_engine_starts_after_the_delay() {
	let (window, document) = setup();
	let host = layout(&document);
	let app = app(window.clone(), &document, HEADER_FRAGMENT);

	app.clone().init_app().await;
	assert!(!app.reveal_started());
	dom::sleep(&window, app.config().reveal_delay_ms + 100).await;
	assert!(app.reveal_started());

	drop(app);
	host.remove();
}
