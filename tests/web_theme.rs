#![cfg(target_arch = "wasm32")]

use folio_dom::{
	listeners::Listeners,
	theme::{self, Theme, DARK_CLASS, DARK_ICON_ID, LIGHT_ICON_ID, STORAGE_KEY, TOGGLE_ID},
};
use std::sync::Once;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Document, Element, HtmlElement, Storage, Window};

wasm_bindgen_test_configure!(run_in_browser);

fn setup() -> (Window, Document, Storage) {
	static LOG: Once = Once::new();
	LOG.call_once(|| {
		tracing_wasm::try_set_as_global_default().ok();
	});
	let window = window().unwrap();
	let document = window.document().unwrap();
	let storage = window.local_storage().unwrap().unwrap();
	storage.remove_item(STORAGE_KEY).unwrap();
	(window, document, storage)
}

fn toggle_fixture(document: &Document) -> Element {
	let host = document.create_element("div").unwrap();
	host.set_inner_html(&format!(
		r#"<button id="{}"><span id="{}"></span><span id="{}" class="hidden"></span></button>"#,
		TOGGLE_ID, DARK_ICON_ID, LIGHT_ICON_ID
	));
	document.body().unwrap().append_child(&host).unwrap();
	host
}

fn is_dark(document: &Document) -> bool {
	document.document_element().unwrap().class_list().contains(DARK_CLASS)
}

fn hidden(document: &Document, id: &str) -> bool {
	document.get_element_by_id(id).unwrap().class_list().contains("hidden")
}

fn click(document: &Document) {
	document.get_element_by_id(TOGGLE_ID).unwrap().dyn_into::<HtmlElement>().unwrap().click();
}

#[wasm_bindgen_test]
fn persisted_choice_is_applied() {
	let (window, document, storage) = setup();
	storage.set_item(STORAGE_KEY, "dark").unwrap();
	let host = toggle_fixture(&document);
	let mut listeners = Listeners::new();

	assert_eq!(theme::init_theme(&window, &mut listeners), Some(Theme::Dark));
	assert!(is_dark(&document));
	assert!(hidden(&document, DARK_ICON_ID));
	assert!(!hidden(&document, LIGHT_ICON_ID));

	drop(listeners);
	host.remove();
	storage.remove_item(STORAGE_KEY).unwrap();
	document.document_element().unwrap().class_list().remove_1(DARK_CLASS).unwrap();
}

#[wasm_bindgen_test]
fn double_toggle_restores_everything() {
	let (window, document, storage) = setup();
	storage.set_item(STORAGE_KEY, "light").unwrap();
	let host = toggle_fixture(&document);
	let mut listeners = Listeners::new();
	assert_eq!(theme::init_theme(&window, &mut listeners), Some(Theme::Light));

	click(&document);
	assert!(is_dark(&document));
	assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("dark"));
	assert!(hidden(&document, DARK_ICON_ID));
	assert!(!hidden(&document, LIGHT_ICON_ID));

	click(&document);
	assert!(!is_dark(&document));
	assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("light"));
	assert!(!hidden(&document, DARK_ICON_ID));
	assert!(hidden(&document, LIGHT_ICON_ID));

	drop(listeners);
	host.remove();
	storage.remove_item(STORAGE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn reinitializing_does_not_stack_handlers() {
	let (window, document, storage) = setup();
	storage.set_item(STORAGE_KEY, "light").unwrap();
	let host = toggle_fixture(&document);
	let mut listeners = Listeners::new();
	theme::init_theme(&window, &mut listeners);
	theme::init_theme(&window, &mut listeners);
	assert_eq!(listeners.len("theme"), 1);

	// With two handlers, one click would toggle twice.
	click(&document);
	assert!(is_dark(&document));

	click(&document);
	drop(listeners);
	host.remove();
	storage.remove_item(STORAGE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn missing_toggle_skips_initialization() {
	let (window, _, _) = setup();
	let mut listeners = Listeners::new();
	assert_eq!(theme::init_theme(&window, &mut listeners), None);
	assert_eq!(listeners.total(), 0);
}
