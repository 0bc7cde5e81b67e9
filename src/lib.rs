#![doc(html_root_url = "https://docs.rs/folio-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Client-side bootstrap for a static portfolio site.
//!
//! Loaded as a WebAssembly module, this crate splices the shared header and footer into each page,
//! wires theme switching and navigation, reveals content as it scrolls into view and renders the
//! project and blog listings from JSON. See [`App`] for the sequence.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod animation;
pub mod app;
pub mod capabilities;
pub mod config;
pub mod content;
pub mod dom;
mod error;
pub mod fetch;
pub mod fragment;
pub mod listeners;
pub mod markdown;
pub mod nav;
pub mod page;
pub mod pages;
pub mod reveal;
pub mod router;
pub mod theme;
pub mod view;

pub use app::App;
pub use capabilities::Capabilities;
pub use config::Config;
pub use error::{Error, Result};

use core::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info};
use wasm_bindgen::prelude::wasm_bindgen;

thread_local! {
	/// The started application, kept for the life of the document.
	static APP: RefCell<Option<Rc<App>>> = RefCell::new(None);
}

/// Module entry point.
///
/// Documents without a `#header-container` aren't laid out as site pages and are left alone.
#[wasm_bindgen(start)]
pub fn start() {
	console_error_panic_hook::set_once();
	if tracing_wasm::try_set_as_global_default().is_err() {
		info!("A tracing subscriber is already installed.");
	}

	let app = match App::from_window() {
		Ok(app) => Rc::new(app),
		Err(error) => return error!("Not starting: {}", error),
	};
	if app.document().get_element_by_id(app::HEADER_CONTAINER).is_none() {
		return info!("No #{}; not a site page.", app::HEADER_CONTAINER);
	}

	if app.config().refresh_stylesheets {
		fragment::refresh_stylesheets(app.document());
	}
	app.watch_visibility();
	APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));
	wasm_bindgen_futures::spawn_local(async move {
		app.init_app().await;
	});
}
