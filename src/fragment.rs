//! HTML partials spliced into the page at runtime.

use crate::{config::cache_busted, dom, fetch::fetch_text, Config};
use tracing::{error, info, instrument, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlLinkElement, Window};

/// Fetches the fragment at `path` and injects it into `#container_id`.
///
/// The container is cleared before the request goes out, so repeated loads never accumulate
/// copies and a failed load leaves it empty rather than half-filled.
///
/// The fetched markup is injected **without sanitization**. Fragments are same-origin site
/// assets; this is the one place where markup is trusted verbatim.
///
/// Returns whether the fragment was injected. Failures are logged and never propagate.
#[instrument(skip(window, document, config))]
pub async fn load_fragment(window: &Window, document: &Document, config: &Config, container_id: &str, path: &str) -> bool {
	let container = match dom::element_by_id(document, container_id) {
		Ok(container) => container,
		Err(error) => {
			warn!("Not loading fragment {:?}: {}", path, error);
			return false;
		}
	};

	container.set_inner_html("");

	let mut url = config.url(path);
	if config.cache_bust {
		url = cache_busted(&url, dom::now_ms());
	}

	match fetch_text(window, &url).await {
		Ok(html) => {
			#[cfg(feature = "dangerous-logging")]
			tracing::trace!("Fragment {:?} markup: {}", path, html);
			container.set_inner_html(&html);
			info!("Loaded fragment {:?} into #{}.", path, container_id);
			true
		}
		Err(error) => {
			error!("Failed to load fragment {:?} into #{}: {}", path, container_id, error);
			false
		}
	}
}

/// Re-stamps every stylesheet link with a fresh cache-buster so that style changes apply without a hard refresh.
pub fn refresh_stylesheets(document: &Document) -> usize {
	let stamp = dom::now_ms();
	let mut refreshed = 0;
	for link in dom::query_all(document, r#"link[rel="stylesheet"]"#) {
		let link = match link.dyn_into::<HtmlLinkElement>() {
			Ok(link) => link,
			Err(_) => continue,
		};
		let href = link.href();
		let bare = href.split('?').next().unwrap_or(&href);
		link.set_href(&cache_busted(bare, stamp));
		refreshed += 1;
	}
	info!("Refreshed {} stylesheet(s).", refreshed);
	refreshed
}
