//! Site configuration.
//!
//! A page may embed its configuration as JSON:
//!
//! ```html
//! <script id="site-config" type="application/json">
//! 	{ "basePath": "/portfolio", "featuredLimit": 4 }
//! </script>
//! ```
//!
//! Every field is optional. A missing element yields [`Config::default`], a malformed one is logged and ignored.

use crate::Result;
use serde::Deserialize;
use tracing::{info, warn};
use web_sys::Document;

/// Id of the inline configuration element.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
	/// Prefix for every site-relative request, e.g. `/portfolio` on a project page host. Empty for a root deployment.
	pub base_path: String,
	pub header_path: String,
	pub footer_path: String,
	pub projects_path: String,
	pub blog_list_path: String,
	/// Directory that blog post `markdownFile`s are resolved against.
	pub blogs_dir: String,
	/// Whether fragment requests carry a `v=<timestamp>` query parameter.
	pub cache_bust: bool,
	pub featured_limit: usize,
	pub recent_limit: usize,
	/// Visible fraction of an element required to reveal it.
	pub reveal_threshold: f64,
	pub reveal_root_margin: String,
	/// Delay between bootstrap and the reveal engine's tagging pass, so that layout can settle.
	pub reveal_delay_ms: i32,
	pub header_scroll_threshold: f64,
	pub desktop_min_width: f64,
	pub scroll_spy_offset: f64,
	/// Appended to blog post titles in `document.title`.
	pub site_name: String,
	/// Whether stylesheet links are re-stamped with a cache-buster at startup.
	pub refresh_stylesheets: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			base_path: String::new(),
			header_path: "components/header.html".to_owned(),
			footer_path: "components/footer.html".to_owned(),
			projects_path: "data/projects.json".to_owned(),
			blog_list_path: "data/blogList.json".to_owned(),
			blogs_dir: "blogs".to_owned(),
			cache_bust: true,
			featured_limit: 3,
			recent_limit: 2,
			reveal_threshold: 0.1,
			reveal_root_margin: "0px".to_owned(),
			reveal_delay_ms: 300,
			header_scroll_threshold: 50.0,
			desktop_min_width: 768.0,
			scroll_spy_offset: 100.0,
			site_name: "Portfolio".to_owned(),
			refresh_stylesheets: false,
		}
	}
}

impl Config {
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Reads the inline configuration element, falling back to defaults.
	pub fn from_document(document: &Document) -> Self {
		let element = match document.get_element_by_id(CONFIG_ELEMENT_ID) {
			Some(element) => element,
			None => return Self::default(),
		};
		let json = element.text_content().unwrap_or_default();
		match Self::from_json(&json) {
			Ok(config) => {
				info!("Loaded site configuration from #{}.", CONFIG_ELEMENT_ID);
				config
			}
			Err(error) => {
				warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, error);
				Self::default()
			}
		}
	}

	/// Resolves a site-relative `path` against [`Config::base_path`].
	///
	/// Absolute URLs and paths that already carry the base path are returned unchanged.
	#[must_use]
	pub fn url(&self, path: &str) -> String {
		if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:") || path.starts_with("blob:") {
			return path.to_owned();
		}
		let base = self.base_path.trim_end_matches('/');
		if base.is_empty() {
			return path.to_owned();
		}
		if path == base || path.starts_with(&format!("{}/", base)) {
			return path.to_owned();
		}
		format!("{}/{}", base, path.trim_start_matches('/'))
	}

	#[must_use]
	pub fn blog_markdown_url(&self, markdown_file: &str) -> String {
		self.url(&format!("{}/{}", self.blogs_dir.trim_end_matches('/'), markdown_file))
	}
}

/// Appends a `v=<stamp>` cache-defeating parameter to `url`.
#[must_use]
pub fn cache_busted(url: &str, stamp: u64) -> String {
	let (url, fragment) = match url.find('#') {
		Some(i) => url.split_at(i),
		None => (url, ""),
	};
	let separator = if url.contains('?') { '&' } else { '?' };
	format!("{}{}v={}{}", url, separator, stamp, fragment)
}
