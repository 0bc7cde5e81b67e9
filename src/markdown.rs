//! Markdown blog posts, rendered with `pulldown-cmark`.
//!
//! Rendered posts are injected as markup. Like fragments, post files are trusted same-origin assets,
//! so raw HTML inside them passes through.

use crate::{
	fetch::fetch_text,
	view::{self, el, escape, Node},
	Capabilities,
};
use hashbrown::HashMap;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use tracing::{error, info, instrument, trace};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use web_sys::{Document, Element, Window};

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(catch, js_namespace = Prism, js_name = highlightAllUnder)]
	fn prism_highlight_all_under(element: &Element) -> Result<(), JsValue>;
}

/// A document split into its `---`-delimited header and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter<'a> {
	pub metadata: HashMap<&'a str, &'a str>,
	pub content: &'a str,
}

/// Splits `key: value` front matter off `markdown`.
///
/// Without an opening `---` at the very start, or without a closing one, everything is content.
/// Lines without a colon are ignored. Values may contain further colons.
#[must_use]
pub fn parse_front_matter(markdown: &str) -> FrontMatter<'_> {
	let whole = FrontMatter { metadata: HashMap::new(), content: markdown };
	let rest = match markdown.strip_prefix("---") {
		Some(rest) => rest,
		None => return whole,
	};
	let end = match rest.find("---") {
		Some(end) => end,
		None => return whole,
	};

	let metadata = rest[..end]
		.trim()
		.lines()
		.filter_map(|line| line.split_once(':'))
		.map(|(key, value)| (key.trim(), value.trim()))
		.collect();
	FrontMatter { metadata, content: rest[end + 3..].trim() }
}

fn options() -> Options {
	let mut options = Options::empty();
	options.insert(Options::ENABLE_TABLES);
	options.insert(Options::ENABLE_STRIKETHROUGH);
	options.insert(Options::ENABLE_TASKLISTS);
	options
}

/// Renders `markdown` to HTML. Links open in a new window.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
	let parser = Parser::new_ext(markdown, options()).map(|event| match event {
		Event::Start(Tag::Link { dest_url, title, .. }) => {
			let mut open = format!("<a href=\"{}\"", escape(&dest_url, true));
			if !title.is_empty() {
				open.push_str(&format!(" title=\"{}\"", escape(&title, true)));
			}
			open.push_str(" target=\"_blank\" rel=\"noopener noreferrer\">");
			Event::InlineHtml(CowStr::from(open))
		}
		Event::End(TagEnd::Link) => Event::InlineHtml(CowStr::Borrowed("</a>")),
		other => other,
	});

	let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
	html::push_html(&mut rendered, parser);
	rendered
}

/// Red inline panel shown in place of content that failed to load.
#[must_use]
pub fn error_panel(title: &str, message: &str, back_link: Option<(&str, &str)>) -> Node {
	let mut panel = el("div")
		.class("error-message bg-red-100 dark:bg-red-900 text-red-700 dark:text-red-300 p-4 rounded-lg")
		.child(el("h3").class("font-bold").text(title))
		.child(el("p").text(message));
	if let Some((href, label)) = back_link {
		panel = panel.child(el("a").attr("href", href).class("text-blue-600 hover:text-blue-800 dark:text-blue-400 dark:hover:text-blue-300 mt-4 inline-block").text(label));
	}
	panel.into()
}

fn loading_placeholder() -> Node {
	el("div").class("loading").text("Loading content...").into()
}

/// Fetches the markdown at `url` and renders it into `#target_id`, minus any front matter.
///
/// The target shows a loading placeholder while the request is in flight and an [`error_panel`] if it fails.
/// Code blocks are highlighted if Prism is loaded. Returns whether the post was rendered.
#[instrument(skip(window, document, capabilities))]
pub async fn fetch_and_render(window: &Window, document: &Document, capabilities: &Capabilities, url: &str, target_id: &str) -> bool {
	let target = match document.get_element_by_id(target_id) {
		Some(target) => target,
		None => {
			error!("#{} not found; not rendering {:?}.", target_id, url);
			return false;
		}
	};
	view::mount(document, &target, &[loading_placeholder()]);

	let markdown = match fetch_text(window, url).await {
		Ok(markdown) => markdown,
		Err(error) => {
			error!("Failed to fetch markdown: {}", error);
			view::mount(document, &target, &[error_panel("Error Loading Content", &error.to_string(), None)]);
			return false;
		}
	};

	let front_matter = parse_front_matter(&markdown);
	trace!("Front matter keys: {:?}", front_matter.metadata.keys().collect::<Vec<_>>());
	target.set_inner_html(&render_markdown(front_matter.content));

	if capabilities.prism {
		if let Err(error) = prism_highlight_all_under(&target) {
			error!("Prism highlighting failed: {:?}", error);
		}
	}
	info!("Rendered markdown into #{}.", target_id);
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn front_matter_is_split_off() {
		let parsed = parse_front_matter("---\ntitle: Hello\nurl: https://example.com\nnot metadata\n---\n\n# Body\n");
		assert_eq!(parsed.metadata.get("title"), Some(&"Hello"));
		assert_eq!(parsed.metadata.get("url"), Some(&"https://example.com"));
		assert_eq!(parsed.metadata.len(), 2);
		assert_eq!(parsed.content, "# Body");
	}

	#[test]
	fn without_front_matter_everything_is_content() {
		let parsed = parse_front_matter("# Title\n---\nmore");
		assert!(parsed.metadata.is_empty());
		assert_eq!(parsed.content, "# Title\n---\nmore");

		let unclosed = parse_front_matter("---\ntitle: x\n");
		assert!(unclosed.metadata.is_empty());
		assert_eq!(unclosed.content, "---\ntitle: x\n");
	}

	#[test]
	fn links_open_in_a_new_window() {
		let rendered = render_markdown("See [the docs](https://example.com/?a=1&b=2 \"Docs\").");
		assert!(rendered.contains(r#"<a href="https://example.com/?a=1&amp;b=2" title="Docs" target="_blank" rel="noopener noreferrer">the docs</a>"#), "{}", rendered);
	}

	#[test]
	fn extensions_are_enabled() {
		let rendered = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n");
		assert!(rendered.contains("<table>"));
		assert!(rendered.contains("<del>gone</del>"));
		assert!(rendered.contains(r#"type="checkbox""#));
	}

	#[test]
	fn error_panel_has_optional_back_link() {
		let panel = error_panel("Oops", "it broke", Some(("blog.html", "Back")));
		assert_eq!(panel.find_all("a")[0].get_attribute("href"), Some("blog.html"));
		assert_eq!(panel.text_content(), "Oopsit brokeBack");
		assert!(error_panel("Oops", "it broke", None).find_all("a").is_empty());
	}
}
