//! Typed view trees.
//!
//! Content cards are described as [`Node`] values and then materialized with
//! `createElement`/`createTextNode`, so text and attribute values taken from data
//! files are never parsed as markup.

use core::fmt::{self, Display, Formatter, Write as _};
use tracing::error;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Element(ElementNode),
	Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
	pub name: &'static str,
	pub attributes: Vec<(&'static str, String)>,
	pub children: Vec<Node>,
}

/// Starts building an element.
#[must_use]
pub fn el(name: &'static str) -> ElementNode {
	ElementNode { name, attributes: Vec::new(), children: Vec::new() }
}

#[must_use]
pub fn text(text: impl Into<String>) -> Node {
	Node::Text(text.into())
}

impl ElementNode {
	#[must_use]
	pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.attributes.push((name, value.into()));
		self
	}

	#[must_use]
	pub fn class(self, classes: impl Into<String>) -> Self {
		self.attr("class", classes)
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
		self.children.extend(children);
		self
	}

	#[must_use]
	pub fn text(self, content: impl Into<String>) -> Self {
		self.child(text(content))
	}

	#[must_use]
	pub fn get_attribute(&self, name: &str) -> Option<&str> {
		self.attributes.iter().rev().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
	}
}

impl From<ElementNode> for Node {
	fn from(element: ElementNode) -> Self {
		Self::Element(element)
	}
}

impl Node {
	/// Concatenated text content, like the DOM property of the same name.
	#[must_use]
	pub fn text_content(&self) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::Element(element) => element.children.iter().map(Self::text_content).collect(),
		}
	}

	/// Depth-first search for descendants (including `self`) with the given tag name.
	#[must_use]
	pub fn find_all(&self, name: &str) -> Vec<&ElementNode> {
		let mut found = Vec::new();
		self.collect(name, &mut found);
		found
	}

	fn collect<'a>(&'a self, name: &str, found: &mut Vec<&'a ElementNode>) {
		if let Self::Element(element) = self {
			if element.name == name {
				found.push(element);
			}
			for child in &element.children {
				child.collect(name, found);
			}
		}
	}

	pub fn materialize(&self, document: &Document) -> Result<web_sys::Node, JsValue> {
		match self {
			Self::Text(text) => Ok(document.create_text_node(text).into()),
			Self::Element(element) => {
				let dom_element = document.create_element(element.name)?;
				for (name, value) in &element.attributes {
					dom_element.set_attribute(name, value)?;
				}
				for child in &element.children {
					dom_element.append_child(&child.materialize(document)?)?;
				}
				Ok(dom_element.into())
			}
		}
	}
}

/// Replaces `container`'s content with `nodes`.
pub fn mount(document: &Document, container: &Element, nodes: &[Node]) {
	container.set_inner_html("");
	append(document, container, nodes)
}

pub fn append(document: &Document, container: &Element, nodes: &[Node]) {
	for node in nodes {
		let result = node.materialize(document).and_then(|node| container.append_child(&node));
		if let Err(error) = result {
			error!("Failed to materialize view node: {:?}", error);
		}
	}
}

impl Display for Node {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => escape_into(f, text, false),
			Self::Element(element) => {
				write!(f, "<{}", element.name)?;
				for (name, value) in &element.attributes {
					write!(f, " {}=\"", name)?;
					escape_into(f, value, true)?;
					f.write_char('"')?;
				}
				f.write_char('>')?;
				for child in &element.children {
					Display::fmt(child, f)?;
				}
				write!(f, "</{}>", element.name)
			}
		}
	}
}

/// HTML-escapes `value` for use in text content or a double-quoted attribute.
#[must_use]
pub fn escape(value: &str, attribute: bool) -> String {
	let mut escaped = String::with_capacity(value.len());
	escape_into(&mut escaped, value, attribute).ok();
	escaped
}

fn escape_into(out: &mut impl fmt::Write, value: &str, attribute: bool) -> fmt::Result {
	for c in value.chars() {
		match c {
			'&' => out.write_str("&amp;")?,
			'<' => out.write_str("&lt;")?,
			'>' => out.write_str("&gt;")?,
			'"' if attribute => out.write_str("&quot;")?,
			c => out.write_char(c)?,
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_and_attributes_are_escaped() {
		let node: Node = el("a").attr("href", "x\"onclick=\"y").text("<b>bold</b> & more").into();
		assert_eq!(node.to_string(), r#"<a href="x&quot;onclick=&quot;y">&lt;b&gt;bold&lt;/b&gt; &amp; more</a>"#);
	}

	#[test]
	fn text_content_concatenates_descendants() {
		let node: Node = el("div").child(el("h3").text("Title")).child(el("p").text(" body")).into();
		assert_eq!(node.text_content(), "Title body");
	}

	#[test]
	fn find_all_walks_depth_first() {
		let node: Node = el("div").child(el("span").text("a")).child(el("p").child(el("span").text("b"))).into();
		let spans: Vec<_> = node.find_all("span").into_iter().map(|span| Node::Element(span.clone()).text_content()).collect();
		assert_eq!(spans, ["a", "b"]);
	}

	#[test]
	fn last_attribute_wins_on_lookup() {
		let element = el("div").class("a").class("b");
		assert_eq!(element.get_attribute("class"), Some("b"));
		assert_eq!(element.get_attribute("id"), None);
	}
}
