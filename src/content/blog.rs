use super::{card_banner, external_link, parse_samples, Catalog};
use crate::{
	app::App,
	markdown,
	view::{self, el, text, Node},
	Config,
};
use core::cmp::Ordering;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

const PLACEHOLDER_IMAGE: &str = "assets/images/blog-placeholder.jpg";
/// Default target of [`load_blog_post`].
pub const CONTENT_ID: &str = "blog-content";
pub const METADATA_ID: &str = "blog-metadata";
/// Detail page for posts with a local markdown file.
pub const DETAIL_PAGE: &str = "blog-post.html";
pub const LIST_PAGE: &str = "blog.html";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
	pub id: String,
	pub title: String,
	pub date: String,
	pub category: String,
	#[serde(default)]
	pub summary: String,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub medium_url: String,
	/// Relative to [`Config::blogs_dir`]. Posts without one live only at [`BlogPost::medium_url`].
	#[serde(default)]
	pub markdown_file: Option<String>,
}

impl BlogPost {
	/// The markdown file name, if any. An empty name counts as none.
	#[must_use]
	pub fn markdown_file(&self) -> Option<&str> {
		self.markdown_file.as_deref().filter(|file| !file.trim().is_empty())
	}

	/// Where a card's "Read More" link leads.
	#[must_use]
	pub fn link(&self) -> String {
		match self.markdown_file() {
			Some(_) => format!("{}?id={}", DETAIL_PAGE, self.id),
			None => self.medium_url.clone(),
		}
	}
}

impl Catalog for BlogPost {
	const NOUN: &'static str = "blog posts";
	const GRID_ID: &'static str = "blog-container";
	const SUBSET_ID: &'static str = "blogs-container";
	const CARD_CLASS: &'static str = "blog-card";
	const FILTER_ACTIVE_CLASSES: &'static [&'static str] = &["active", "bg-accent", "text-white"];
	const FILTER_INACTIVE_CLASSES: &'static [&'static str] = &["bg-custom-secondary", "text-custom-primary", "border", "border-custom"];

	fn data_path(config: &Config) -> &str {
		&config.blog_list_path
	}

	fn category(&self) -> &str {
		&self.category
	}

	fn card(&self) -> Node {
		const LINK_CLASS: &str = "inline-block text-blue-600 hover:text-blue-800 dark:text-blue-400 dark:hover:text-blue-300 font-semibold";
		let read_more = match self.markdown_file() {
			Some(_) => Node::from(el("a").attr("href", self.link()).class(LINK_CLASS).text("Read More →")),
			None => external_link(&self.medium_url, LINK_CLASS, "Read More →"),
		};

		el("div")
			.class("blog-card bg-white dark:bg-gray-800 rounded-lg overflow-hidden shadow-lg hover:shadow-xl transition-shadow duration-300")
			.attr("data-category", self.category.to_lowercase())
			.child(card_banner(self.image_url.as_deref(), PLACEHOLDER_IMAGE, &self.title, &self.category, "blog-image w-full h-48 object-cover"))
			.child(
				el("div")
					.class("p-6")
					.child(el("h3").class("text-xl font-bold text-gray-800 dark:text-white mb-2").text(self.title.as_str()))
					.child(el("p").class("text-gray-600 dark:text-gray-300 text-sm mb-4").text(self.date.as_str()))
					.child(el("p").class("text-gray-700 dark:text-gray-300 mb-4").text(self.summary.as_str()))
					.child(read_more),
			)
			.into()
	}

	fn samples() -> Vec<Self> {
		parse_samples(include_str!("samples/blog_list.json"))
	}
}

/// `(year, month, day)`, ordered chronologically.
pub type DateKey = (i32, u32, u32);

fn month_number(name: &str) -> Option<u32> {
	const MONTHS: [&str; 12] = ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];
	let name = name.trim_end_matches('.').to_lowercase();
	if name.len() < 3 {
		return None;
	}
	let index = MONTHS.iter().position(|month| name.starts_with(month))?;
	#[allow(clippy::cast_possible_truncation)]
	let month = index as u32 + 1;
	Some(month)
}

fn date_key(year: i32, month: u32, day: u32) -> Option<DateKey> {
	if (1..=12).contains(&month) && (1..=31).contains(&day) {
		Some((year, month, day))
	} else {
		None
	}
}

/// Parses the date formats found in blog lists: `May 20, 2025`, `20 May 2025` and `2025-05-20`.
#[must_use]
pub fn parse_date(date: &str) -> Option<DateKey> {
	let date = date.trim();
	let mut iso = date.splitn(3, '-');
	if let (Some(year), Some(month), Some(day)) = (iso.next(), iso.next(), iso.next()) {
		if year.len() == 4 {
			return date_key(year.parse().ok()?, month.parse().ok()?, day.get(..2).unwrap_or(day).parse().ok()?);
		}
	}

	let words: Vec<&str> = date.split(|c: char| c.is_whitespace() || c == ',').filter(|word| !word.is_empty()).collect();
	match words.as_slice() {
		[first, second, year] => {
			let year = year.parse().ok()?;
			match (month_number(first), month_number(second)) {
				(Some(month), None) => date_key(year, month, second.parse().ok()?),
				(None, Some(month)) => date_key(year, month, first.parse().ok()?),
				_ => None,
			}
		}
		_ => None,
	}
}

/// Up to `limit` posts, newest first. Posts with unparseable dates sort last, in list order.
#[must_use]
pub fn recent(posts: &[BlogPost], limit: usize) -> Vec<&BlogPost> {
	let mut sorted: Vec<(Option<DateKey>, &BlogPost)> = posts.iter().map(|post| (parse_date(&post.date), post)).collect();
	sorted.sort_by(|(a, _), (b, _)| match (a, b) {
		(Some(a), Some(b)) => b.cmp(a),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	});
	sorted.into_iter().take(limit).map(|(_, post)| post).collect()
}

/// What the detail page shows for a post id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail<'a> {
	/// Render this markdown file.
	Markdown { post: &'a BlogPost, file: &'a str },
	/// The post lives elsewhere; leave for this URL.
	External(&'a str),
	NotFound,
}

#[must_use]
pub fn resolve_detail<'a>(posts: &'a [BlogPost], id: &str) -> Detail<'a> {
	match posts.iter().find(|post| post.id == id) {
		Some(post) => match post.markdown_file() {
			Some(file) => Detail::Markdown { post, file },
			None => Detail::External(&post.medium_url),
		},
		None => Detail::NotFound,
	}
}

#[must_use]
pub fn page_title(post: &BlogPost, site_name: &str) -> String {
	format!("{} | Blog | {}", post.title, site_name)
}

/// Heading block above a rendered post.
#[must_use]
pub fn metadata(post: &BlogPost) -> Vec<Node> {
	vec![
		Node::from(el("h1").class("text-3xl font-bold text-gray-800 dark:text-white mb-4").text(post.title.as_str())),
		Node::from(
			el("div")
				.class("flex items-center text-gray-600 dark:text-gray-400 mb-6")
				.child(el("span").class("mr-4").text(post.date.as_str()))
				.child(el("span").class("bg-blue-600 text-white text-sm font-semibold py-1 px-3 rounded-lg").child(text(post.category.as_str()))),
		),
	]
}

/// Shows the post `id` in `#container_id`.
///
/// Posts with a markdown file are rendered in place, posts without one navigate away to their external URL,
/// and unknown ids get an error panel linking back to the list. Returns whether markdown was rendered.
#[instrument(skip(app))]
pub async fn load_blog_post(app: &App, id: &str, container_id: &str) -> bool {
	let posts = super::load(app.window(), app.config(), app.blog_posts()).await;
	let document = app.document();

	match resolve_detail(&posts, id) {
		Detail::Markdown { post, file } => {
			let url = app.config().blog_markdown_url(file);
			let rendered = markdown::fetch_and_render(app.window(), document, app.capabilities(), &url, container_id).await;
			document.set_title(&page_title(post, &app.config().site_name));
			if let Some(element) = document.get_element_by_id(METADATA_ID) {
				view::mount(document, &element, &metadata(post));
			}
			info!("Showing blog post {:?}.", id);
			rendered
		}
		Detail::External(url) => {
			info!("Blog post {:?} is external; navigating away.", id);
			#[cfg(feature = "dangerous-logging")]
			tracing::trace!("External URL: {}", url);
			app.navigate(url);
			false
		}
		Detail::NotFound => {
			warn!("No blog post with id {:?}.", id);
			match document.get_element_by_id(container_id) {
				Some(container) => view::mount(
					document,
					&container,
					&[markdown::error_panel(
						"Error Loading Blog Post",
						&format!("Blog post with ID \"{}\" not found.", id),
						Some((LIST_PAGE, "← Back to Blog List")),
					)],
				),
				None => error!("#{} not found; cannot show the error.", container_id),
			}
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn samples_have_four_posts() {
		let samples = BlogPost::samples();
		assert_eq!(samples.len(), 4);
		assert_eq!(samples.iter().filter(|post| post.markdown_file().is_none()).count(), 2);
	}

	#[test]
	fn date_formats() {
		assert_eq!(parse_date("May 20, 2025"), Some((2025, 5, 20)));
		assert_eq!(parse_date("April 28, 2025"), Some((2025, 4, 28)));
		assert_eq!(parse_date("20 May 2025"), Some((2025, 5, 20)));
		assert_eq!(parse_date("Sept. 3, 2024"), Some((2024, 9, 3)));
		assert_eq!(parse_date("2025-05-20"), Some((2025, 5, 20)));
		assert_eq!(parse_date("2025-05-20T10:00:00Z"), Some((2025, 5, 20)));
	}

	#[test]
	fn garbage_dates_are_rejected() {
		assert_eq!(parse_date(""), None);
		assert_eq!(parse_date("soon"), None);
		assert_eq!(parse_date("Smarch 3, 2024"), None);
		assert_eq!(parse_date("2025-13-01"), None);
		assert_eq!(parse_date("May 40, 2025"), None);
	}

	#[test]
	fn recent_is_newest_first() {
		let samples = BlogPost::samples();
		let ids: Vec<&str> = recent(&samples, 2).iter().map(|post| post.id.as_str()).collect();
		assert_eq!(ids, ["blog1", "blog2"]);
	}

	#[test]
	fn unparseable_dates_sort_last_and_stable() {
		let mut samples = BlogPost::samples();
		samples[0].date = "someday".to_owned();
		samples[1].date = "never".to_owned();
		let ids: Vec<&str> = recent(&samples, 10).iter().map(|post| post.id.as_str()).collect();
		assert_eq!(ids, ["blog3", "blog4", "blog1", "blog2"]);
	}

	#[test]
	fn detail_resolution() {
		let samples = BlogPost::samples();
		match resolve_detail(&samples, "blog1") {
			Detail::Markdown { post, file } => {
				assert_eq!(post.id, "blog1");
				assert_eq!(file, "blog1.md");
			}
			other => panic!("unexpected {:?}", other),
		}
		assert_eq!(resolve_detail(&samples, "blog3"), Detail::External("https://medium.com/"));
		assert_eq!(resolve_detail(&samples, "blog99"), Detail::NotFound);
	}

	#[test]
	fn empty_markdown_file_is_external() {
		let mut samples = BlogPost::samples();
		samples[0].markdown_file = Some(String::new());
		assert_eq!(resolve_detail(&samples, "blog1"), Detail::External("https://medium.com/"));
	}

	#[test]
	fn card_links_locally_or_externally() {
		let samples = BlogPost::samples();
		let local = samples[0].card();
		let local_link = local.find_all("a")[0];
		assert_eq!(local_link.get_attribute("href"), Some("blog-post.html?id=blog1"));
		assert_eq!(local_link.get_attribute("target"), None);

		let external = samples[2].card();
		let external_link = external.find_all("a")[0];
		assert_eq!(external_link.get_attribute("href"), Some("https://medium.com/"));
		assert_eq!(external_link.get_attribute("target"), Some("_blank"));
	}

	#[test]
	fn title_carries_site_name() {
		let post = &BlogPost::samples()[0];
		assert_eq!(page_title(post, "Portfolio"), "Getting Started with Modern JavaScript | Blog | Portfolio");
		assert_eq!(metadata(post)[0].text_content(), post.title);
	}
}
