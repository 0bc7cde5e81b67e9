use super::{card_banner, external_link, parse_samples, Catalog};
use crate::{
	view::{el, text, Node},
	Config,
};
use core::fmt::{self, Display, Formatter};
use serde::Deserialize;

const PLACEHOLDER_IMAGE: &str = "assets/images/project-placeholder.jpg";

/// Project ids are numbers in older data files and strings in newer ones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ContentId {
	Number(u64),
	Text(String),
}

impl Display for ContentId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(number) => Display::fmt(number, f),
			Self::Text(text) => f.write_str(text),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
	pub id: ContentId,
	pub title: String,
	#[serde(default)]
	pub description: String,
	pub category: String,
	#[serde(default)]
	pub technologies: Vec<String>,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub demo_url: Option<String>,
	#[serde(default)]
	pub github_url: Option<String>,
	#[serde(default)]
	pub featured: bool,
}

impl Catalog for Project {
	const NOUN: &'static str = "projects";
	const GRID_ID: &'static str = "projects-grid";
	const SUBSET_ID: &'static str = "projects-container";
	const CARD_CLASS: &'static str = "project-card";
	const FILTER_ACTIVE_CLASSES: &'static [&'static str] = &["active", "bg-blue-600", "text-white"];
	const FILTER_INACTIVE_CLASSES: &'static [&'static str] = &["bg-gray-200", "dark:bg-gray-700", "text-gray-800", "dark:text-white"];

	fn data_path(config: &Config) -> &str {
		&config.projects_path
	}

	fn category(&self) -> &str {
		&self.category
	}

	fn card(&self) -> Node {
		let mut links = el("div").class("flex space-x-3");
		if let Some(demo_url) = self.demo_url.as_deref().filter(|url| !url.is_empty()) {
			links = links.child(external_link(demo_url, "text-blue-600 hover:text-blue-800 dark:text-blue-400 dark:hover:text-blue-300 font-semibold", "Live Demo"));
		}
		if let Some(github_url) = self.github_url.as_deref().filter(|url| !url.is_empty()) {
			links = links.child(external_link(github_url, "text-gray-600 hover:text-gray-800 dark:text-gray-400 dark:hover:text-gray-200 font-semibold", "GitHub"));
		}

		el("div")
			.class("project-card bg-white dark:bg-gray-800 rounded-lg overflow-hidden shadow-lg hover:shadow-xl transition-all duration-300")
			.attr("data-category", self.category.to_lowercase())
			.child(card_banner(self.image_url.as_deref(), PLACEHOLDER_IMAGE, &self.title, &self.category, "w-full h-48 object-cover"))
			.child(
				el("div")
					.class("p-6")
					.child(el("h3").class("text-xl font-bold text-gray-800 dark:text-white mb-2").text(self.title.as_str()))
					.child(el("p").class("text-gray-700 dark:text-gray-300 mb-4").text(self.description.as_str()))
					.child(el("div").class("flex flex-wrap gap-2 mb-4").children(self.technologies.iter().map(|technology| {
						Node::from(
							el("span")
								.class("bg-gray-200 dark:bg-gray-700 text-gray-800 dark:text-gray-300 text-xs font-semibold px-2.5 py-0.5 rounded")
								.child(text(technology.as_str())),
						)
					})))
					.child(links),
			)
			.into()
	}

	fn samples() -> Vec<Self> {
		parse_samples(include_str!("samples/projects.json"))
	}
}

/// Up to `limit` projects flagged `featured`, in list order.
#[must_use]
pub fn featured(projects: &[Project], limit: usize) -> Vec<&Project> {
	projects.iter().filter(|project| project.featured).take(limit).collect()
}
