use crate::{
	view::{self, el, Node},
	Result,
};
use serde::Deserialize;
use tracing::{error, info, trace};
use web_sys::Document;

pub const SKILLS_ID: &str = "skills-container";
pub const EXPERIENCE_ID: &str = "experience-container";
pub const EDUCATION_ID: &str = "education-container";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Skill {
	pub name: String,
	/// Percent.
	pub level: u8,
}

/// A position or a degree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
	pub title: String,
	pub organization: String,
	pub period: String,
	#[serde(default)]
	pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
	pub skills: Vec<Skill>,
	pub experience: Vec<Entry>,
	pub education: Vec<Entry>,
}

impl Profile {
	pub fn bundled() -> Result<Self> {
		Ok(serde_json::from_str(include_str!("data/about.json"))?)
	}
}

impl Skill {
	#[must_use]
	pub fn view(&self) -> Node {
		let level = self.level.min(100);
		el("div")
			.class("bg-gray-100 dark:bg-gray-700 rounded-lg p-3")
			.child(
				el("div")
					.class("flex justify-between mb-1")
					.child(el("span").class("font-medium text-gray-700 dark:text-gray-300").text(self.name.as_str()))
					.child(el("span").class("text-sm text-gray-500 dark:text-gray-400").text(format!("{}%", level))),
			)
			.child(
				el("div")
					.class("w-full bg-gray-200 dark:bg-gray-600 rounded-full h-2")
					.child(el("div").class("bg-blue-600 h-2 rounded-full").attr("style", format!("width: {}%", level))),
			)
			.into()
	}
}

impl Entry {
	#[must_use]
	pub fn view(&self) -> Node {
		el("div")
			.class("border-l-4 border-blue-600 pl-4")
			.child(el("h3").class("text-xl font-bold text-gray-800 dark:text-white").text(self.title.as_str()))
			.child(el("p").class("text-gray-600 dark:text-gray-400").text(format!("{} | {}", self.organization, self.period)))
			.child(el("p").class("text-gray-700 dark:text-gray-300 mt-2").text(self.description.as_str()))
			.into()
	}
}

fn fill(document: &Document, container_id: &str, nodes: &[Node]) -> bool {
	match document.get_element_by_id(container_id) {
		Some(container) => {
			view::mount(document, &container, nodes);
			true
		}
		None => {
			trace!("No #{} on this page.", container_id);
			false
		}
	}
}

/// Renders the bundled profile into whichever of the three containers exist. Returns how many were filled.
pub fn init_about(document: &Document) -> usize {
	let profile = match Profile::bundled() {
		Ok(profile) => profile,
		Err(error) => {
			error!("Bundled profile is malformed: {}", error);
			return 0;
		}
	};

	let sections: [(&str, Vec<Node>); 3] = [
		(SKILLS_ID, profile.skills.iter().map(Skill::view).collect()),
		(EXPERIENCE_ID, profile.experience.iter().map(Entry::view).collect()),
		(EDUCATION_ID, profile.education.iter().map(Entry::view).collect()),
	];
	let filled = sections.iter().filter(|(id, nodes)| fill(document, id, nodes)).count();
	info!("Filled {} about section(s).", filled);
	filled
}
