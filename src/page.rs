use crate::nav::page_file_name;

/// Which page-specific initializer a document gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
	Home,
	Projects,
	Blog,
	/// `blog-post.html?id=…`
	BlogPost,
	About,
	Contact,
	Other(String),
}

impl Page {
	/// Dispatches on the file name of `pathname`; an empty one means `index.html`.
	#[must_use]
	pub fn from_path(pathname: &str) -> Self {
		match page_file_name(pathname) {
			"index.html" => Self::Home,
			"projects.html" => Self::Projects,
			"blog.html" => Self::Blog,
			"blog-post.html" => Self::BlogPost,
			"about.html" => Self::About,
			"contact.html" => Self::Contact,
			other => Self::Other(other.to_owned()),
		}
	}
}
