//! The bootstrap orchestrator and the state it shares with event handlers.

use crate::{
	animation,
	content::{self, blog, project, BlogPost, Catalog, Collection, Project},
	dom, fragment,
	listeners::Listeners,
	nav,
	page::Page,
	pages,
	reveal::{self, RevealEngine},
	theme::{self, Theme},
	Capabilities, Config, Result,
};
use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{info, info_span, instrument, trace, warn, Instrument as _};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, UrlSearchParams, VisibilityState, Window};

pub const HEADER_CONTAINER: &str = "header-container";
pub const FOOTER_CONTAINER: &str = "footer-container";
pub const CURRENT_YEAR_ID: &str = "current-year";

/// How leaving for another URL is done. Replaced in tests.
pub type Navigator = Rc<dyn Fn(&str)>;

/// What one run of [`App::init_app`] achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boot {
	/// 1 for the first run on this page.
	pub number: usize,
	pub header: bool,
	pub theme: Option<Theme>,
	pub footer: bool,
	pub page: Page,
}

/// Everything the page's components share for the life of the document.
///
/// Event handlers hold [`Weak`] references to it, so dropping the last [`Rc`] tears everything down.
pub struct App {
	window: Window,
	document: Document,
	config: Config,
	capabilities: Capabilities,
	listeners: RefCell<Listeners>,
	reveal: RefCell<Option<RevealEngine>>,
	projects: Collection<Project>,
	blog_posts: Collection<BlogPost>,
	navigator: Navigator,
	boots: Cell<usize>,
	booting: Cell<bool>,
}

impl core::fmt::Debug for App {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("App")
			.field("config", &self.config)
			.field("capabilities", &self.capabilities)
			.field("listeners", &self.listeners)
			.field("reveal", &self.reveal)
			.field("boots", &self.boots)
			.finish()
	}
}

impl App {
	#[must_use]
	pub fn new(window: Window, document: Document, config: Config, capabilities: Capabilities) -> Self {
		let location = window.location();
		Self {
			window,
			document,
			config,
			capabilities,
			listeners: RefCell::default(),
			reveal: RefCell::new(None),
			projects: Collection::new(),
			blog_posts: Collection::new(),
			navigator: Rc::new(move |url: &str| {
				if let Err(error) = location.set_href(url) {
					tracing::error!("Navigation failed: {:?}", error);
				}
			}),
			boots: Cell::new(0),
			booting: Cell::new(false),
		}
	}

	/// The global window and document, configuration from the page and probed capabilities.
	pub fn from_window() -> Result<Self> {
		let window = dom::window()?;
		let document = dom::document(&window)?;
		let config = Config::from_document(&document);
		Ok(Self::new(window, document, config, Capabilities::probe()))
	}

	#[must_use]
	pub fn with_navigator(mut self, navigator: Navigator) -> Self {
		self.navigator = navigator;
		self
	}

	#[must_use]
	pub fn window(&self) -> &Window {
		&self.window
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	#[must_use]
	pub fn config(&self) -> &Config {
		&self.config
	}

	#[must_use]
	pub fn capabilities(&self) -> &Capabilities {
		&self.capabilities
	}

	#[must_use]
	pub fn projects(&self) -> &Collection<Project> {
		&self.projects
	}

	#[must_use]
	pub fn blog_posts(&self) -> &Collection<BlogPost> {
		&self.blog_posts
	}

	pub fn navigate(&self, url: &str) {
		(self.navigator)(url);
	}

	/// Completed and running bootstraps so far.
	#[must_use]
	pub fn boot_count(&self) -> usize {
		self.boots.get()
	}

	#[must_use]
	pub fn listener_count(&self, scope: &str) -> usize {
		self.listeners.borrow().len(scope)
	}

	/// Whether a reveal engine has started.
	#[must_use]
	pub fn reveal_started(&self) -> bool {
		self.reveal.borrow().is_some()
	}

	fn pathname(&self) -> String {
		self.window.location().pathname().unwrap_or_else(|error| {
			warn!("Couldn't read the location: {:?}", error);
			String::new()
		})
	}

	/// Runs the full bootstrap sequence once: header, theme, footer, navigation, footer year,
	/// animations, and finally the page-specific initializer.
	///
	/// Every step tolerates the failure of the ones before it, except that the theme needs the header's toggle.
	#[instrument(skip(self))]
	pub async fn init_app(self: Rc<Self>) -> Boot {
		let number = self.boots.get() + 1;
		self.boots.set(number);
		self.booting.set(true);
		info!("Bootstrapping.");

		let header = fragment::load_fragment(&self.window, &self.document, &self.config, HEADER_CONTAINER, &self.config.header_path).await;
		let theme = if header {
			theme::init_theme(&self.window, &mut self.listeners.borrow_mut())
		} else {
			warn!("Header missing; skipping theme initialization.");
			None
		};

		let footer = fragment::load_fragment(&self.window, &self.document, &self.config, FOOTER_CONTAINER, &self.config.footer_path).await;

		nav::init_navigation(&self.window, &self.document, &self.config, &mut self.listeners.borrow_mut());
		let pathname = self.pathname();
		nav::mark_current_page_link(&self.document, nav::page_file_name(&pathname));

		if footer {
			self.set_current_year();
		}

		let page = Page::from_path(&pathname);
		animation::init_page_animations(&self.document, &self.capabilities, &page);
		self.schedule_reveal();

		self.init_page(&page).await;
		self.booting.set(false);
		info!("Bootstrap {} finished on {:?}.", number, page);
		Boot { number, header, theme, footer, page }
	}

	fn set_current_year(&self) {
		match self.document.get_element_by_id(CURRENT_YEAR_ID) {
			Some(year) => year.set_text_content(Some(&js_sys::Date::new_0().get_full_year().to_string())),
			None => trace!("Footer has no #{}.", CURRENT_YEAR_ID),
		}
	}

	/// Starts the reveal engine after [`Config::reveal_delay_ms`], so that layout has settled.
	fn schedule_reveal(self: &Rc<Self>) {
		let app = Rc::downgrade(self);
		let delay = self.config.reveal_delay_ms;
		let window = self.window.clone();
		spawn_local(
			async move {
				dom::sleep(&window, delay).await;
				if let Some(app) = Weak::upgrade(&app) {
					let engine = RevealEngine::start(&app.document, &app.config, &app.capabilities);
					// A previous engine is dropped, which disconnects it.
					*app.reveal.borrow_mut() = Some(engine);
				}
			}
			.instrument(info_span!("reveal")),
		);
	}

	/// Tags the children of a freshly rendered container and hands them to the running engine, if any.
	///
	/// Children tagged before the engine starts are picked up by its initial pass instead.
	pub fn reveal_new(&self, container_id: &str) {
		let tagged = reveal::add_staggered_animations(&self.document, container_id);
		if let Some(engine) = self.reveal.borrow_mut().as_mut() {
			for element in &tagged {
				engine.watch(element);
			}
		}
	}

	async fn init_page(self: &Rc<Self>, page: &Page) {
		match page {
			Page::Home => {
				self.spawn_featured_projects();
				self.spawn_recent_posts();
			}
			Page::Projects => {
				content::init(&self.window, &self.document, &self.config, &self.projects, &self.listeners).await;
				self.reveal_new(Project::GRID_ID);
			}
			Page::Blog => {
				content::init(&self.window, &self.document, &self.config, &self.blog_posts, &self.listeners).await;
				self.reveal_new(BlogPost::GRID_ID);
			}
			Page::BlogPost => {
				let id = self.query_parameter("id").unwrap_or_default();
				blog::load_blog_post(self, &id, blog::CONTENT_ID).await;
			}
			Page::About => {
				pages::init_about(&self.document);
			}
			Page::Contact => {
				pages::init_contact_form(&self.document, &mut self.listeners.borrow_mut());
			}
			Page::Other(name) => trace!("No initializer for {:?}.", name),
		}
	}

	fn query_parameter(&self, name: &str) -> Option<String> {
		let search = self.window.location().search().ok()?;
		UrlSearchParams::new_with_str(&search).ok()?.get(name)
	}

	fn spawn_featured_projects(self: &Rc<Self>) {
		if self.document.get_element_by_id(Project::SUBSET_ID).is_none() {
			return;
		}
		let app = self.clone();
		spawn_local(async move {
			let projects = content::load(&app.window, &app.config, &app.projects).await;
			let featured = project::featured(&projects, app.config.featured_limit);
			if let Some(count) = content::render_subset(&app.document, Project::SUBSET_ID, &featured) {
				info!("Rendered {} featured project(s).", count);
				app.reveal_new(Project::SUBSET_ID);
			}
		});
	}

	fn spawn_recent_posts(self: &Rc<Self>) {
		if self.document.get_element_by_id(BlogPost::SUBSET_ID).is_none() {
			return;
		}
		let app = self.clone();
		spawn_local(async move {
			let posts = content::load(&app.window, &app.config, &app.blog_posts).await;
			let recent = blog::recent(&posts, app.config.recent_limit);
			if let Some(count) = content::render_subset(&app.document, BlogPost::SUBSET_ID, &recent) {
				info!("Rendered {} recent post(s).", count);
				app.reveal_new(BlogPost::SUBSET_ID);
			}
		});
	}

	/// Re-runs the bootstrap when the page becomes visible again with its header gone,
	/// as happens when a browser restores a page whose injected content was discarded.
	pub fn watch_visibility(self: &Rc<Self>) {
		let app = Rc::downgrade(self);
		let mut listeners = self.listeners.borrow_mut();
		listeners.replace_scope("visibility");
		listeners.listen("visibility", self.document.as_ref(), "visibilitychange", move |_| {
			let app = match Weak::upgrade(&app) {
				Some(app) => app,
				None => return,
			};
			if app.document.visibility_state() != VisibilityState::Visible || app.booting.get() {
				return;
			}
			// Stray whitespace text doesn't count as a header.
			let header_missing = app.document.get_element_by_id(HEADER_CONTAINER).map_or(false, |header| header.child_element_count() == 0);
			if header_missing {
				info!("Header was lost while hidden; bootstrapping again.");
				spawn_local(async move {
					app.init_app().await;
				});
			}
		});
	}
}
