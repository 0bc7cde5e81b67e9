//! Light/dark theme, persisted in `localStorage` under [`STORAGE_KEY`].

use crate::{dom, listeners::Listeners};
use core::{
	cell::Cell,
	fmt::{self, Display, Formatter},
};
use tracing::{error, info, instrument, warn};
use web_sys::{Element, Storage, Window};

pub const STORAGE_KEY: &str = "theme";
/// Class on the document root that all dark styling keys off.
pub const DARK_CLASS: &str = "dark";
pub const TOGGLE_ID: &str = "theme-toggle";
pub const DARK_ICON_ID: &str = "theme-toggle-dark-icon";
pub const LIGHT_ICON_ID: &str = "theme-toggle-light-icon";
const TRANSITION_CLASS: &str = "theme-transition";
const TRANSITION_MS: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
	Light,
	Dark,
}

impl Theme {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Light => "light",
			Self::Dark => "dark",
		}
	}

	#[must_use]
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"light" => Some(Self::Light),
			"dark" => Some(Self::Dark),
			_ => None,
		}
	}

	#[must_use]
	pub fn toggled(self) -> Self {
		match self {
			Self::Light => Self::Dark,
			Self::Dark => Self::Light,
		}
	}

	/// Persisted value first, then the system preference, then light.
	///
	/// Unrecognized persisted values count as absent.
	#[must_use]
	pub fn resolve(persisted: Option<&str>, prefers_dark: bool) -> Self {
		match persisted.and_then(Self::parse) {
			Some(theme) => theme,
			None if prefers_dark => Self::Dark,
			None => Self::Light,
		}
	}
}

impl Display for Theme {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Where the theme flag lives between page loads.
pub trait ThemeStore {
	fn load(&self) -> Option<String>;
	fn save(&self, theme: Theme);
}

impl ThemeStore for Storage {
	fn load(&self) -> Option<String> {
		self.get_item(STORAGE_KEY).unwrap_or_else(|error| {
			error!("Failed to read {:?} from storage: {:?}", STORAGE_KEY, error);
			None
		})
	}

	/// On failure the old value is dropped, so that it can't shadow the theme now applied.
	fn save(&self, theme: Theme) {
		if let Err(error) = self.set_item(STORAGE_KEY, theme.as_str()) {
			error!("Failed to persist theme {}: {:?}", theme, error);
			if let Err(error) = self.remove_item(STORAGE_KEY) {
				error!("Failed to clear stale theme: {:?}", error);
			}
		}
	}
}

/// Storage is unavailable (private mode, sandboxed frames): nothing persists.
impl ThemeStore for () {
	fn load(&self) -> Option<String> {
		None
	}

	fn save(&self, _: Theme) {}
}

/// Computes the next theme from the persisted value, not from the live DOM, and persists it.
///
/// Without a persisted value, the last `applied` theme is flipped, and failing that the system preference.
pub fn toggle_persisted(store: &dyn ThemeStore, prefers_dark: bool, applied: Option<Theme>) -> Theme {
	let persisted = store.load().as_deref().and_then(Theme::parse);
	let current = persisted.or(applied).unwrap_or_else(|| Theme::resolve(None, prefers_dark));
	let next = current.toggled();
	store.save(next);
	next
}

/// The elements a theme is applied to.
#[derive(Debug, Clone)]
pub struct ThemeTargets {
	pub root: Element,
	pub dark_icon: Element,
	pub light_icon: Element,
	applied: Cell<Option<Theme>>,
}

impl ThemeTargets {
	#[must_use]
	pub fn new(root: Element, dark_icon: Element, light_icon: Element) -> Self {
		Self { root, dark_icon, light_icon, applied: Cell::new(None) }
	}

	/// The theme last passed to [`ThemeTargets::apply`].
	#[must_use]
	pub fn applied(&self) -> Option<Theme> {
		self.applied.get()
	}

	/// In dark mode the light icon is offered, and vice versa.
	pub fn apply(&self, theme: Theme) {
		self.applied.set(Some(theme));
		match theme {
			Theme::Dark => {
				dom::add_classes(&self.root, &[DARK_CLASS]);
				dom::add_classes(&self.dark_icon, &["hidden"]);
				dom::remove_classes(&self.light_icon, &["hidden"]);
			}
			Theme::Light => {
				dom::remove_classes(&self.root, &[DARK_CLASS]);
				dom::add_classes(&self.light_icon, &["hidden"]);
				dom::remove_classes(&self.dark_icon, &["hidden"]);
			}
		}
	}
}

pub fn local_storage(window: &Window) -> Option<Storage> {
	match window.local_storage() {
		Ok(storage) => storage,
		Err(error) => {
			warn!("`localStorage` unavailable: {:?}", error);
			None
		}
	}
}

pub fn prefers_dark(window: &Window) -> bool {
	match window.match_media("(prefers-color-scheme: dark)") {
		Ok(Some(query)) => query.matches(),
		_ => false,
	}
}

/// Flips the theme: root class, persisted value and icons, in that order.
pub fn toggle_theme(window: &Window, targets: &ThemeTargets) -> Theme {
	let storage = local_storage(window);
	let store: &dyn ThemeStore = match &storage {
		Some(storage) => storage,
		None => &(),
	};
	let next = toggle_persisted(store, prefers_dark(window), targets.applied());
	targets.apply(next);
	info!("Theme toggled to {}.", next);

	dom::add_classes(&targets.root, &[TRANSITION_CLASS]);
	let root = targets.root.clone();
	let window = window.clone();
	wasm_bindgen_futures::spawn_local(async move {
		dom::sleep(&window, TRANSITION_MS).await;
		dom::remove_classes(&root, &[TRANSITION_CLASS]);
	});

	next
}

/// Applies the initial theme and wires the toggle button.
///
/// Must run after the header fragment is injected, since that's where the button and icons live.
/// Returns the applied theme, or [`None`] if the header elements are missing.
#[instrument(skip(window, listeners))]
pub fn init_theme(window: &Window, listeners: &mut Listeners) -> Option<Theme> {
	listeners.replace_scope("theme");

	let document = window.document()?;
	let (button, dark_icon, light_icon) = match (
		document.get_element_by_id(TOGGLE_ID),
		document.get_element_by_id(DARK_ICON_ID),
		document.get_element_by_id(LIGHT_ICON_ID),
	) {
		(Some(button), Some(dark_icon), Some(light_icon)) => (button, dark_icon, light_icon),
		_ => {
			warn!("Theme toggle elements not found; skipping theme initialization.");
			return None;
		}
	};
	let root = match document.document_element() {
		Some(root) => root,
		None => {
			warn!("No document element; skipping theme initialization.");
			return None;
		}
	};
	let targets = ThemeTargets::new(root, dark_icon, light_icon);

	let persisted = local_storage(window).and_then(|storage| storage.load());
	let theme = Theme::resolve(persisted.as_deref(), prefers_dark(window));
	targets.apply(theme);
	info!("Initial theme: {}", theme);

	let window = window.clone();
	listeners.listen("theme", button.as_ref(), "click", move |_| {
		toggle_theme(&window, &targets);
	});
	Some(theme)
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::cell::RefCell;

	#[derive(Default)]
	struct MemoryStore(RefCell<Option<String>>);
	impl ThemeStore for MemoryStore {
		fn load(&self) -> Option<String> {
			self.0.borrow().clone()
		}
		fn save(&self, theme: Theme) {
			*self.0.borrow_mut() = Some(theme.as_str().to_owned());
		}
	}

	#[test]
	fn persisted_value_wins() {
		assert_eq!(Theme::resolve(Some("light"), true), Theme::Light);
		assert_eq!(Theme::resolve(Some("dark"), false), Theme::Dark);
	}

	#[test]
	fn system_preference_is_second() {
		assert_eq!(Theme::resolve(None, true), Theme::Dark);
		assert_eq!(Theme::resolve(Some("sepia"), true), Theme::Dark);
	}

	#[test]
	fn light_is_the_default() {
		assert_eq!(Theme::resolve(None, false), Theme::Light);
	}

	#[test]
	fn toggle_reads_storage_not_dom() {
		let store = MemoryStore::default();
		*store.0.borrow_mut() = Some("dark".to_owned());
		assert_eq!(toggle_persisted(&store, false, Some(Theme::Light)), Theme::Light);
		assert_eq!(store.load().as_deref(), Some("light"));
	}

	#[test]
	fn toggle_without_persisted_value_starts_from_system() {
		let store = MemoryStore::default();
		assert_eq!(toggle_persisted(&store, true, None), Theme::Light);
		let store = MemoryStore::default();
		assert_eq!(toggle_persisted(&store, false, None), Theme::Dark);
	}

	#[test]
	fn double_toggle_is_identity() {
		for initial in &["light", "dark"] {
			for &prefers_dark in &[false, true] {
				let store = MemoryStore::default();
				*store.0.borrow_mut() = Some((*initial).to_owned());
				toggle_persisted(&store, prefers_dark, None);
				toggle_persisted(&store, prefers_dark, None);
				assert_eq!(store.load().as_deref(), Some(*initial));
			}
		}
	}

	#[test]
	fn unavailable_storage_still_toggles() {
		for &prefers_dark in &[false, true] {
			let initial = Theme::resolve(None, prefers_dark);
			let once = toggle_persisted(&(), prefers_dark, Some(initial));
			let twice = toggle_persisted(&(), prefers_dark, Some(once));
			assert_eq!((once, twice), (initial.toggled(), initial));
		}
		assert_eq!(toggle_persisted(&(), false, None), Theme::Dark);
	}
}
