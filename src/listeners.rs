use hashbrown::HashMap;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::EventTarget;

struct Binding {
	target: EventTarget,
	event: &'static str,
	closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Binding {
	fn detach(&self) {
		if let Err(error) = self.target.remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref()) {
			error!("Failed to remove {:?} listener: {:?}", self.event, error);
		}
	}
}

/// Owns the closures behind `addEventListener` registrations.
///
/// Bindings are grouped into named scopes. Re-initializing a component calls
/// [`Listeners::replace_scope`] first, which detaches everything that scope installed earlier,
/// so repeated bootstraps never stack duplicate handlers.
///
/// Dropping the registry detaches all remaining listeners.
#[derive(Default)]
pub struct Listeners {
	scopes: HashMap<&'static str, Vec<Binding>>,
}

impl core::fmt::Debug for Listeners {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_map().entries(self.scopes.iter().map(|(scope, bindings)| (scope, bindings.len()))).finish()
	}
}

impl Listeners {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Detaches every listener previously installed under `scope`.
	pub fn replace_scope(&mut self, scope: &'static str) {
		if let Some(bindings) = self.scopes.remove(scope) {
			for binding in &bindings {
				binding.detach();
			}
			trace!("Detached {} listener(s) of scope {:?}.", bindings.len(), scope);
		}
	}

	pub fn listen(&mut self, scope: &'static str, target: &EventTarget, event: &'static str, handler: impl FnMut(web_sys::Event) + 'static) {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
		if let Err(error) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
			return error!("Failed to add {:?} listener in scope {:?}: {:?}", event, scope, error);
		}
		self.scopes.entry(scope).or_default().push(Binding { target: target.clone(), event, closure });
	}

	#[must_use]
	pub fn len(&self, scope: &str) -> usize {
		self.scopes.get(scope).map_or(0, Vec::len)
	}

	#[must_use]
	pub fn total(&self) -> usize {
		self.scopes.values().map(Vec::len).sum()
	}
}

impl Drop for Listeners {
	fn drop(&mut self) {
		for binding in self.scopes.values().flatten() {
			binding.detach();
		}
	}
}
