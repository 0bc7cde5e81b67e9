use crate::{
	listeners::Listeners,
	view::{self, el, Node},
};
use js_sys::Array;
use tracing::{error, info, trace};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{FormData, HtmlFormElement};

pub const FORM_ID: &str = "contact-form";

/// Log line for a submission. Values are only included verbatim with `verbatim` set.
#[must_use]
pub fn describe_submission(fields: &[(String, String)], verbatim: bool) -> String {
	let described: Vec<String> = fields
		.iter()
		.map(|(name, value)| if verbatim { format!("{}={:?}", name, value) } else { format!("{}: {} char(s)", name, value.chars().count()) })
		.collect();
	format!("Contact form submitted: {}", described.join(", "))
}

#[must_use]
pub fn success_panel() -> Node {
	el("div")
		.class("bg-green-100 dark:bg-green-800 text-green-700 dark:text-green-200 p-4 rounded-lg")
		.child(el("h3").class("font-bold text-lg").text("Message Sent!"))
		.child(el("p").text("Thank you for reaching out. I'll get back to you as soon as possible."))
		.into()
}

fn fields(form: &HtmlFormElement) -> Result<Vec<(String, String)>, JsValue> {
	let data = FormData::new_with_form(form)?;
	let entries = match js_sys::try_iter(&data)? {
		Some(entries) => entries,
		None => return Ok(Vec::new()),
	};
	let mut fields = Vec::new();
	for entry in entries {
		let entry: Array = entry?.dyn_into()?;
		// File inputs yield `File`s, which have no string form worth logging.
		let value = entry.get(1).as_string().unwrap_or_default();
		fields.push((entry.get(0).as_string().unwrap_or_default(), value));
	}
	Ok(fields)
}

/// Intercepts submission of `#contact-form`: nothing is sent anywhere, the fields are logged and
/// the form is replaced by a confirmation. Returns whether the form exists.
pub fn init_contact_form(document: &web_sys::Document, listeners: &mut Listeners) -> bool {
	listeners.replace_scope("contact");
	let form = match document.get_element_by_id(FORM_ID).and_then(|form| form.dyn_into::<HtmlFormElement>().ok()) {
		Some(form) => form,
		None => {
			trace!("No #{} on this page.", FORM_ID);
			return false;
		}
	};

	let document = document.clone();
	let target = form.clone();
	listeners.listen("contact", form.as_ref(), "submit", move |event| {
		event.prevent_default();
		match fields(&target) {
			Ok(fields) => info!("{}", describe_submission(&fields, cfg!(feature = "dangerous-logging"))),
			Err(error) => error!("Failed to read contact form: {:?}", error),
		}
		view::mount(&document, &target, &[success_panel()]);
	});
	true
}
