use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum Error {
	#[error("Element #{0} not found")]
	MissingElement(String),
	#[error("HTTP {status} for {url}")]
	Http { url: String, status: u16 },
	#[error("Empty response body for {0}")]
	EmptyBody(String),
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("JavaScript error: {0}")]
	Js(String),
	#[error("{0} not found")]
	NotFound(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| js_sys::Reflect::get(&value, &JsValue::from_str("message")).ok().and_then(|message| message.as_string()))
			.unwrap_or_else(|| format!("{:?}", value));
		Self::Js(message)
	}
}
