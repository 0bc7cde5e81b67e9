use crate::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::{instrument, trace};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

/// GETs `url` as text. Non-2xx statuses and blank bodies are errors.
#[instrument(skip(window))]
pub async fn fetch_text(window: &Window, url: &str) -> Result<String> {
	let response = JsFuture::from(window.fetch_with_str(url)).await?;
	let response: Response = response.dyn_into()?;
	if !response.ok() {
		return Err(Error::Http { url: url.to_owned(), status: response.status() });
	}
	let body = JsFuture::from(response.text()?).await?;
	let body = body.as_string().unwrap_or_default();
	if body.trim().is_empty() {
		return Err(Error::EmptyBody(url.to_owned()));
	}
	trace!("Fetched {} byte(s) from {}.", body.len(), url);
	Ok(body)
}

pub async fn fetch_json<T: DeserializeOwned>(window: &Window, url: &str) -> Result<T> {
	let body = fetch_text(window, url).await?;
	Ok(serde_json::from_str(&body)?)
}
