use wasm_bindgen::JsValue;

/// Failures of the viewer's browser and backend plumbing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The backend answered with a non-success status.
	#[error("request to {url} failed with status {status}")]
	Fetch {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},
	/// A payload did not match the expected JSON shape.
	#[error("failed to decode response: {0}")]
	Decode(#[from] serde_json::Error),
	/// A browser API threw.
	#[error("javascript error: {0}")]
	Js(String),
	/// A required global or element is not available.
	#[error("missing browser element: {0}")]
	MissingElement(&'static str),
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Error::Js(
			value
				.as_string()
				.unwrap_or_else(|| format!("{value:?}")),
		)
	}
}

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
