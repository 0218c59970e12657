//! Errors raised while loading data from the host page.

/// Failure to obtain or parse an embedded JSON document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("no browser window or document available")]
	NoDocument,
	#[error("element #{0} not found")]
	MissingElement(String),
	#[error("element #{0} is not a <script> element")]
	NotAScript(String),
	#[error("invalid JSON in #{id}: {source}")]
	Json {
		id: String,
		#[source]
		source: serde_json::Error,
	},
	#[error("brand data must be a JSON array")]
	NotAnArray,
}
