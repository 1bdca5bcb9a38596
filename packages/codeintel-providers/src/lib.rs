pub mod http;

mod error;

pub use error::{Error, Result};
pub use http::HttpUploadBackend;

use std::{future::Future, pin::Pin};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

use codeintel_domain::{Hover, Location, PositionQuery};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Answers position queries against a single upload.
pub trait UploadBackend
where
	Self: Send + Sync,
{
	fn definitions(&self, req: DefinitionsRequest) -> BoxFuture<'_, Result<Vec<Location>>>;

	fn references(&self, req: ReferencesRequest) -> BoxFuture<'_, Result<ReferencesPage>>;

	/// An empty `text` means the upload has no hover data for the position.
	fn hover(&self, req: HoverRequest) -> BoxFuture<'_, Result<Hover>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionsRequest {
	pub position: PositionQuery,
	pub upload_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencesRequest {
	pub position: PositionQuery,
	pub upload_id: i64,
	/// Page size for this upload. The backend default applies when absent.
	pub limit: Option<u32>,
	/// Continuation token from this upload's previous page.
	pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverRequest {
	pub position: PositionQuery,
	pub upload_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencesPage {
	pub locations: Vec<Location>,
	/// `None` once the upload has no further results.
	pub next_cursor: Option<String>,
}

pub fn auth_headers(
	api_key: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
