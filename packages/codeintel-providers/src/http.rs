use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
	BoxFuture, DefinitionsRequest, Error, HoverRequest, ReferencesPage, ReferencesRequest, Result,
	UploadBackend,
};
use codeintel_domain::{Hover, Location, PositionQuery, Range};

/// Upload backend reached over HTTP.
///
/// Every endpoint is a `GET` taking the position and upload id as query
/// parameters and answering with JSON.
pub struct HttpUploadBackend {
	api_base: String,
	client: Client,
}
impl HttpUploadBackend {
	pub fn new(cfg: &codeintel_config::Backend) -> Result<Self> {
		let headers = crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?;
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(headers)
			.build()?;

		Ok(Self { api_base: cfg.api_base.trim_end_matches('/').to_string(), client })
	}

	async fn get(&self, endpoint: &str, params: &QueryParams<'_>) -> Result<Value> {
		let url = format!("{}/{endpoint}", self.api_base);
		let res = self.client.get(url).query(params).send().await?;
		let status = res.status();

		tracing::debug!(
			endpoint,
			upload_id = params.upload_id,
			%status,
			"Upload backend responded."
		);

		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();

			return Err(Error::Remote {
				message: format!("{endpoint} answered {status}: {}", body.trim()),
			});
		}

		Ok(res.json().await?)
	}

	async fn fetch_definitions(&self, req: DefinitionsRequest) -> Result<Vec<Location>> {
		let params = QueryParams::new(&req.position, req.upload_id);
		let json = self.get("definitions", &params).await?;

		parse_locations_response(json, req.upload_id).map(|(locations, _)| locations)
	}

	async fn fetch_references(&self, req: ReferencesRequest) -> Result<ReferencesPage> {
		let params = QueryParams {
			limit: req.limit,
			cursor: req.cursor.as_deref(),
			..QueryParams::new(&req.position, req.upload_id)
		};
		let json = self.get("references", &params).await?;
		let (locations, next_cursor) = parse_locations_response(json, req.upload_id)?;

		Ok(ReferencesPage { locations, next_cursor })
	}

	async fn fetch_hover(&self, req: HoverRequest) -> Result<Hover> {
		let params = QueryParams::new(&req.position, req.upload_id);
		let json = self.get("hover", &params).await?;

		parse_hover_response(json)
	}
}
impl UploadBackend for HttpUploadBackend {
	fn definitions(&self, req: DefinitionsRequest) -> BoxFuture<'_, Result<Vec<Location>>> {
		Box::pin(self.fetch_definitions(req))
	}

	fn references(&self, req: ReferencesRequest) -> BoxFuture<'_, Result<ReferencesPage>> {
		Box::pin(self.fetch_references(req))
	}

	fn hover(&self, req: HoverRequest) -> BoxFuture<'_, Result<Hover>> {
		Box::pin(self.fetch_hover(req))
	}
}

#[derive(Debug, Serialize)]
struct QueryParams<'a> {
	repository: &'a str,
	commit: &'a str,
	path: &'a str,
	line: u32,
	character: u32,
	#[serde(rename = "uploadId")]
	upload_id: i64,
	#[serde(skip_serializing_if = "Option::is_none")]
	limit: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	cursor: Option<&'a str>,
}
impl<'a> QueryParams<'a> {
	fn new(position: &'a PositionQuery, upload_id: i64) -> Self {
		Self {
			repository: &position.repository,
			commit: &position.commit,
			path: &position.path,
			line: position.line,
			character: position.character,
			upload_id,
			limit: None,
			cursor: None,
		}
	}
}

#[derive(Debug, Deserialize)]
struct WireLocation {
	#[serde(default)]
	repository: Option<String>,
	#[serde(default)]
	commit: Option<String>,
	path: String,
	range: Range,
}

#[derive(Debug, Deserialize)]
struct LocationsBody {
	locations: Option<Vec<WireLocation>>,
	#[serde(default)]
	next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HoverBody {
	#[serde(default)]
	text: Option<String>,
	#[serde(default)]
	range: Option<Range>,
}

fn parse_locations_response(
	json: Value,
	upload_id: i64,
) -> Result<(Vec<Location>, Option<String>)> {
	let body: LocationsBody = serde_json::from_value(json)?;
	let wire = body.locations.ok_or_else(|| Error::InvalidResponse {
		message: format!("Upload {upload_id} response is missing locations array."),
	})?;
	let locations = wire
		.into_iter()
		.map(|loc| Location {
			upload_id,
			repository: loc.repository,
			commit: loc.commit,
			path: loc.path,
			range: loc.range,
		})
		.collect();
	let next_cursor = body.next_cursor.filter(|cursor| !cursor.is_empty());

	Ok((locations, next_cursor))
}

fn parse_hover_response(json: Value) -> Result<Hover> {
	if json.is_null() {
		return Ok(Hover::default());
	}

	let body: HoverBody = serde_json::from_value(json)?;

	Ok(Hover { text: body.text.unwrap_or_default(), range: body.range })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stamps_upload_id_and_drops_empty_cursor() {
		let json = serde_json::json!({
			"locations": [
				{
					"repository": "github.com/acme/widgets",
					"path": "main.go",
					"range": {
						"start": { "line": 3, "character": 1 },
						"end": { "line": 3, "character": 9 }
					}
				}
			],
			"next_cursor": ""
		});
		let (locations, next_cursor) = parse_locations_response(json, 17).expect("parse failed");

		assert_eq!(locations.len(), 1);
		assert_eq!(locations[0].upload_id, 17);
		assert_eq!(locations[0].repository.as_deref(), Some("github.com/acme/widgets"));
		assert_eq!(locations[0].range, Range::new(3, 1, 3, 9));
		assert_eq!(next_cursor, None);
	}

	#[test]
	fn missing_locations_array_is_an_invalid_response() {
		let err = parse_locations_response(serde_json::json!({}), 1).expect_err("expected error");

		assert!(matches!(err, Error::InvalidResponse { .. }), "Unexpected error: {err:?}");
	}

	#[test]
	fn null_hover_is_empty() {
		let hover = parse_hover_response(Value::Null).expect("parse failed");

		assert!(hover.is_empty());

		let hover =
			parse_hover_response(serde_json::json!({ "text": null })).expect("parse failed");

		assert!(hover.is_empty());
	}
}
