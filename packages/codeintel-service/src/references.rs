//! Paginated references across several uploads.
//!
//! Every upload paginates on its own. The composite cursor handed back to the
//! caller holds one continuation token per upload that still has results, and
//! nothing else:
//!
//! - No cursor, or a cursor that decodes to an empty map, starts a session and
//!   queries every candidate upload.
//! - On later pages only uploads named in the cursor are queried. An upload
//!   missing from the cursor is exhausted, even when it has just been added to
//!   the candidate list.
//! - Once no upload returns a continuation token the page has no end cursor.

use futures::{TryFutureExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{Error, QueryAggregator, Result};
use codeintel_domain::{CursorMap, PositionQuery, ResultPage, Upload, cursor};
use codeintel_providers::{ReferencesPage, ReferencesRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencesQuery {
	#[serde(flatten)]
	pub position: PositionQuery,
	/// Candidate uploads, most preferred first.
	pub uploads: Vec<Upload>,
	/// Page size forwarded to each upload. Bounds every upload separately, not the merged page.
	#[serde(default)]
	pub first: Option<u32>,
	/// End cursor of the previous page.
	#[serde(default)]
	pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PageTarget {
	upload_id: i64,
	cursor: Option<String>,
}

impl QueryAggregator {
	pub async fn references(
		&self,
		req: ReferencesQuery,
		cancel: &CancellationToken,
	) -> Result<ResultPage> {
		crate::validate_target(&req.position, &req.uploads)?;

		if let Some(first) = req.first
			&& (first == 0 || first > self.cfg.max_page_size)
		{
			return Err(Error::InvalidRequest {
				message: format!("first must be between 1 and {}.", self.cfg.max_page_size),
			});
		}

		let incoming = cursor::decode(req.after.as_deref())
			.map_err(|err| Error::MalformedCursor { message: err.to_string() })?;
		let targets = plan_targets(&req.uploads, &incoming);
		let pages =
			self.guarded("references", cancel, self.fetch_reference_pages(&req, targets)).await?;
		let queried = pages.len();
		let mut locations = Vec::new();
		let mut outgoing = CursorMap::new();

		for (upload_id, page) in pages {
			locations.extend(page.locations);

			if let Some(next_cursor) = page.next_cursor {
				outgoing.insert(upload_id, next_cursor);
			}
		}

		let end_cursor = cursor::encode(&outgoing)
			.map_err(|err| Error::Internal { message: format!("Failed to encode cursor: {err}") })?;

		tracing::info!(
			uploads_queried = queried,
			uploads_active = outgoing.len(),
			locations = locations.len(),
			"References page served."
		);

		Ok(ResultPage { locations, end_cursor: (!end_cursor.is_empty()).then_some(end_cursor) })
	}

	async fn fetch_reference_pages(
		&self,
		req: &ReferencesQuery,
		targets: Vec<PageTarget>,
	) -> Result<Vec<(i64, ReferencesPage)>> {
		let backend = self.backend.as_ref();

		tracing::debug!(uploads = targets.len(), "Fanning out references.");

		let calls = targets.into_iter().map(|target| {
			let upload_id = target.upload_id;

			backend
				.references(ReferencesRequest {
					position: req.position.clone(),
					upload_id,
					limit: req.first,
					cursor: target.cursor,
				})
				.map_ok(move |page| (upload_id, page))
				.map_err(move |source| crate::upstream(upload_id, source))
		});

		self.fan_out(calls).try_collect().await
	}
}

/// Decides which uploads to query for this page, in candidate order.
fn plan_targets(uploads: &[Upload], incoming: &CursorMap) -> Vec<PageTarget> {
	if incoming.is_empty() {
		return uploads
			.iter()
			.map(|upload| PageTarget { upload_id: upload.id, cursor: None })
			.collect();
	}

	for upload_id in incoming.upload_ids() {
		if !uploads.iter().any(|upload| upload.id == upload_id) {
			tracing::warn!(upload_id, "Cursor names an upload outside the candidate list.");
		}
	}

	uploads
		.iter()
		.filter_map(|upload| {
			incoming
				.get(upload.id)
				.map(|token| PageTarget { upload_id: upload.id, cursor: Some(token.to_string()) })
		})
		.collect()
}
