use std::pin::pin;

use futures::{StreamExt, TryFutureExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{QueryAggregator, Result};
use codeintel_domain::{Hover, PositionQuery, Upload};
use codeintel_providers::HoverRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverQuery {
	#[serde(flatten)]
	pub position: PositionQuery,
	/// Candidate uploads in priority order. The first non-empty answer wins.
	pub uploads: Vec<Upload>,
}

impl QueryAggregator {
	/// Returns the hover text of the first upload that has any.
	///
	/// Later uploads may already be in flight, but their answers (and failures)
	/// are only looked at once every earlier upload came back empty.
	pub async fn hover(
		&self,
		req: HoverQuery,
		cancel: &CancellationToken,
	) -> Result<Option<Hover>> {
		crate::validate_target(&req.position, &req.uploads)?;

		self.guarded("hover", cancel, self.first_hover(&req)).await
	}

	async fn first_hover(&self, req: &HoverQuery) -> Result<Option<Hover>> {
		let backend = self.backend.as_ref();
		let upload_ids: Vec<i64> = req.uploads.iter().map(|upload| upload.id).collect();
		let calls = upload_ids.into_iter().map(|upload_id| {
			backend
				.hover(HoverRequest { position: req.position.clone(), upload_id })
				.map_ok(move |hover| (upload_id, hover))
				.map_err(move |source| crate::upstream(upload_id, source))
		});
		let mut answers = pin!(self.fan_out(calls));

		while let Some(answer) = answers.next().await {
			let (upload_id, hover) = answer?;

			if !hover.is_empty() {
				tracing::debug!(upload_id, "Hover answered.");

				return Ok(Some(hover));
			}
		}

		Ok(None)
	}
}
