use std::collections::HashSet;

use futures::{TryFutureExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{QueryAggregator, Result};
use codeintel_domain::{Location, PositionQuery, ResultPage, Upload};
use codeintel_providers::DefinitionsRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionsQuery {
	#[serde(flatten)]
	pub position: PositionQuery,
	/// Candidate uploads, most preferred first.
	pub uploads: Vec<Upload>,
}

impl QueryAggregator {
	/// Collects definitions from every candidate upload, in candidate order.
	///
	/// The answer is never paginated, so the page carries no cursor.
	pub async fn definitions(
		&self,
		req: DefinitionsQuery,
		cancel: &CancellationToken,
	) -> Result<ResultPage> {
		crate::validate_target(&req.position, &req.uploads)?;

		let locations = self.guarded("definitions", cancel, self.fetch_definitions(&req)).await?;
		let locations =
			if self.cfg.dedupe_definitions { dedupe_locations(locations) } else { locations };

		Ok(ResultPage::complete(locations))
	}

	async fn fetch_definitions(&self, req: &DefinitionsQuery) -> Result<Vec<Location>> {
		let backend = self.backend.as_ref();
		let upload_ids: Vec<i64> = req.uploads.iter().map(|upload| upload.id).collect();
		let calls = upload_ids.into_iter().map(|upload_id| {
			backend
				.definitions(DefinitionsRequest { position: req.position.clone(), upload_id })
				.map_err(move |source| crate::upstream(upload_id, source))
		});

		tracing::debug!(uploads = req.uploads.len(), "Fanning out definitions.");

		let per_upload: Vec<Vec<Location>> = self.fan_out(calls).try_collect().await?;

		Ok(per_upload.into_iter().flatten().collect())
	}
}

/// Keeps the first occurrence of each target span.
fn dedupe_locations(locations: Vec<Location>) -> Vec<Location> {
	let mut seen = HashSet::with_capacity(locations.len());

	locations
		.into_iter()
		.filter(|location| {
			let (repository, commit, path, range) = location.target();

			seen.insert((
				repository.map(str::to_string),
				commit.map(str::to_string),
				path.to_string(),
				range,
			))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use codeintel_domain::Range;

	fn location(upload_id: i64, path: &str, line: u32) -> Location {
		Location {
			upload_id,
			repository: None,
			commit: None,
			path: path.to_string(),
			range: Range::new(line, 0, line, 4),
		}
	}

	#[test]
	fn dedupe_keeps_first_seen_upload() {
		let deduped = dedupe_locations(vec![
			location(1, "a.go", 3),
			location(2, "b.go", 7),
			location(2, "a.go", 3),
		]);

		assert_eq!(deduped, vec![location(1, "a.go", 3), location(2, "b.go", 7)]);
	}
}
