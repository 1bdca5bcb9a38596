pub mod definitions;
pub mod hover;
pub mod references;

mod error;
mod fanout;

pub use definitions::DefinitionsQuery;
pub use error::{Error, Result};
pub use hover::HoverQuery;
pub use references::ReferencesQuery;

use std::{collections::HashSet, sync::Arc};

use codeintel_config::Query;
use codeintel_domain::{PositionQuery, Upload};
use codeintel_providers::UploadBackend;

/// Fans position queries out to every candidate upload and merges the answers.
///
/// Holds no per-request state; pagination state travels in the cursor.
pub struct QueryAggregator {
	cfg: Query,
	backend: Arc<dyn UploadBackend>,
}
impl QueryAggregator {
	pub fn new(cfg: Query, backend: Arc<dyn UploadBackend>) -> Self {
		Self { cfg, backend }
	}

	pub fn config(&self) -> &Query {
		&self.cfg
	}
}

pub(crate) fn validate_target(position: &PositionQuery, uploads: &[Upload]) -> Result<()> {
	if let Some(field) = position.blank_field() {
		return Err(Error::InvalidRequest { message: format!("{field} must be non-empty.") });
	}

	let mut seen = HashSet::with_capacity(uploads.len());

	for upload in uploads {
		if !seen.insert(upload.id) {
			return Err(Error::InvalidRequest {
				message: format!("Upload {} appears more than once.", upload.id),
			});
		}
	}

	Ok(())
}

pub(crate) fn upstream(upload_id: i64, source: codeintel_providers::Error) -> Error {
	tracing::warn!(upload_id, error = %source, "Upload backend call failed.");

	Error::Upstream { upload_id, source }
}
