use std::sync::Arc;

use codeintel_config::{Config, Query};
use codeintel_providers::{HttpUploadBackend, UploadBackend};
use codeintel_service::QueryAggregator;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
	pub aggregator: Arc<QueryAggregator>,
	/// Parent of every request token. Cancelled once the server starts shutting down.
	pub shutdown: CancellationToken,
}
impl AppState {
	pub fn new(config: &Config) -> color_eyre::Result<Self> {
		let backend = HttpUploadBackend::new(&config.backend)?;

		Ok(Self::with_backend(config.query.clone(), Arc::new(backend)))
	}

	pub fn with_backend(query: Query, backend: Arc<dyn UploadBackend>) -> Self {
		Self {
			aggregator: Arc::new(QueryAggregator::new(query, backend)),
			shutdown: CancellationToken::new(),
		}
	}
}
