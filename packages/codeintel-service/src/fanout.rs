use std::{future::Future, time::Duration};

use futures::{Stream, StreamExt, stream};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{Error, QueryAggregator, Result};

impl QueryAggregator {
	/// Drives per-upload calls concurrently and yields their results in input order.
	///
	/// Dropping the stream drops every call still in flight.
	pub(crate) fn fan_out<I, T>(&self, calls: I) -> impl Stream<Item = Result<T>>
	where
		I: IntoIterator,
		I::Item: Future<Output = Result<T>>,
	{
		stream::iter(calls).buffered(self.cfg.max_concurrency.max(1))
	}

	/// Runs one operation under the caller's cancellation token and the request deadline.
	pub(crate) async fn guarded<T, F>(
		&self,
		operation: &'static str,
		cancel: &CancellationToken,
		fut: F,
	) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		let timeout_ms = self.cfg.request_timeout_ms;

		tokio::select! {
			biased;

			_ = cancel.cancelled() => {
				tracing::info!(operation, "Request cancelled by caller.");

				Err(Error::Cancelled { message: format!("{operation} request was cancelled.") })
			},
			res = time::timeout(Duration::from_millis(timeout_ms), fut) => match res {
				Ok(res) => res,
				Err(_) => {
					tracing::warn!(operation, timeout_ms, "Request deadline exceeded.");

					Err(Error::Cancelled {
						message: format!("{operation} request timed out after {timeout_ms} ms."),
					})
				},
			},
		}
	}
}
