use std::{collections::HashMap, sync::Mutex, time::Duration};

use tokio::time;

use codeintel_domain::{Hover, Location, PositionQuery, Range};
use codeintel_providers::{
	BoxFuture, DefinitionsRequest, Error, HoverRequest, ReferencesPage, ReferencesRequest, Result,
	UploadBackend,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
	Definitions(DefinitionsRequest),
	References(ReferencesRequest),
	Hover(HoverRequest),
}
impl RecordedCall {
	pub fn upload_id(&self) -> i64 {
		match self {
			Self::Definitions(req) => req.upload_id,
			Self::References(req) => req.upload_id,
			Self::Hover(req) => req.upload_id,
		}
	}
}

#[derive(Debug, Clone)]
enum Scripted<T> {
	Ok(T),
	Fail(String),
}
impl<T: Clone> Scripted<T> {
	fn resolve(&self) -> Result<T> {
		match self {
			Self::Ok(value) => Ok(value.clone()),
			Self::Fail(message) => Err(Error::Remote { message: message.clone() }),
		}
	}
}

/// Scripted upload backend that records every call it receives.
///
/// Anything not scripted answers with an empty result. Reference pages are
/// keyed by the continuation token the caller sends, so multi-page sessions
/// can be scripted up front.
#[derive(Default)]
pub struct StubBackend {
	definitions: HashMap<i64, Scripted<Vec<Location>>>,
	references: HashMap<(i64, Option<String>), Scripted<ReferencesPage>>,
	hover: HashMap<i64, Scripted<Hover>>,
	delays: HashMap<i64, Duration>,
	calls: Mutex<Vec<RecordedCall>>,
}
impl StubBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_definitions(mut self, upload_id: i64, locations: Vec<Location>) -> Self {
		self.definitions.insert(upload_id, Scripted::Ok(locations));

		self
	}

	pub fn with_definitions_failure(mut self, upload_id: i64, message: &str) -> Self {
		self.definitions.insert(upload_id, Scripted::Fail(message.to_string()));

		self
	}

	pub fn with_references_page(
		mut self,
		upload_id: i64,
		cursor: Option<&str>,
		locations: Vec<Location>,
		next_cursor: Option<&str>,
	) -> Self {
		let page = ReferencesPage { locations, next_cursor: next_cursor.map(str::to_string) };

		self.references.insert((upload_id, cursor.map(str::to_string)), Scripted::Ok(page));

		self
	}

	pub fn with_references_failure(
		mut self,
		upload_id: i64,
		cursor: Option<&str>,
		message: &str,
	) -> Self {
		self.references
			.insert((upload_id, cursor.map(str::to_string)), Scripted::Fail(message.to_string()));

		self
	}

	pub fn with_hover(mut self, upload_id: i64, text: &str) -> Self {
		let hover = Hover { text: text.to_string(), range: Some(Range::new(0, 0, 0, 1)) };

		self.hover.insert(upload_id, Scripted::Ok(hover));

		self
	}

	pub fn with_hover_failure(mut self, upload_id: i64, message: &str) -> Self {
		self.hover.insert(upload_id, Scripted::Fail(message.to_string()));

		self
	}

	/// Delays every answer from `upload_id`.
	pub fn with_delay(mut self, upload_id: i64, delay: Duration) -> Self {
		self.delays.insert(upload_id, delay);

		self
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn queried_uploads(&self) -> Vec<i64> {
		self.calls().iter().map(RecordedCall::upload_id).collect()
	}

	pub fn reference_calls(&self) -> Vec<ReferencesRequest> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				RecordedCall::References(req) => Some(req),
				_ => None,
			})
			.collect()
	}

	fn record(&self, call: RecordedCall) {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).push(call);
	}

	fn answer<T>(&self, upload_id: i64, result: Result<T>) -> BoxFuture<'_, Result<T>>
	where
		T: Send + 'static,
	{
		let delay = self.delays.get(&upload_id).copied();

		Box::pin(async move {
			if let Some(delay) = delay {
				time::sleep(delay).await;
			}

			result
		})
	}
}
impl UploadBackend for StubBackend {
	fn definitions(&self, req: DefinitionsRequest) -> BoxFuture<'_, Result<Vec<Location>>> {
		let upload_id = req.upload_id;
		let result =
			self.definitions.get(&upload_id).map(Scripted::resolve).unwrap_or(Ok(Vec::new()));

		self.record(RecordedCall::Definitions(req));
		self.answer(upload_id, result)
	}

	fn references(&self, req: ReferencesRequest) -> BoxFuture<'_, Result<ReferencesPage>> {
		let upload_id = req.upload_id;
		let result = self
			.references
			.get(&(upload_id, req.cursor.clone()))
			.map(Scripted::resolve)
			.unwrap_or_else(|| Ok(ReferencesPage::default()));

		self.record(RecordedCall::References(req));
		self.answer(upload_id, result)
	}

	fn hover(&self, req: HoverRequest) -> BoxFuture<'_, Result<Hover>> {
		let upload_id = req.upload_id;
		let result =
			self.hover.get(&upload_id).map(Scripted::resolve).unwrap_or(Ok(Hover::default()));

		self.record(RecordedCall::Hover(req));
		self.answer(upload_id, result)
	}
}

pub fn position() -> PositionQuery {
	PositionQuery {
		repository: "github.com/acme/widgets".to_string(),
		commit: "4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string(),
		path: "internal/server/handler.go".to_string(),
		line: 41,
		character: 17,
	}
}

pub fn location(upload_id: i64, path: &str, line: u32) -> Location {
	Location {
		upload_id,
		repository: None,
		commit: None,
		path: path.to_string(),
		range: Range::new(line, 0, line, 10),
	}
}
