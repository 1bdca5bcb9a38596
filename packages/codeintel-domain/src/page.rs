use serde::{Deserialize, Serialize};

use crate::{Location, Range};

/// Merged answer for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
	pub locations: Vec<Location>,
	/// Opaque token for the next page. `None` once every upload is exhausted.
	pub end_cursor: Option<String>,
}
impl ResultPage {
	pub fn complete(locations: Vec<Location>) -> Self {
		Self { locations, end_cursor: None }
	}

	pub fn has_next_page(&self) -> bool {
		self.end_cursor.is_some()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hover {
	pub text: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub range: Option<Range>,
}
impl Hover {
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}
