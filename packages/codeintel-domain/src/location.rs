use serde::{Deserialize, Serialize};

/// A source position inside one file at one commit.
///
/// `line` and `character` are zero-based; `character` counts UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionQuery {
	pub repository: String,
	pub commit: String,
	pub path: String,
	pub line: u32,
	pub character: u32,
}
impl PositionQuery {
	/// Returns the name of the first identifying field that is blank.
	pub fn blank_field(&self) -> Option<&'static str> {
		[
			("repository", self.repository.as_str()),
			("commit", self.commit.as_str()),
			("path", self.path.as_str()),
		]
		.into_iter()
		.find_map(|(name, value)| value.trim().is_empty().then_some(name))
	}
}

/// One independently built analysis artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
	pub id: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub commit: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub root: Option<String>,
}
impl Upload {
	pub fn new(id: i64) -> Self {
		Self { id, commit: None, root: None }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
	pub line: u32,
	pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
	pub start: Position,
	pub end: Position,
}
impl Range {
	pub fn new(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
		Self {
			start: Position { line: start_line, character: start_character },
			end: Position { line: end_line, character: end_character },
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
	/// Upload that produced this result. Kept for provenance.
	pub upload_id: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub repository: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub commit: Option<String>,
	pub path: String,
	pub range: Range,
}
impl Location {
	/// Identity of the pointed-at source span, ignoring which upload reported it.
	pub fn target(&self) -> (Option<&str>, Option<&str>, &str, Range) {
		(self.repository.as_deref(), self.commit.as_deref(), self.path.as_str(), self.range)
	}
}
