//! Composite pagination cursor.
//!
//! A cursor bundles one continuation token per upload that still has results.
//! On the wire it is standard base64 over a JSON object keyed by upload id,
//! e.g. `{"12":"page-2"}`. The empty string means "no cursor" and is never
//! produced for a non-empty map.

use std::{
	collections::{BTreeMap, btree_map},
	fmt,
};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{
	Deserialize, Deserializer, Serialize,
	de::{self, MapAccess, Visitor},
};

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursorMap(BTreeMap<i64, String>);
impl CursorMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn get(&self, upload_id: i64) -> Option<&str> {
		self.0.get(&upload_id).map(String::as_str)
	}

	pub fn contains(&self, upload_id: i64) -> bool {
		self.0.contains_key(&upload_id)
	}

	/// Records a continuation token. Empty tokens mean exhaustion and are dropped.
	pub fn insert(&mut self, upload_id: i64, token: impl Into<String>) {
		let token = token.into();

		if token.is_empty() {
			return;
		}

		self.0.insert(upload_id, token);
	}

	pub fn upload_ids(&self) -> impl Iterator<Item = i64> + '_ {
		self.0.keys().copied()
	}

	pub fn iter(&self) -> btree_map::Iter<'_, i64, String> {
		self.0.iter()
	}
}
impl FromIterator<(i64, String)> for CursorMap {
	fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
		let mut map = Self::new();

		for (upload_id, token) in iter {
			map.insert(upload_id, token);
		}

		map
	}
}

/// Serializes a cursor map into an opaque token.
pub fn encode(cursors: &CursorMap) -> Result<String> {
	if cursors.is_empty() {
		return Ok(String::new());
	}

	let payload = serde_json::to_vec(cursors)?;

	Ok(BASE64.encode(payload))
}

/// Reverses [`encode`]. An absent or empty token yields an empty map.
pub fn decode(token: Option<&str>) -> Result<CursorMap> {
	let Some(token) = token.filter(|token| !token.is_empty()) else {
		return Ok(CursorMap::new());
	};
	let payload = BASE64.decode(token)?;
	let DecodedTokens(raw) = serde_json::from_slice(&payload)?;

	if let Some((upload_id, _)) = raw.iter().find(|(_, token)| token.is_empty()) {
		return Err(Error::EmptyToken { upload_id: *upload_id });
	}

	Ok(CursorMap(raw))
}

/// Token map as found on the wire. Repeated upload ids are rejected.
struct DecodedTokens(BTreeMap<i64, String>);
impl<'de> Deserialize<'de> for DecodedTokens {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_map(DecodedTokensVisitor)
	}
}

struct DecodedTokensVisitor;
impl<'de> Visitor<'de> for DecodedTokensVisitor {
	type Value = DecodedTokens;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("a map of upload ids to continuation tokens")
	}

	fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
	where
		A: MapAccess<'de>,
	{
		let mut tokens = BTreeMap::new();

		while let Some((upload_id, token)) = access.next_entry::<i64, String>()? {
			if tokens.insert(upload_id, token).is_some() {
				return Err(de::Error::custom(format!("duplicate upload id {upload_id}")));
			}
		}

		Ok(DecodedTokens(tokens))
	}
}
