use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub backend: Backend,
	#[serde(default)]
	pub query: Query,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Remote service that answers position queries for a single upload.
#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
	pub api_base: String,
	/// Optional. Sent as a bearer token when present.
	#[serde(default)]
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Query {
	/// Upper bound for a whole fan-out, including every per-upload call.
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
	/// Maximum number of per-upload backend calls in flight for one request.
	#[serde(default = "default_max_concurrency")]
	pub max_concurrency: usize,
	/// Largest per-upload page size a caller may ask for.
	#[serde(default = "default_max_page_size")]
	pub max_page_size: u32,
	#[serde(default)]
	pub dedupe_definitions: bool,
}
impl Default for Query {
	fn default() -> Self {
		Self {
			request_timeout_ms: default_request_timeout_ms(),
			max_concurrency: default_max_concurrency(),
			max_page_size: default_max_page_size(),
			dedupe_definitions: false,
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_request_timeout_ms() -> u64 {
	15_000
}

fn default_max_concurrency() -> usize {
	8
}

fn default_max_page_size() -> u32 {
	500
}
