pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Malformed cursor: {message}")]
	MalformedCursor { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Upload {upload_id} backend error: {source}")]
	Upstream {
		upload_id: i64,
		#[source]
		source: codeintel_providers::Error,
	},
	#[error("Cancelled: {message}")]
	Cancelled { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
