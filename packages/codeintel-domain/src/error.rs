pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cursor is not valid base64: {0}")]
	CursorEncoding(#[from] base64::DecodeError),
	#[error("Cursor payload is not a map of upload ids to tokens: {0}")]
	CursorPayload(#[from] serde_json::Error),
	#[error("Cursor carries an empty continuation token for upload {upload_id}.")]
	EmptyToken { upload_id: i64 },
}
