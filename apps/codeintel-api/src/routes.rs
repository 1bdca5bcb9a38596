use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::state::AppState;
use codeintel_domain::{Hover, ResultPage};
use codeintel_service::{DefinitionsQuery, Error as ServiceError, HoverQuery, ReferencesQuery};

#[derive(Debug, Serialize, Deserialize)]
pub struct HoverResponse {
	pub hover: Option<Hover>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::MalformedCursor { message } =>
				json_error(StatusCode::BAD_REQUEST, "malformed_cursor", message),
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message),
			err @ ServiceError::Upstream { .. } =>
				json_error(StatusCode::BAD_GATEWAY, "upstream_error", err.to_string()),
			ServiceError::Cancelled { message } =>
				json_error(StatusCode::GATEWAY_TIMEOUT, "cancelled", message),
			ServiceError::Internal { message } => {
				tracing::error!(error = %message, "Internal error while serving request.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal error.")
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/codeintel/definitions", post(definitions))
		.route("/v1/codeintel/references", post(references))
		.route("/v1/codeintel/hover", post(hover))
		.with_state(state)
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn definitions(
	State(state): State<AppState>,
	Json(payload): Json<DefinitionsQuery>,
) -> Result<Json<ResultPage>, ApiError> {
	let cancel = state.shutdown.child_token();
	let span = request_span("definitions", payload.uploads.len());
	let page = state.aggregator.definitions(payload, &cancel).instrument(span).await?;

	Ok(Json(page))
}

async fn references(
	State(state): State<AppState>,
	Json(payload): Json<ReferencesQuery>,
) -> Result<Json<ResultPage>, ApiError> {
	let cancel = state.shutdown.child_token();
	let span = request_span("references", payload.uploads.len());
	let page = state.aggregator.references(payload, &cancel).instrument(span).await?;

	Ok(Json(page))
}

async fn hover(
	State(state): State<AppState>,
	Json(payload): Json<HoverQuery>,
) -> Result<Json<HoverResponse>, ApiError> {
	let cancel = state.shutdown.child_token();
	let span = request_span("hover", payload.uploads.len());
	let hover = state.aggregator.hover(payload, &cancel).instrument(span).await?;

	Ok(Json(HoverResponse { hover }))
}

fn request_span(operation: &'static str, uploads: usize) -> tracing::Span {
	tracing::info_span!("codeintel_request", request_id = %Uuid::new_v4(), operation, uploads)
}
