use std::{sync::Arc, time::Duration};

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use codeintel_api::{routes, state::AppState};
use codeintel_config::Query;
use codeintel_domain::cursor;
use codeintel_testkit::{StubBackend, location};

fn app(backend: StubBackend) -> Router {
	routes::router(AppState::with_backend(Query::default(), Arc::new(backend)))
}

fn target(uploads: &[i64]) -> Value {
	json!({
		"repository": "github.com/acme/widgets",
		"commit": "deadbeef",
		"path": "cmd/main.go",
		"line": 10,
		"character": 4,
		"uploads": uploads.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>(),
	})
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri(uri)
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call route.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = serde_json::from_slice(&body).expect("Failed to parse response.");

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let response = app(StubBackend::new())
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn definitions_return_locations_without_cursor() {
	let backend = StubBackend::new()
		.with_definitions(1, vec![location(1, "a.go", 3)])
		.with_definitions(2, vec![location(2, "b.go", 8)]);
	let (status, json) =
		post_json(app(backend), "/v1/codeintel/definitions", target(&[1, 2])).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["locations"][0]["path"], "a.go");
	assert_eq!(json["locations"][1]["upload_id"], 2);
	assert_eq!(json["end_cursor"], Value::Null);
}

#[tokio::test]
async fn references_hand_back_a_decodable_end_cursor() {
	let backend = StubBackend::new()
		.with_references_page(1, None, vec![location(1, "a.go", 1)], Some("next-a"))
		.with_references_page(2, None, vec![location(2, "b.go", 1)], None);
	let mut payload = target(&[1, 2]);

	payload["first"] = json!(10);

	let (status, json) = post_json(app(backend), "/v1/codeintel/references", payload).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["locations"].as_array().map(Vec::len), Some(2));

	let end_cursor = json["end_cursor"].as_str().expect("Expected an end cursor.");
	let decoded = cursor::decode(Some(end_cursor)).expect("End cursor must decode.");

	assert_eq!(decoded.get(1), Some("next-a"));
	assert!(!decoded.contains(2));
}

#[tokio::test]
async fn malformed_cursor_is_a_client_error() {
	let mut payload = target(&[1]);

	payload["after"] = json!("not base64!");

	let (status, json) =
		post_json(app(StubBackend::new()), "/v1/codeintel/references", payload).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "malformed_cursor");
}

#[tokio::test]
async fn invalid_page_size_is_a_client_error() {
	let mut payload = target(&[1]);

	payload["first"] = json!(0);

	let (status, json) =
		post_json(app(StubBackend::new()), "/v1/codeintel/references", payload).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn upstream_failures_map_to_bad_gateway() {
	let backend = StubBackend::new().with_definitions_failure(7, "index unavailable");
	let (status, json) = post_json(app(backend), "/v1/codeintel/definitions", target(&[7])).await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "upstream_error");
	assert!(
		json["message"].as_str().is_some_and(|message| message.contains("Upload 7")),
		"Unexpected body: {json}"
	);
}

#[tokio::test]
async fn hover_without_text_is_null() {
	let (status, json) =
		post_json(app(StubBackend::new()), "/v1/codeintel/hover", target(&[1, 2])).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["hover"], Value::Null);
}

#[tokio::test]
async fn hover_returns_first_non_empty_text() {
	let backend = StubBackend::new().with_hover(1, "").with_hover(2, "func Widget()");
	let (status, json) = post_json(app(backend), "/v1/codeintel/hover", target(&[1, 2])).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["hover"]["text"], "func Widget()");
}

#[tokio::test]
async fn shutdown_cancels_in_flight_requests() {
	let backend = StubBackend::new()
		.with_definitions(1, vec![location(1, "a.go", 3)])
		.with_delay(1, Duration::from_secs(5));
	let state = AppState::with_backend(Query::default(), Arc::new(backend));
	let shutdown = state.shutdown.clone();

	tokio::spawn(async move {
		tokio::time::sleep(Duration::from_millis(20)).await;
		shutdown.cancel();
	});

	let (status, json) =
		post_json(routes::router(state), "/v1/codeintel/definitions", target(&[1])).await;

	assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
	assert_eq!(json["error_code"], "cancelled");
}
