//! Response envelope shape over real HTTP dispatch.

use actix_web::body::to_bytes;
use actix_web::error::ResponseError;
use actix_web::{test, web, App, HttpResponse};
use serde_json::{json, Value};
use uuid::Uuid;

use videotube::error::{json_config, path_config, AppError};
use videotube::handlers::healthcheck;
use videotube::models::comment::CommentRequest;
use videotube::response::ApiResponse;

async fn echo_id(id: web::Path<Uuid>) -> HttpResponse {
    ApiResponse::ok(json!({ "id": *id }), "ok")
}

async fn echo_content(payload: web::Json<CommentRequest>) -> HttpResponse {
    ApiResponse::ok(json!({ "content": payload.content }), "ok")
}

#[actix_rt::test]
async fn healthcheck_returns_success_envelope() {
    let app = test::init_service(
        App::new().route("/api/v1/healthcheck", web::get().to(healthcheck::healthcheck)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/healthcheck")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "OK");
    assert!(body["data"].is_object());
}

#[actix_rt::test]
async fn error_envelope_carries_status_and_message() {
    let err = AppError::NotFound("Video not found".to_string());
    let resp = err.error_response();
    assert_eq!(resp.status(), 404);

    let bytes = to_bytes(resp.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Video not found");
    assert!(body["data"].is_null());
    assert_eq!(body["errors"], serde_json::json!([]));
}

#[actix_rt::test]
async fn malformed_path_id_renders_validation_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(path_config())
            .route("/items/{id}", web::get().to(echo_id)),
    )
    .await;

    let req = test::TestRequest::get().uri("/items/not-a-uuid").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert_eq!(body["errors"], json!([]));
}

#[actix_rt::test]
async fn malformed_json_body_renders_validation_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(json_config())
            .route("/comments", web::post().to(echo_content)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/comments")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}

#[actix_rt::test]
async fn validation_errors_are_bad_requests() {
    let err = AppError::Validation("Content is required".to_string());
    let resp = err.error_response();
    assert_eq!(resp.status(), 400);

    let bytes = to_bytes(resp.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["message"], "Content is required");
}
