/// Liveness probe.
use actix_web::HttpResponse;
use serde_json::json;

use crate::error::Result;
use crate::response::ApiResponse;

/// `GET /healthcheck`: no auth, no database round trip.
pub async fn healthcheck() -> Result<HttpResponse> {
    Ok(ApiResponse::ok(json!({}), "OK"))
}
