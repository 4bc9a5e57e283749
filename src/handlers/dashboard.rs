/// Channel dashboard handlers: owner-facing stats and video list.
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::response::{ApiResponse, PageQuery, Pagination};
use crate::views::feeds;
use crate::AppState;

/// `GET /dashboard/stats`
pub async fn get_channel_stats(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let stats = feeds::channel_stats(&state.db, user.0).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

/// `GET /dashboard/videos`: every video of the caller's channel,
/// published or not.
pub async fn get_channel_videos(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let pg = Pagination::from_query(&query);
    let videos = feeds::channel_videos(&state.db, user.0, pg).await?;
    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}
