/// Like handlers
///
/// One toggle shape for all three target kinds; the target is validated
/// before the atomic toggle in the store.
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::db;
use crate::db::toggle::ToggleOutcome;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::LikeTarget;
use crate::response::{ApiResponse, PageQuery, Pagination};
use crate::views::feeds;
use crate::AppState;

async fn toggle(state: &AppState, user: AuthUser, target: LikeTarget) -> Result<HttpResponse> {
    let exists = match target {
        LikeTarget::Video(id) => db::videos::exists(&state.db, id).await?,
        LikeTarget::Comment(id) => db::comments::exists(&state.db, id).await?,
        LikeTarget::Tweet(id) => db::tweets::exists(&state.db, id).await?,
    };
    if !exists {
        return Err(AppError::NotFound(format!(
            "{} not found",
            capitalize(target.kind())
        )));
    }

    match db::likes::toggle(&state.db, user.0, target).await? {
        ToggleOutcome::Added(like) => Ok(ApiResponse::ok(
            like,
            format!("{} like added successfully", capitalize(target.kind())),
        )),
        ToggleOutcome::Removed => Ok(ApiResponse::ok(
            json!({}),
            format!("{} like removed successfully", capitalize(target.kind())),
        )),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `POST /likes/toggle/v/{videoId}`
pub async fn toggle_video_like(
    state: web::Data<AppState>,
    user: AuthUser,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    toggle(&state, user, LikeTarget::Video(video_id.into_inner())).await
}

/// `POST /likes/toggle/c/{commentId}`
pub async fn toggle_comment_like(
    state: web::Data<AppState>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    toggle(&state, user, LikeTarget::Comment(comment_id.into_inner())).await
}

/// `POST /likes/toggle/t/{tweetId}`
pub async fn toggle_tweet_like(
    state: web::Data<AppState>,
    user: AuthUser,
    tweet_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    toggle(&state, user, LikeTarget::Tweet(tweet_id.into_inner())).await
}

/// `GET /likes/videos`: videos the caller has liked.
pub async fn get_liked_videos(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let pg = Pagination::from_query(&query);
    let videos = feeds::liked_videos(&state.db, user.0, pg).await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
