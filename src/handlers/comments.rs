/// Comment handlers
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::comment::CommentRequest;
use crate::response::{ApiResponse, PageQuery, Pagination};
use crate::views::feeds;
use crate::AppState;

/// `POST /comments/{videoId}`
pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    video_id: web::Path<Uuid>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();
    let content = payload.content.trim();

    payload
        .validate()
        .map_err(|_| AppError::Validation("Content is required".to_string()))?;
    if content.is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    if !db::videos::exists(&state.db, video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let comment = db::comments::insert(&state.db, user.0, video_id, content).await?;
    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

/// `GET /comments/{videoId}`: comment feed with embedded authors.
pub async fn get_video_comments(
    state: web::Data<AppState>,
    video_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let pg = Pagination::from_query(&query);
    let comments = feeds::video_comments(&state.db, video_id.into_inner(), pg).await?;
    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

/// `PATCH /comments/{commentId}`
pub async fn update_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let comment_id = comment_id.into_inner();
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    match db::comments::update(&state.db, comment_id, user.0, content).await? {
        Some(comment) => Ok(ApiResponse::ok(comment, "Comment updated successfully")),
        None if db::comments::exists(&state.db, comment_id).await? => Err(AppError::Forbidden(
            "You do not own this comment".to_string(),
        )),
        None => Err(AppError::NotFound("Comment not found".to_string())),
    }
}

/// `DELETE /comments/{commentId}`
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = comment_id.into_inner();

    if db::comments::delete(&state.db, comment_id, user.0).await? {
        return Ok(ApiResponse::ok(json!({}), "Comment deleted successfully"));
    }

    if db::comments::exists(&state.db, comment_id).await? {
        Err(AppError::Forbidden("You do not own this comment".to_string()))
    } else {
        Err(AppError::NotFound("Comment not found".to_string()))
    }
}
