/// Tweet handlers
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::tweet::TweetRequest;
use crate::response::{ApiResponse, PageQuery, Pagination};
use crate::AppState;

/// `POST /tweets`
pub async fn create_tweet(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<TweetRequest>,
) -> Result<HttpResponse> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let tweet = db::tweets::insert(&state.db, user.0, content).await?;
    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// `GET /tweets/user`: the caller's tweets, newest first.
pub async fn get_user_tweets(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let pg = Pagination::from_query(&query);
    let tweets = db::tweets::list_by_owner(&state.db, user.0, pg).await?;
    Ok(ApiResponse::ok(tweets, "User tweets fetched successfully"))
}

/// `PATCH /tweets/{tweetId}`
pub async fn update_tweet(
    state: web::Data<AppState>,
    user: AuthUser,
    tweet_id: web::Path<Uuid>,
    payload: web::Json<TweetRequest>,
) -> Result<HttpResponse> {
    let tweet_id = tweet_id.into_inner();
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    match db::tweets::update(&state.db, tweet_id, user.0, content).await? {
        Some(tweet) => Ok(ApiResponse::ok(tweet, "Tweet updated successfully")),
        None if db::tweets::exists(&state.db, tweet_id).await? => {
            Err(AppError::Forbidden("You do not own this tweet".to_string()))
        }
        None => Err(AppError::NotFound("Tweet not found".to_string())),
    }
}

/// `DELETE /tweets/{tweetId}`
pub async fn delete_tweet(
    state: web::Data<AppState>,
    user: AuthUser,
    tweet_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tweet_id = tweet_id.into_inner();

    if db::tweets::delete(&state.db, tweet_id, user.0).await? {
        return Ok(ApiResponse::ok(json!({}), "Tweet deleted successfully"));
    }

    if db::tweets::exists(&state.db, tweet_id).await? {
        Err(AppError::Forbidden("You do not own this tweet".to_string()))
    } else {
        Err(AppError::NotFound("Tweet not found".to_string()))
    }
}
