/// Subscription handlers
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::db;
use crate::db::toggle::ToggleOutcome;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::response::{ApiResponse, PageQuery, Pagination};
use crate::views::feeds;
use crate::AppState;

/// `POST /subscriptions/c/{channelId}`: subscribe/unsubscribe toggle.
pub async fn toggle_subscription(
    state: web::Data<AppState>,
    user: AuthUser,
    channel_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = channel_id.into_inner();

    if channel_id == user.0 {
        return Err(AppError::Validation(
            "You cannot subscribe to your own channel".to_string(),
        ));
    }

    if db::users::find_by_id(&state.db, channel_id).await?.is_none() {
        return Err(AppError::NotFound("Channel not found".to_string()));
    }

    match db::subscriptions::toggle(&state.db, user.0, channel_id).await? {
        ToggleOutcome::Added(subscription) => {
            Ok(ApiResponse::ok(subscription, "Subscription added successfully"))
        }
        ToggleOutcome::Removed => {
            Ok(ApiResponse::ok(json!({}), "Subscription removed successfully"))
        }
    }
}

/// `GET /subscriptions/c/{channelId}`: a channel's subscriber list;
/// self-only.
pub async fn get_channel_subscribers(
    state: web::Data<AppState>,
    user: AuthUser,
    channel_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let channel_id = channel_id.into_inner();
    if channel_id != user.0 {
        return Err(AppError::Forbidden(
            "You are not authorized to view this channel's subscribers".to_string(),
        ));
    }

    let pg = Pagination::from_query(&query);
    let subscribers = feeds::channel_subscribers(&state.db, channel_id, pg).await?;
    Ok(ApiResponse::ok(subscribers, "Channel subscribers fetched successfully"))
}

/// `GET /subscriptions/s/{subscriberId}`: channels a user subscribes to;
/// self-only.
pub async fn get_subscribed_channels(
    state: web::Data<AppState>,
    user: AuthUser,
    subscriber_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let subscriber_id = subscriber_id.into_inner();
    if subscriber_id != user.0 {
        return Err(AppError::Forbidden(
            "You are not authorized to view these subscriptions".to_string(),
        ));
    }

    let pg = Pagination::from_query(&query);
    let channels = feeds::subscribed_channels(&state.db, subscriber_id, pg).await?;
    Ok(ApiResponse::ok(channels, "Subscribed channels fetched successfully"))
}
