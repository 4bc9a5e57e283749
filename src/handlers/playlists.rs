/// Playlist handlers
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::playlist::{CreatePlaylistRequest, UpdatePlaylistRequest};
use crate::response::{ApiResponse, PageQuery, Pagination};
use crate::views::feeds;
use crate::AppState;

/// `POST /playlist`
pub async fn create_playlist(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<CreatePlaylistRequest>,
) -> Result<HttpResponse> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if payload.videos.is_empty() {
        return Err(AppError::Validation(
            "At least one video is required to create a playlist".to_string(),
        ));
    }

    let playlist = db::playlists::insert(
        &state.db,
        user.0,
        name,
        payload.description.trim(),
        &payload.videos,
    )
    .await?;

    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

/// `GET /playlist/{playlistId}`: playlist detail with embedded owner.
pub async fn get_playlist(
    state: web::Data<AppState>,
    playlist_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let playlist = feeds::playlist_detail(&state.db, playlist_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

/// `GET /playlist/user/{userId}`: a user's playlists, newest first.
pub async fn get_user_playlists(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let pg = Pagination::from_query(&query);
    let playlists = db::playlists::list_by_owner(&state.db, user_id.into_inner(), pg).await?;
    Ok(ApiResponse::ok(playlists, "Playlists fetched successfully"))
}

/// `PATCH /playlist/add/{videoId}/{playlistId}`
pub async fn add_video_to_playlist(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (video_id, playlist_id) = path.into_inner();

    if !db::videos::exists(&state.db, video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let playlist = db::playlists::add_video(&state.db, playlist_id, user.0, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(ApiResponse::ok(playlist, "Video added to playlist successfully"))
}

/// `PATCH /playlist/remove/{videoId}/{playlistId}`
pub async fn remove_video_from_playlist(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (video_id, playlist_id) = path.into_inner();

    let playlist = db::playlists::remove_video(&state.db, playlist_id, user.0, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(ApiResponse::ok(playlist, "Video removed from playlist successfully"))
}

/// `PATCH /playlist/{playlistId}`
pub async fn update_playlist(
    state: web::Data<AppState>,
    user: AuthUser,
    playlist_id: web::Path<Uuid>,
    payload: web::Json<UpdatePlaylistRequest>,
) -> Result<HttpResponse> {
    let name = payload.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let description = payload.description.as_deref().map(str::trim);

    if name.is_none() && description.is_none() {
        return Err(AppError::Validation(
            "Name or description is required".to_string(),
        ));
    }

    let playlist = db::playlists::update(
        &state.db,
        playlist_id.into_inner(),
        user.0,
        name,
        description,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

/// `DELETE /playlist/{playlistId}`
pub async fn delete_playlist(
    state: web::Data<AppState>,
    user: AuthUser,
    playlist_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if db::playlists::delete(&state.db, playlist_id.into_inner(), user.0).await? {
        Ok(ApiResponse::ok(json!({}), "Playlist deleted successfully"))
    } else {
        Err(AppError::NotFound("Playlist not found".to_string()))
    }
}
