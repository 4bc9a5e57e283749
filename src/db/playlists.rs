/// Playlist database operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Playlist;
use crate::response::Pagination;

const PLAYLIST_COLUMNS: &str = "id, owner_id, name, description, video_ids, created_at, updated_at";

pub async fn insert(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    description: &str,
    video_ids: &[Uuid],
) -> Result<Playlist> {
    let playlist = sqlx::query_as::<_, Playlist>(&format!(
        "INSERT INTO playlists (owner_id, name, description, video_ids) \
         VALUES ($1, $2, $3, $4) RETURNING {PLAYLIST_COLUMNS}"
    ))
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .bind(video_ids)
    .fetch_one(pool)
    .await?;

    Ok(playlist)
}

/// A user's playlists, newest first.
pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid, pg: Pagination) -> Result<Vec<Playlist>> {
    let playlists = sqlx::query_as::<_, Playlist>(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE owner_id = $1 \
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(owner_id)
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(playlists)
}

/// Append a video to the ordered sequence. Duplicates are allowed.
pub async fn add_video(
    pool: &PgPool,
    playlist_id: Uuid,
    owner_id: Uuid,
    video_id: Uuid,
) -> Result<Option<Playlist>> {
    let playlist = sqlx::query_as::<_, Playlist>(&format!(
        "UPDATE playlists SET video_ids = array_append(video_ids, $3), updated_at = NOW() \
         WHERE id = $1 AND owner_id = $2 RETURNING {PLAYLIST_COLUMNS}"
    ))
    .bind(playlist_id)
    .bind(owner_id)
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(playlist)
}

/// Remove every occurrence of a video from the sequence.
pub async fn remove_video(
    pool: &PgPool,
    playlist_id: Uuid,
    owner_id: Uuid,
    video_id: Uuid,
) -> Result<Option<Playlist>> {
    let playlist = sqlx::query_as::<_, Playlist>(&format!(
        "UPDATE playlists SET video_ids = array_remove(video_ids, $3), updated_at = NOW() \
         WHERE id = $1 AND owner_id = $2 RETURNING {PLAYLIST_COLUMNS}"
    ))
    .bind(playlist_id)
    .bind(owner_id)
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(playlist)
}

pub async fn update(
    pool: &PgPool,
    playlist_id: Uuid,
    owner_id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Playlist>> {
    let playlist = sqlx::query_as::<_, Playlist>(&format!(
        "UPDATE playlists SET name = COALESCE($3, name), \
         description = COALESCE($4, description), updated_at = NOW() \
         WHERE id = $1 AND owner_id = $2 RETURNING {PLAYLIST_COLUMNS}"
    ))
    .bind(playlist_id)
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await?;

    Ok(playlist)
}

pub async fn delete(pool: &PgPool, playlist_id: Uuid, owner_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = $1 AND owner_id = $2")
        .bind(playlist_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
