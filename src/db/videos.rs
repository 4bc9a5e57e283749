/// Video database operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Video;

const VIDEO_COLUMNS: &str = "id, owner_id, video_url, thumbnail_url, title, description, \
     duration, views, is_published, created_at, updated_at";

pub struct NewVideo<'a> {
    pub owner_id: Uuid,
    pub video_url: &'a str,
    pub thumbnail_url: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub duration: f64,
}

pub async fn insert(pool: &PgPool, new_video: NewVideo<'_>) -> Result<Video> {
    let video = sqlx::query_as::<_, Video>(&format!(
        "INSERT INTO videos (owner_id, video_url, thumbnail_url, title, description, duration) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {VIDEO_COLUMNS}"
    ))
    .bind(new_video.owner_id)
    .bind(new_video.video_url)
    .bind(new_video.thumbnail_url)
    .bind(new_video.title)
    .bind(new_video.description)
    .bind(new_video.duration)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

pub async fn find_by_id(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>> {
    let video = sqlx::query_as::<_, Video>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
    ))
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(video)
}

pub async fn update_metadata(
    pool: &PgPool,
    video_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    thumbnail_url: Option<&str>,
) -> Result<Video> {
    let video = sqlx::query_as::<_, Video>(&format!(
        "UPDATE videos SET title = COALESCE($2, title), \
         description = COALESCE($3, description), \
         thumbnail_url = COALESCE($4, thumbnail_url), \
         updated_at = NOW() \
         WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
    ))
    .bind(video_id)
    .bind(title)
    .bind(description)
    .bind(thumbnail_url)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

pub async fn delete(pool: &PgPool, video_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn toggle_publish(pool: &PgPool, video_id: Uuid) -> Result<Video> {
    let video = sqlx::query_as::<_, Video>(&format!(
        "UPDATE videos SET is_published = NOT is_published, updated_at = NOW() \
         WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
    ))
    .bind(video_id)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

pub async fn increment_views(pool: &PgPool, video_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn exists(pool: &PgPool, video_id: Uuid) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)")
        .bind(video_id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}
