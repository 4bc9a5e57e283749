/// Comment database operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Comment;

const COMMENT_COLUMNS: &str = "id, owner_id, video_id, content, created_at, updated_at";

pub async fn insert(pool: &PgPool, owner_id: Uuid, video_id: Uuid, content: &str) -> Result<Comment> {
    let comment = sqlx::query_as::<_, Comment>(&format!(
        "INSERT INTO comments (owner_id, video_id, content) VALUES ($1, $2, $3) \
         RETURNING {COMMENT_COLUMNS}"
    ))
    .bind(owner_id)
    .bind(video_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Update a comment's text; scoped to the owner.
pub async fn update(
    pool: &PgPool,
    comment_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Option<Comment>> {
    let comment = sqlx::query_as::<_, Comment>(&format!(
        "UPDATE comments SET content = $3, updated_at = NOW() \
         WHERE id = $1 AND owner_id = $2 RETURNING {COMMENT_COLUMNS}"
    ))
    .bind(comment_id)
    .bind(owner_id)
    .bind(content)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

pub async fn delete(pool: &PgPool, comment_id: Uuid, owner_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND owner_id = $2")
        .bind(comment_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists(pool: &PgPool, comment_id: Uuid) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1)")
        .bind(comment_id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}
