/// Tweet database operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Tweet;
use crate::response::Pagination;

const TWEET_COLUMNS: &str = "id, owner_id, content, created_at, updated_at";

pub async fn insert(pool: &PgPool, owner_id: Uuid, content: &str) -> Result<Tweet> {
    let tweet = sqlx::query_as::<_, Tweet>(&format!(
        "INSERT INTO tweets (owner_id, content) VALUES ($1, $2) RETURNING {TWEET_COLUMNS}"
    ))
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(tweet)
}

/// A user's tweets, newest first.
pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid, pg: Pagination) -> Result<Vec<Tweet>> {
    let tweets = sqlx::query_as::<_, Tweet>(&format!(
        "SELECT {TWEET_COLUMNS} FROM tweets WHERE owner_id = $1 \
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(owner_id)
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(tweets)
}

pub async fn update(
    pool: &PgPool,
    tweet_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Option<Tweet>> {
    let tweet = sqlx::query_as::<_, Tweet>(&format!(
        "UPDATE tweets SET content = $3, updated_at = NOW() \
         WHERE id = $1 AND owner_id = $2 RETURNING {TWEET_COLUMNS}"
    ))
    .bind(tweet_id)
    .bind(owner_id)
    .bind(content)
    .fetch_optional(pool)
    .await?;

    Ok(tweet)
}

pub async fn delete(pool: &PgPool, tweet_id: Uuid, owner_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tweets WHERE id = $1 AND owner_id = $2")
        .bind(tweet_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists(pool: &PgPool, tweet_id: Uuid) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tweets WHERE id = $1)")
        .bind(tweet_id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}
