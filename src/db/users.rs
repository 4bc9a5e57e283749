/// User database operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::User;

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, avatar_url, \
     cover_image_url, refresh_token, created_at, updated_at";

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
    pub avatar_url: &'a str,
    pub cover_image_url: Option<&'a str>,
}

pub async fn create_user(pool: &PgPool, new_user: NewUser<'_>) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, full_name, password_hash, avatar_url, cover_image_url) \
         VALUES (LOWER($1), $2, $3, $4, $5, $6) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(new_user.username)
    .bind(new_user.email)
    .bind(new_user.full_name)
    .bind(new_user.password_hash)
    .bind(new_user.avatar_url)
    .bind(new_user.cover_image_url)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Lookup by username or email with a single OR query, for login.
pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = LOWER($1) OR email = $1"
    ))
    .bind(identifier)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// True when another account already holds the username or email.
pub async fn identifier_taken(pool: &PgPool, username: &str, email: &str) -> Result<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = LOWER($1) OR email = $2)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

pub async fn set_refresh_token(pool: &PgPool, user_id: Uuid, token: &str) -> Result<()> {
    sqlx::query("UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn clear_refresh_token(pool: &PgPool, user_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE users SET refresh_token = NULL, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_password(pool: &PgPool, user_id: Uuid, password_hash: &str) -> Result<()> {
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_account(
    pool: &PgPool,
    user_id: Uuid,
    full_name: Option<&str>,
    email: Option<&str>,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET full_name = COALESCE($2, full_name), \
         email = COALESCE($3, email), updated_at = NOW() \
         WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(full_name)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Swap the avatar reference, returning the previous one so the caller can
/// clean up the old blob.
pub async fn update_avatar(pool: &PgPool, user_id: Uuid, avatar_url: &str) -> Result<String> {
    let old: String = sqlx::query_scalar(
        "UPDATE users u SET avatar_url = $2, updated_at = NOW() \
         FROM (SELECT id, avatar_url FROM users WHERE id = $1) prev \
         WHERE u.id = prev.id RETURNING prev.avatar_url",
    )
    .bind(user_id)
    .bind(avatar_url)
    .fetch_one(pool)
    .await?;

    Ok(old)
}

pub async fn update_cover_image(
    pool: &PgPool,
    user_id: Uuid,
    cover_image_url: &str,
) -> Result<Option<String>> {
    let old: Option<String> = sqlx::query_scalar(
        "UPDATE users u SET cover_image_url = $2, updated_at = NOW() \
         FROM (SELECT id, cover_image_url FROM users WHERE id = $1) prev \
         WHERE u.id = prev.id RETURNING prev.cover_image_url",
    )
    .bind(user_id)
    .bind(cover_image_url)
    .fetch_one(pool)
    .await?;

    Ok(old)
}

/// Append a video to the user's ordered watch history.
pub async fn record_watch(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<()> {
    sqlx::query("INSERT INTO watch_history (user_id, video_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}
