/// Feed queries: one SQL statement per feed, owner embedded via LEFT JOIN.
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::response::Pagination;
use crate::views::types::{
    ChannelProfile, ChannelStats, ChannelSummary, CommentView, OwnerSummary, PlaylistView,
    VideoView,
};

/// Flattened row shape for video feeds; `owner_*` columns are nullable so a
/// dangling owner reference degrades to an empty embed.
#[derive(Debug, FromRow)]
struct VideoRow {
    id: Uuid,
    video_url: String,
    thumbnail_url: String,
    title: String,
    description: String,
    duration: f64,
    views: i64,
    created_at: DateTime<Utc>,
    owner_id: Option<Uuid>,
    owner_username: Option<String>,
    owner_avatar: Option<String>,
    owner_full_name: Option<String>,
}

impl VideoRow {
    fn into_view(self) -> VideoView {
        let owner = embed_owner(
            self.owner_id,
            self.owner_username,
            self.owner_avatar,
            self.owner_full_name,
        );
        VideoView {
            id: self.id,
            video_url: self.video_url,
            thumbnail_url: self.thumbnail_url,
            title: self.title,
            description: self.description,
            duration: self.duration,
            views: self.views,
            created_at: self.created_at,
            owner,
        }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: Uuid,
    video_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: Option<Uuid>,
    owner_username: Option<String>,
    owner_avatar: Option<String>,
    owner_full_name: Option<String>,
}

fn embed_owner(
    id: Option<Uuid>,
    username: Option<String>,
    avatar: Option<String>,
    full_name: Option<String>,
) -> Option<OwnerSummary> {
    match (id, username, avatar) {
        (Some(id), Some(username), Some(avatar)) => Some(OwnerSummary {
            id,
            username,
            avatar,
            full_name,
        }),
        _ => None,
    }
}

/// Comments on a video, newest first, author embedded.
pub async fn video_comments(
    pool: &PgPool,
    video_id: Uuid,
    pg: Pagination,
) -> Result<Vec<CommentView>> {
    let rows = sqlx::query_as::<_, CommentRow>(
        "SELECT c.id, c.video_id, c.content, c.created_at, c.updated_at, \
                u.id AS owner_id, u.username AS owner_username, \
                u.avatar_url AS owner_avatar, u.full_name AS owner_full_name \
         FROM comments c \
         LEFT JOIN users u ON u.id = c.owner_id \
         WHERE c.video_id = $1 \
         ORDER BY c.created_at DESC, c.id DESC \
         LIMIT $2 OFFSET $3",
    )
    .bind(video_id)
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| CommentView {
            id: r.id,
            video_id: r.video_id,
            content: r.content,
            created_at: r.created_at,
            updated_at: r.updated_at,
            owner: embed_owner(r.owner_id, r.owner_username, r.owner_avatar, r.owner_full_name),
        })
        .collect())
}

/// Videos a user has liked, most recently liked first. Likes whose target
/// video no longer exists drop out of the page; a missing video owner only
/// empties the embed.
pub async fn liked_videos(pool: &PgPool, user_id: Uuid, pg: Pagination) -> Result<Vec<VideoView>> {
    let rows = sqlx::query_as::<_, VideoRow>(
        "SELECT v.id, v.video_url, v.thumbnail_url, v.title, v.description, \
                v.duration, v.views, v.created_at, \
                u.id AS owner_id, u.username AS owner_username, \
                u.avatar_url AS owner_avatar, u.full_name AS owner_full_name \
         FROM likes l \
         JOIN videos v ON v.id = l.target_id \
         LEFT JOIN users u ON u.id = v.owner_id \
         WHERE l.user_id = $1 AND l.target_kind = 'video' \
         ORDER BY l.created_at DESC, l.id DESC \
         LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(VideoRow::into_view).collect())
}

/// All published videos, newest first, owner embedded as (username, avatar).
pub async fn published_videos(pool: &PgPool, pg: Pagination) -> Result<Vec<VideoView>> {
    let rows = sqlx::query_as::<_, VideoRow>(
        "SELECT v.id, v.video_url, v.thumbnail_url, v.title, v.description, \
                v.duration, v.views, v.created_at, \
                u.id AS owner_id, u.username AS owner_username, \
                u.avatar_url AS owner_avatar, NULL::TEXT AS owner_full_name \
         FROM videos v \
         LEFT JOIN users u ON u.id = v.owner_id \
         WHERE v.is_published \
         ORDER BY v.created_at DESC, v.id DESC \
         LIMIT $1 OFFSET $2",
    )
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(VideoRow::into_view).collect())
}

/// A channel's own videos (published or not), newest first, for the
/// dashboard.
pub async fn channel_videos(pool: &PgPool, owner_id: Uuid, pg: Pagination) -> Result<Vec<VideoView>> {
    let rows = sqlx::query_as::<_, VideoRow>(
        "SELECT v.id, v.video_url, v.thumbnail_url, v.title, v.description, \
                v.duration, v.views, v.created_at, \
                u.id AS owner_id, u.username AS owner_username, \
                u.avatar_url AS owner_avatar, u.full_name AS owner_full_name \
         FROM videos v \
         LEFT JOIN users u ON u.id = v.owner_id \
         WHERE v.owner_id = $1 \
         ORDER BY v.created_at DESC, v.id DESC \
         LIMIT $2 OFFSET $3",
    )
    .bind(owner_id)
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(VideoRow::into_view).collect())
}

/// Playlist detail with its owner embedded.
pub async fn playlist_detail(pool: &PgPool, playlist_id: Uuid) -> Result<Option<PlaylistView>> {
    #[derive(FromRow)]
    struct Row {
        id: Uuid,
        name: String,
        description: String,
        video_ids: Vec<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        owner_id: Option<Uuid>,
        owner_username: Option<String>,
        owner_avatar: Option<String>,
        owner_full_name: Option<String>,
    }

    let row = sqlx::query_as::<_, Row>(
        "SELECT p.id, p.name, p.description, p.video_ids, p.created_at, p.updated_at, \
                u.id AS owner_id, u.username AS owner_username, \
                u.avatar_url AS owner_avatar, u.full_name AS owner_full_name \
         FROM playlists p \
         LEFT JOIN users u ON u.id = p.owner_id \
         WHERE p.id = $1",
    )
    .bind(playlist_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| PlaylistView {
        id: r.id,
        name: r.name,
        description: r.description,
        video_ids: r.video_ids,
        created_at: r.created_at,
        updated_at: r.updated_at,
        owner: embed_owner(r.owner_id, r.owner_username, r.owner_avatar, r.owner_full_name),
    }))
}

/// Flattened list of a channel's subscribers, oldest subscription first.
pub async fn channel_subscribers(
    pool: &PgPool,
    channel_id: Uuid,
    pg: Pagination,
) -> Result<Vec<OwnerSummary>> {
    let subscribers = sqlx::query_as::<_, OwnerSummary>(
        "SELECT u.id, u.username, u.avatar_url AS avatar, u.full_name \
         FROM subscriptions s \
         JOIN users u ON u.id = s.subscriber_id \
         WHERE s.channel_id = $1 \
         ORDER BY s.created_at ASC, s.id ASC \
         LIMIT $2 OFFSET $3",
    )
    .bind(channel_id)
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(subscribers)
}

/// Flattened list of channels a user subscribes to, oldest first.
pub async fn subscribed_channels(
    pool: &PgPool,
    subscriber_id: Uuid,
    pg: Pagination,
) -> Result<Vec<ChannelSummary>> {
    let channels = sqlx::query_as::<_, ChannelSummary>(
        "SELECT u.id, u.username, u.avatar_url AS avatar \
         FROM subscriptions s \
         JOIN users u ON u.id = s.channel_id \
         WHERE s.subscriber_id = $1 \
         ORDER BY s.created_at ASC, s.id ASC \
         LIMIT $2 OFFSET $3",
    )
    .bind(subscriber_id)
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(channels)
}

/// Channel profile with subscriber counts and the viewer's subscription
/// state, resolved in one statement.
pub async fn channel_profile(
    pool: &PgPool,
    username: &str,
    viewer_id: Uuid,
) -> Result<Option<ChannelProfile>> {
    let profile = sqlx::query_as::<_, ChannelProfile>(
        "SELECT u.id, u.username, u.email, u.full_name, \
                u.avatar_url AS avatar, u.cover_image_url AS cover_image, \
                (SELECT COUNT(*) FROM subscriptions WHERE channel_id = u.id) AS subscriber_count, \
                (SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = u.id) AS subscribed_to_count, \
                EXISTS(SELECT 1 FROM subscriptions \
                       WHERE channel_id = u.id AND subscriber_id = $2) AS is_subscribed, \
                u.created_at \
         FROM users u WHERE u.username = LOWER($1)",
    )
    .bind(username)
    .bind(viewer_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// A user's watch history, most recently watched first.
pub async fn watch_history(pool: &PgPool, user_id: Uuid, pg: Pagination) -> Result<Vec<VideoView>> {
    let rows = sqlx::query_as::<_, VideoRow>(
        "SELECT v.id, v.video_url, v.thumbnail_url, v.title, v.description, \
                v.duration, v.views, v.created_at, \
                u.id AS owner_id, u.username AS owner_username, \
                u.avatar_url AS owner_avatar, u.full_name AS owner_full_name \
         FROM watch_history w \
         JOIN videos v ON v.id = w.video_id \
         LEFT JOIN users u ON u.id = v.owner_id \
         WHERE w.user_id = $1 \
         ORDER BY w.watched_at DESC, w.id DESC \
         LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(pg.limit)
    .bind(pg.offset())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(VideoRow::into_view).collect())
}

/// Dashboard aggregates for a channel.
pub async fn channel_stats(pool: &PgPool, channel_id: Uuid) -> Result<ChannelStats> {
    let stats = sqlx::query_as::<_, ChannelStats>(
        "SELECT \
            (SELECT COUNT(*) FROM videos WHERE owner_id = $1) AS total_videos, \
            (SELECT COALESCE(SUM(views), 0)::BIGINT FROM videos WHERE owner_id = $1) AS total_views, \
            (SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1) AS total_subscribers, \
            (SELECT COUNT(*) FROM likes l \
             JOIN videos v ON v.id = l.target_id AND l.target_kind = 'video' \
             WHERE v.owner_id = $1) AS total_likes",
    )
    .bind(channel_id)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
