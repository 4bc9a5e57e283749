/// Projection types for composed views
///
/// Foreign entities are always embedded as whitelisted summaries, never as
/// full rows, so credentials and session state cannot leak through a feed.
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Whitelisted projection of a user embedded in a feed row.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Narrower projection used for subscribed-channel lists.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
}

/// Comment with its author embedded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub video_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Empty when the author has since disappeared; the page still renders.
    pub owner: Option<OwnerSummary>,
}

/// Video with its owner embedded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub id: Uuid,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub owner: Option<OwnerSummary>,
}

/// Playlist detail with its owner embedded; the raw owner id is elided.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "videos")]
    pub video_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: Option<OwnerSummary>,
}

/// Channel profile: user summary plus relationship counts for the viewer.
#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub subscriber_count: i64,
    pub subscribed_to_count: i64,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregate dashboard numbers for a channel.
#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_likes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_view_elides_owner_id() {
        let view = PlaylistView {
            id: Uuid::new_v4(),
            name: "mix".into(),
            description: String::new(),
            video_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            owner: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("ownerId").is_none());
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn owner_summary_omits_absent_full_name() {
        let summary = OwnerSummary {
            id: Uuid::new_v4(),
            username: "alice".into(),
            avatar: "a.png".into(),
            full_name: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("fullName").is_none());
    }
}
