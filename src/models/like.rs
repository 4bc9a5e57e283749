use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Polymorphic like target: a tagged (kind, id) pair rather than three
/// optional foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video(Uuid),
    Comment(Uuid),
    Tweet(Uuid),
}

impl LikeTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video",
            LikeTarget::Comment(_) => "comment",
            LikeTarget::Tweet(_) => "tweet",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => *id,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_kind: String,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_kind_and_id_are_exhaustive() {
        let id = Uuid::new_v4();
        assert_eq!(LikeTarget::Video(id).kind(), "video");
        assert_eq!(LikeTarget::Comment(id).kind(), "comment");
        assert_eq!(LikeTarget::Tweet(id).kind(), "tweet");
        assert_eq!(LikeTarget::Tweet(id).id(), id);
    }
}
