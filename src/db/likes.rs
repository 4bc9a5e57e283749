/// Like database operations
///
/// The (user, kind, id) unique constraint backs the conditional insert: a
/// concurrent duplicate loses at the constraint instead of creating a
/// second row.
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::toggle::{self, RelationshipStore, ToggleOutcome};
use crate::error::Result;
use crate::models::{Like, LikeTarget};

struct LikeStore<'a>(&'a PgPool);

#[async_trait]
impl RelationshipStore for LikeStore<'_> {
    type Key = (Uuid, LikeTarget);
    type Row = Like;

    async fn insert_if_absent(&self, key: Self::Key) -> Result<Option<Like>> {
        let (user_id, target) = key;
        let inserted = sqlx::query_as::<_, Like>(
            "INSERT INTO likes (user_id, target_kind, target_id) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, target_kind, target_id) DO NOTHING \
             RETURNING id, user_id, target_kind, target_id, created_at",
        )
        .bind(user_id)
        .bind(target.kind())
        .bind(target.id())
        .fetch_optional(self.0)
        .await?;

        Ok(inserted)
    }

    async fn remove(&self, key: Self::Key) -> Result<bool> {
        let (user_id, target) = key;
        let result = sqlx::query(
            "DELETE FROM likes WHERE user_id = $1 AND target_kind = $2 AND target_id = $3",
        )
        .bind(user_id)
        .bind(target.kind())
        .bind(target.id())
        .execute(self.0)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub async fn toggle(
    pool: &PgPool,
    user_id: Uuid,
    target: LikeTarget,
) -> Result<ToggleOutcome<Like>> {
    toggle::toggle(&LikeStore(pool), (user_id, target)).await
}
