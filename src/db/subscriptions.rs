/// Subscription database operations
///
/// Same conditional-insert shape as likes: the (subscriber, channel)
/// unique constraint is the serialization point.
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::toggle::{self, RelationshipStore, ToggleOutcome};
use crate::error::Result;
use crate::models::Subscription;

struct SubscriptionStore<'a>(&'a PgPool);

#[async_trait]
impl RelationshipStore for SubscriptionStore<'_> {
    type Key = (Uuid, Uuid);
    type Row = Subscription;

    async fn insert_if_absent(&self, key: Self::Key) -> Result<Option<Subscription>> {
        let (subscriber_id, channel_id) = key;
        let inserted = sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (subscriber_id, channel_id) VALUES ($1, $2) \
             ON CONFLICT (subscriber_id, channel_id) DO NOTHING \
             RETURNING id, subscriber_id, channel_id, created_at",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_optional(self.0)
        .await?;

        Ok(inserted)
    }

    async fn remove(&self, key: Self::Key) -> Result<bool> {
        let (subscriber_id, channel_id) = key;
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
                .bind(subscriber_id)
                .bind(channel_id)
                .execute(self.0)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub async fn toggle(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<ToggleOutcome<Subscription>> {
    toggle::toggle(&SubscriptionStore(pool), (subscriber_id, channel_id)).await
}
