/// Shared toggle algorithm for presence-keyed relationships.
///
/// The store's uniqueness primitive is the serialization point: a
/// conditional insert either claims the key or observes it taken, so there
/// is no read-then-write window and the row count per key never exceeds
/// one.
use async_trait::async_trait;

use crate::error::Result;

/// A relationship table keyed by a unique pair.
#[async_trait]
pub trait RelationshipStore {
    type Key: Copy + Send + Sync + 'static;
    type Row: Send;

    /// Insert the relationship unless the key is already present; returns
    /// the created row, or `None` when the key was taken.
    async fn insert_if_absent(&self, key: Self::Key) -> Result<Option<Self::Row>>;

    /// Remove the relationship; true when a row existed.
    async fn remove(&self, key: Self::Key) -> Result<bool>;
}

/// Outcome of a toggle: the relationship was either created or removed.
#[derive(Debug)]
pub enum ToggleOutcome<R> {
    Added(R),
    Removed,
}

pub async fn toggle<S>(store: &S, key: S::Key) -> Result<ToggleOutcome<S::Row>>
where
    S: RelationshipStore + Sync,
{
    if let Some(row) = store.insert_if_absent(key).await? {
        return Ok(ToggleOutcome::Added(row));
    }

    store.remove(key).await?;
    Ok(ToggleOutcome::Removed)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    struct MemStore {
        rows: Mutex<HashSet<(u64, u64)>>,
    }

    impl MemStore {
        fn new() -> Self {
            Self {
                rows: Mutex::new(HashSet::new()),
            }
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RelationshipStore for MemStore {
        type Key = (u64, u64);
        type Row = (u64, u64);

        async fn insert_if_absent(&self, key: Self::Key) -> Result<Option<Self::Row>> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.insert(key).then_some(key))
        }

        async fn remove(&self, key: Self::Key) -> Result<bool> {
            Ok(self.rows.lock().unwrap().remove(&key))
        }
    }

    #[tokio::test]
    async fn alternation_returns_to_original_state() {
        let store = MemStore::new();
        assert!(matches!(
            toggle(&store, (1, 2)).await.unwrap(),
            ToggleOutcome::Added(_)
        ));
        assert!(matches!(
            toggle(&store, (1, 2)).await.unwrap(),
            ToggleOutcome::Removed
        ));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn odd_number_of_toggles_leaves_exactly_one_row() {
        let store = MemStore::new();
        for _ in 0..5 {
            toggle(&store, (1, 2)).await.unwrap();
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn keys_toggle_independently() {
        let store = MemStore::new();
        toggle(&store, (1, 2)).await.unwrap();
        toggle(&store, (1, 3)).await.unwrap();

        assert!(matches!(
            toggle(&store, (1, 2)).await.unwrap(),
            ToggleOutcome::Removed
        ));
        assert_eq!(store.len(), 1);
    }
}
