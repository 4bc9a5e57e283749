/// Session lifecycle: login, refresh rotation, logout
///
/// The refresh token is persisted on the user row, so the server can revoke
/// a session unilaterally and detect replay of a rotated token. A pure
/// stateless-JWT design could not support either. The user record sits
/// behind `SessionStore`, the same seam shape as `BlobStore`.
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::security::jwt::{user_id_from_claims, TokenPair, TokenSigner};
use crate::security::password;

/// The user-record operations the session manager needs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>>;
    async fn set_refresh_token(&self, user_id: Uuid, token: &str) -> Result<()>;
    async fn clear_refresh_token(&self, user_id: Uuid) -> Result<()>;
}

#[async_trait]
impl SessionStore for PgPool {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        db::users::find_by_identifier(self, identifier).await
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        db::users::find_by_id(self, user_id).await
    }

    async fn set_refresh_token(&self, user_id: Uuid, token: &str) -> Result<()> {
        db::users::set_refresh_token(self, user_id, token).await
    }

    async fn clear_refresh_token(&self, user_id: Uuid) -> Result<()> {
        db::users::clear_refresh_token(self, user_id).await
    }
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn SessionStore>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(store: Arc<dyn SessionStore>, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    /// Verify credentials and open a session. `identifier` may be a username
    /// or an email.
    pub async fn login(&self, identifier: &str, raw_password: &str) -> Result<(User, TokenPair)> {
        let user = self
            .store
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !password::verify_password(raw_password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let pair = self.rotate(user.id).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, pair))
    }

    /// Rotate a session from an incoming refresh token. The token must be
    /// valid *and* match the value currently stored on the user row; a
    /// stale, already-rotated token is rejected as replay.
    pub async fn refresh(&self, incoming: &str) -> Result<TokenPair> {
        let claims = self.signer.verify_refresh(incoming)?;
        let user_id = user_id_from_claims(&claims)?;

        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        match user.refresh_token.as_deref() {
            Some(stored) if stored == incoming => {}
            _ => {
                tracing::warn!(user_id = %user_id, "Stale or revoked refresh token presented");
                return Err(AppError::Unauthorized(
                    "Refresh token is expired or already used".to_string(),
                ));
            }
        }

        let pair = self.rotate(user_id).await?;
        tracing::info!(user_id = %user_id, "Session refreshed");
        Ok(pair)
    }

    /// Close the session server-side by clearing the stored refresh token.
    pub async fn logout(&self, user_id: Uuid) -> Result<()> {
        self.store.clear_refresh_token(user_id).await?;
        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Issue a fresh pair and persist the new refresh token, invalidating
    /// whatever value was stored before.
    async fn rotate(&self, user_id: Uuid) -> Result<TokenPair> {
        let pair = self.signer.issue_pair(user_id)?;
        self.store
            .set_refresh_token(user_id, &pair.refresh_token)
            .await?;
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{Duration, Utc};

    use super::*;

    struct MemoryStore {
        users: Mutex<HashMap<Uuid, User>>,
    }

    impl MemoryStore {
        fn with_user(user: User) -> Arc<Self> {
            let mut users = HashMap::new();
            users.insert(user.id, user);
            Arc::new(Self {
                users: Mutex::new(users),
            })
        }
    }

    #[async_trait]
    impl SessionStore for MemoryStore {
        async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users
                .values()
                .find(|u| u.username == identifier.to_lowercase() || u.email == identifier)
                .cloned())
        }

        async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
            Ok(self.users.lock().unwrap().get(&user_id).cloned())
        }

        async fn set_refresh_token(&self, user_id: Uuid, token: &str) -> Result<()> {
            if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
                user.refresh_token = Some(token.to_string());
            }
            Ok(())
        }

        async fn clear_refresh_token(&self, user_id: Uuid) -> Result<()> {
            if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
                user.refresh_token = None;
            }
            Ok(())
        }
    }

    fn seeded_user(raw_password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            full_name: "Alice".into(),
            password_hash: password::hash_password(raw_password).unwrap(),
            avatar_url: "https://cdn/a.png".into(),
            cover_image_url: None,
            refresh_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(store: Arc<MemoryStore>) -> AuthService {
        let signer = TokenSigner::new(
            "access-secret",
            "refresh-secret",
            Duration::minutes(15),
            Duration::days(10),
        );
        AuthService::new(store, signer)
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_and_wrong_password() {
        let store = MemoryStore::with_user(seeded_user("hunter2"));
        let auth = service(store);

        let err = auth.login("nobody", "hunter2").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = auth.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn refresh_rotates_and_rejects_replayed_token() {
        let store = MemoryStore::with_user(seeded_user("hunter2"));
        let auth = service(store);

        let (_, first) = auth.login("alice", "hunter2").await.unwrap();
        let second = auth.refresh(&first.refresh_token).await.unwrap();

        // The pre-rotation token no longer matches the stored value.
        let err = auth.refresh(&first.refresh_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        // The current token still rotates normally.
        auth.refresh(&second.refresh_token).await.unwrap();
    }

    #[tokio::test]
    async fn logout_blocks_subsequent_refresh() {
        let user = seeded_user("hunter2");
        let user_id = user.id;
        let store = MemoryStore::with_user(user);
        let auth = service(store);

        let (_, pair) = auth.login("alice", "hunter2").await.unwrap();
        auth.logout(user_id).await.unwrap();

        let err = auth.refresh(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_accepts_email_identifier() {
        let store = MemoryStore::with_user(seeded_user("hunter2"));
        let auth = service(store);

        let (user, _) = auth.login("alice@example.com", "hunter2").await.unwrap();
        assert_eq!(user.username, "alice");
    }
}
