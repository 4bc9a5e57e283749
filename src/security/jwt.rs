/// Access/refresh token signing and verification (HS256)
///
/// Access and refresh tokens use distinct secrets, so one kind can never be
/// replayed as the other. Keys live on an explicit `TokenSigner` handle
/// passed through `AppState`, not in process globals.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct TokenSigner {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSigner {
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.access_token_secret.clone(),
            config.refresh_token_secret.clone(),
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
        )
    }

    /// Issue a fresh access + refresh pair for a user.
    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.sign(
                user_id,
                TOKEN_TYPE_ACCESS,
                self.access_ttl,
                &self.access_secret,
            )?,
            refresh_token: self.sign(
                user_id,
                TOKEN_TYPE_REFRESH,
                self.refresh_ttl,
                &self.refresh_secret,
            )?,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims> {
        self.verify(token, TOKEN_TYPE_ACCESS, &self.access_secret)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
        self.verify(token, TOKEN_TYPE_REFRESH, &self.refresh_secret)
    }

    fn sign(&self, user_id: Uuid, token_type: &str, ttl: Duration, secret: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            token_type: token_type.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;

        Ok(token)
    }

    fn verify(&self, token: &str, expected_type: &str, secret: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;

        if data.claims.token_type != expected_type {
            return Err(AppError::Unauthorized("Invalid token type".to_string()));
        }

        Ok(data.claims)
    }
}

/// Parse the user id carried in a verified claim set.
pub fn user_id_from_claims(claims: &Claims) -> Result<Uuid> {
    Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(
            "access-secret",
            "refresh-secret",
            Duration::minutes(15),
            Duration::days(10),
        )
    }

    #[test]
    fn issued_pair_verifies_with_matching_kind() {
        let signer = signer();
        let user_id = Uuid::new_v4();
        let pair = signer.issue_pair(user_id).unwrap();

        let access = signer.verify_access(&pair.access_token).unwrap();
        let refresh = signer.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(user_id_from_claims(&access).unwrap(), user_id);
        assert_eq!(user_id_from_claims(&refresh).unwrap(), user_id);
    }

    #[test]
    fn access_token_is_rejected_as_refresh() {
        let signer = signer();
        let pair = signer.issue_pair(Uuid::new_v4()).unwrap();
        assert!(signer.verify_refresh(&pair.access_token).is_err());
        assert!(signer.verify_access(&pair.refresh_token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let signer = signer();
        let pair = signer.issue_pair(Uuid::new_v4()).unwrap();
        let mut tampered = pair.access_token.clone();
        tampered.pop();
        tampered.push('x');
        assert!(signer.verify_access(&tampered).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new(
            "access-secret",
            "refresh-secret",
            Duration::minutes(-5),
            Duration::days(10),
        );
        let pair = signer.issue_pair(Uuid::new_v4()).unwrap();
        assert!(signer.verify_access(&pair.access_token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let pair = signer().issue_pair(Uuid::new_v4()).unwrap();
        let other = TokenSigner::new(
            "different-secret",
            "refresh-secret",
            Duration::minutes(15),
            Duration::days(10),
        );
        assert!(other.verify_access(&pair.access_token).is_err());
    }
}
