//! Token pair lifecycle against the public signer API.

use chrono::Duration;
use serde_json::Value;
use uuid::Uuid;

use videotube::security::jwt::{user_id_from_claims, TokenSigner, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

fn signer() -> TokenSigner {
    TokenSigner::new(
        "test-access-secret",
        "test-refresh-secret",
        Duration::minutes(15),
        Duration::days(10),
    )
}

#[test]
fn pair_carries_user_identity_in_both_tokens() {
    let signer = signer();
    let user_id = Uuid::new_v4();
    let pair = signer.issue_pair(user_id).unwrap();

    let access = signer.verify_access(&pair.access_token).unwrap();
    assert_eq!(access.token_type, TOKEN_TYPE_ACCESS);
    assert_eq!(user_id_from_claims(&access).unwrap(), user_id);

    let refresh = signer.verify_refresh(&pair.refresh_token).unwrap();
    assert_eq!(refresh.token_type, TOKEN_TYPE_REFRESH);
    assert_eq!(user_id_from_claims(&refresh).unwrap(), user_id);
}

#[test]
fn token_kinds_are_not_interchangeable() {
    let signer = signer();
    let pair = signer.issue_pair(Uuid::new_v4()).unwrap();

    assert!(signer.verify_access(&pair.refresh_token).is_err());
    assert!(signer.verify_refresh(&pair.access_token).is_err());
}

#[test]
fn rotation_issues_distinct_tokens() {
    let signer = signer();
    let user_id = Uuid::new_v4();

    let first = signer.issue_pair(user_id).unwrap();
    let second = signer.issue_pair(user_id).unwrap();

    // jti makes every issued token unique even within the same second.
    assert_ne!(first.access_token, second.access_token);
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[test]
fn expired_access_token_is_rejected_without_leeway() {
    let signer = TokenSigner::new(
        "test-access-secret",
        "test-refresh-secret",
        Duration::seconds(-1),
        Duration::days(10),
    );
    let pair = signer.issue_pair(Uuid::new_v4()).unwrap();
    assert!(signer.verify_access(&pair.access_token).is_err());
}

#[test]
fn token_pair_serializes_camel_case() {
    let pair = signer().issue_pair(Uuid::new_v4()).unwrap();
    let body: Value = serde_json::to_value(&pair).unwrap();
    assert!(body.get("accessToken").is_some());
    assert!(body.get("refreshToken").is_some());
    assert!(body.get("access_token").is_none());
}
