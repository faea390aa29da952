use axum::http::StatusCode;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use serde_json::json;

use crate::tests::helper;

/// A correctly signed token that expired a long time ago
fn expired_token(user: &helper::User) -> String {
    let claims = json!({
        "userId": user.id,
        "username": user.username,
        "iat": 1_700_000_000,
        "exp": 1_700_000_060,
    });

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(helper::JWT_SECRET.as_bytes()),
    )
    .unwrap();

    format!("Bearer {token}")
}

#[sqlx::test]
async fn test_expired_token_is_accepted_by_default(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app(pool).await;

    let alice = helper::register(&mut app, "alice").await;

    let (status_code, user) = helper::get(&mut app, "/api/auth/me", &expired_token(&alice)).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("alice", user["username"]);
}

#[sqlx::test]
async fn test_expired_token_is_rejected_when_enforced(pool: sqlx::PgPool) {
    let mut config = helper::test_config();
    config.enforce_token_expiry = true;

    let mut app = helper::setup_test_app_with_config(pool, config).await;

    let alice = helper::register(&mut app, "alice").await;

    let (status_code, _) = helper::get(&mut app, "/api/auth/me", &expired_token(&alice)).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    // fresh tokens are still fine
    let (status_code, _) = helper::get(&mut app, "/api/auth/me", &alice.access_token).await;
    assert_eq!(StatusCode::OK, status_code);
}
