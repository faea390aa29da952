//! Current user service
//!
//! Get the current user from the request based on the Authorization header

use std::ops::Deref;
use std::sync::Arc;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::api::Error;
use crate::database::Database;
use crate::users::User;

/// Tokens are valid for a week
const TOKEN_LIFETIME: i64 = 7 * 24 * 60 * 60;

/// The keys used for encoding/decoding JWT tokens
#[derive(Clone)]
pub struct JwtKeys {
    /// The encoding key
    encoding: EncodingKey,

    /// The decoding key
    decoding: DecodingKey,

    /// Reject tokens past their expiration date
    enforce_expiry: bool,
}

impl JwtKeys {
    /// Create new encoding/decoding keys, derived from a secret
    pub fn new(secret: &[u8], enforce_expiry: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            enforce_expiry,
        }
    }
}

/// The JWT claims to identify a user
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// The user ID
    pub user_id: Uuid,

    /// The username at the moment the token was issued
    pub username: String,

    /// Issued at
    pub iat: i64,

    /// Expiration date, as UNIX timestamp
    pub exp: i64,
}

/// Current user service
#[derive(Clone)]
pub struct CurrentUser {
    /// The actual user
    user: Arc<User>,
}

impl CurrentUser {
    /// Create the current user from a user
    fn new(user: User) -> Self {
        Self {
            user: Arc::new(user),
        }
    }
}

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

/// Generate a token for the outside world for a given user
pub fn generate_token(jwt_keys: &JwtKeys, user: &User) -> Result<String, Error> {
    use jsonwebtoken::Header;
    use jsonwebtoken::encode;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        user_id: user.id,
        username: user.username.clone(),
        iat: now,
        exp: now + TOKEN_LIFETIME,
    };

    encode(&Header::default(), &claims, &jwt_keys.encoding).map_err(|err| {
        tracing::error!("Could not encode token: {err}");

        Error::internal_server_error("Could not generate token")
    })
}

/// Verify the signature of a token and read its claims
///
/// The expiration date is only checked when the keys are configured to do so
pub fn verify_token(jwt_keys: &JwtKeys, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    use jsonwebtoken::Validation;
    use jsonwebtoken::decode;

    let mut validation = Validation::default();
    validation.validate_exp = jwt_keys.enforce_expiry;
    if !jwt_keys.enforce_expiry {
        validation.required_spec_claims.clear();
    }

    decode::<Claims>(token, &jwt_keys.decoding, &validation).map(|token_data| token_data.claims)
}

impl<B> FromRequestParts<B> for CurrentUser
where
    B: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::unauthorized("Missing access token"))?;

        let Extension(jwt_keys) = parts
            .extract::<Extension<JwtKeys>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get JWT keys"))?;

        let Extension(database) = parts
            .extract::<Extension<Database>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get a database pool"))?;

        let claims = verify_token(&jwt_keys, bearer.token())
            .map_err(|err| Error::forbidden("Invalid token").with_description(err))?;

        let user = database
            .find_single_user_by_id(&claims.user_id)
            .await
            .map_err(Error::database)?;

        user.map(CurrentUser::new)
            .ok_or_else(|| Error::not_found("User not found"))
    }
}
