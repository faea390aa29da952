//! Users

use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// A registered user, owner of all POIs, itineraries, budgets and memos
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
    /// User ID
    pub id: Uuid,

    /// Unique username
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2 hash of the password
    pub password_hash: String,

    /// Registration date
    pub created_at: NaiveDateTime,

    /// Last profile change
    pub updated_at: NaiveDateTime,
}
