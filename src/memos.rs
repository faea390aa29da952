use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// Title used when a memo is created without one
pub const DEFAULT_TITLE: &str = "new memo";

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Memo {
    pub id: String,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
