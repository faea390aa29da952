use chrono::naive::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Category used when none is given
pub const DEFAULT_CATEGORY: &str = "custom";

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Budget {
    pub id: String,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Planned amount
    pub amount: Decimal,

    /// Amount actually spent so far
    pub actual_amount: Decimal,

    pub category: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
