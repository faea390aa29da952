//! Points of interest

use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// A named place owned by a single user
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Poi {
    /// Client supplied or generated ID
    pub id: String,

    /// Owner
    pub user_id: Uuid,

    pub name: String,
    pub address: Option<String>,

    /// Free-form coordinates, usually `longitude,latitude`
    pub location: Option<String>,

    /// Phone numbers, joined with `;`
    pub tel: Option<String>,

    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub typecode: Option<String>,

    pub created_at: NaiveDateTime,
}
