//! Database storage types

use rust_decimal::Decimal;
use sqlx::migrate::Migrator;
use uuid::Uuid;

use crate::itineraries::PoiSnapshot;
use crate::itineraries::Stop;

/// Migrator to run migrations on startup
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// `SQLx` version of a stop, joined with the POI it points to
#[derive(sqlx::FromRow)]
pub struct StopRow {
    pub id: Uuid,
    pub itinerary_id: String,
    pub poi_id: String,
    pub description: Option<String>,
    pub budget: Decimal,
    pub transport_type: Option<String>,
    pub transport_description: Option<String>,
    pub transport_budget: Decimal,
    pub sort_order: i32,

    pub poi_name: String,
    pub poi_address: Option<String>,
    pub poi_location: Option<String>,
    pub poi_tel: Option<String>,
    pub poi_type: Option<String>,
    pub poi_typecode: Option<String>,
}

impl From<StopRow> for Stop {
    fn from(row: StopRow) -> Self {
        Self {
            id: row.id,
            poi: PoiSnapshot {
                id: row.poi_id.clone(),
                name: row.poi_name,
                address: row.poi_address,
                location: row.poi_location,
                tel: row.poi_tel,
                kind: row.poi_type,
                typecode: row.poi_typecode,
            },
            itinerary_id: row.itinerary_id,
            poi_id: row.poi_id,
            description: row.description,
            budget: row.budget,
            transport_type: row.transport_type,
            transport_description: row.transport_description,
            transport_budget: row.transport_budget,
            sort_order: row.sort_order,
        }
    }
}
