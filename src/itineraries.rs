//! Itineraries
//!
//! An itinerary is stored as a header row plus one row per stop, the API always works with the
//! assembled [`ItineraryAggregate`].

use std::collections::HashMap;

use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Itinerary header
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Itinerary {
    pub id: String,
    pub user_id: Uuid,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Descriptive fields of the POI a stop points to, as stored at read time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoiSnapshot {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<String>,
    pub tel: Option<String>,
    pub kind: Option<String>,
    pub typecode: Option<String>,
}

/// A POI's appearance within an itinerary
#[derive(Clone, Debug)]
pub struct Stop {
    /// Fresh on every write of the itinerary
    pub id: Uuid,
    pub itinerary_id: String,
    pub poi_id: String,
    pub description: Option<String>,
    pub budget: Decimal,
    pub transport_type: Option<String>,
    pub transport_description: Option<String>,
    pub transport_budget: Decimal,

    /// Position within the itinerary, contiguous from 0
    pub sort_order: i32,

    pub poi: PoiSnapshot,
}

/// Itinerary header with its stops in order
#[derive(Clone, Debug)]
pub struct ItineraryAggregate {
    pub itinerary: Itinerary,
    pub stops: Vec<Stop>,
}

impl ItineraryAggregate {
    /// Group stops under their itineraries
    ///
    /// The order of the itineraries is kept, stops are ordered by `sort_order`. Stops of unknown
    /// itineraries are dropped.
    pub fn assemble(itineraries: Vec<Itinerary>, stops: Vec<Stop>) -> Vec<Self> {
        let mut stops_by_itinerary: HashMap<String, Vec<Stop>> = HashMap::new();

        for stop in stops {
            stops_by_itinerary
                .entry(stop.itinerary_id.clone())
                .or_default()
                .push(stop);
        }

        itineraries
            .into_iter()
            .map(|itinerary| {
                let mut stops = stops_by_itinerary
                    .remove(&itinerary.id)
                    .unwrap_or_default();

                stops.sort_by_key(|stop| stop.sort_order);

                Self { itinerary, stops }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn itinerary(id: &str) -> Itinerary {
        let now = chrono::Utc::now().naive_utc();

        Itinerary {
            id: id.to_string(),
            user_id: Uuid::nil(),
            name: format!("Itinerary {id}"),
            date: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn stop(itinerary_id: &str, poi_id: &str, sort_order: i32) -> Stop {
        Stop {
            id: Uuid::new_v4(),
            itinerary_id: itinerary_id.to_string(),
            poi_id: poi_id.to_string(),
            description: None,
            budget: Decimal::ZERO,
            transport_type: None,
            transport_description: None,
            transport_budget: Decimal::ZERO,
            sort_order,
            poi: PoiSnapshot {
                id: poi_id.to_string(),
                name: format!("POI {poi_id}"),
                address: None,
                location: None,
                tel: None,
                kind: None,
                typecode: None,
            },
        }
    }

    #[test]
    fn test_assemble_groups_and_orders_stops() {
        let itineraries = vec![itinerary("b"), itinerary("a")];
        let stops = vec![
            stop("a", "p2", 1),
            stop("b", "p3", 0),
            stop("a", "p1", 0),
            stop("unknown", "p4", 0),
        ];

        let aggregates = ItineraryAggregate::assemble(itineraries, stops);

        assert_eq!(2, aggregates.len());
        assert_eq!("b", aggregates[0].itinerary.id);
        assert_eq!("a", aggregates[1].itinerary.id);

        let poi_ids = aggregates[1]
            .stops
            .iter()
            .map(|stop| stop.poi_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(vec!["p1", "p2"], poi_ids);

        assert_eq!(1, aggregates[0].stops.len());
        assert_eq!("POI p3", aggregates[0].stops[0].poi.name);
    }

    #[test]
    fn test_assemble_without_stops() {
        let aggregates = ItineraryAggregate::assemble(vec![itinerary("a")], Vec::new());

        assert_eq!(1, aggregates.len());
        assert!(aggregates[0].stops.is_empty());
    }
}
