use axum::Extension;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::database::Database;
use crate::database::ItineraryValues;
use crate::database::StopValues;
use crate::itineraries::ItineraryAggregate;
use crate::itineraries::PoiSnapshot;
use crate::itineraries::Stop;
use crate::utils::generate_id;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::Message;
use super::PathParameters;
use super::Success;
use super::fields;
use super::utils::required;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResponse {
    pub id: String,
    pub user_id: Uuid,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,

    /// Stops in order
    pub pois: Vec<StopResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopResponse {
    pub id: Uuid,
    pub poi_id: String,
    pub description: Option<String>,
    pub budget: Decimal,
    pub transport_type: Option<String>,
    pub transport_description: Option<String>,
    pub transport_budget: Decimal,
    pub sort_order: i32,
    pub poi: PoiSnapshotResponse,
}

#[derive(Debug, Serialize)]
pub struct PoiSnapshotResponse {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<String>,
    pub tel: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub typecode: Option<String>,
}

impl ItineraryResponse {
    fn from_aggregate(aggregate: ItineraryAggregate) -> Self {
        let ItineraryAggregate { itinerary, stops } = aggregate;

        Self {
            id: itinerary.id,
            user_id: itinerary.user_id,
            name: itinerary.name,
            date: itinerary.date,
            description: itinerary.description,
            created_at: itinerary.created_at,
            updated_at: itinerary.updated_at,
            pois: stops.into_iter().map(StopResponse::from_stop).collect(),
        }
    }

    fn from_aggregate_multiple(aggregates: Vec<ItineraryAggregate>) -> Vec<Self> {
        aggregates
            .into_iter()
            .map(Self::from_aggregate)
            .collect::<Vec<Self>>()
    }
}

impl StopResponse {
    fn from_stop(stop: Stop) -> Self {
        let PoiSnapshot {
            id,
            name,
            address,
            location,
            tel,
            kind,
            typecode,
        } = stop.poi;

        Self {
            id: stop.id,
            poi_id: stop.poi_id,
            description: stop.description,
            budget: stop.budget,
            transport_type: stop.transport_type,
            transport_description: stop.transport_description,
            transport_budget: stop.transport_budget,
            sort_order: stop.sort_order,
            poi: PoiSnapshotResponse {
                id,
                name,
                address,
                location,
                tel,
                kind,
                typecode,
            },
        }
    }
}

#[derive(Deserialize)]
pub struct ItineraryForm {
    id: Option<String>,
    name: Option<String>,
    #[serde(default, deserialize_with = "fields::date")]
    date: Option<NaiveDate>,
    description: Option<String>,
    #[serde(default)]
    pois: Option<Vec<StopForm>>,
}

/// A stop, carrying the POI it refers to
#[derive(Deserialize)]
pub struct StopForm {
    /// ID of the POI, generated when absent
    id: Option<String>,
    name: Option<String>,
    address: Option<String>,
    location: Option<String>,
    #[serde(default, deserialize_with = "fields::tel")]
    tel: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    typecode: Option<String>,

    description: Option<String>,
    #[serde(default, deserialize_with = "fields::decimal")]
    budget: Option<Decimal>,
    transport: Option<TransportForm>,
}

#[derive(Default, Deserialize)]
pub struct TransportForm {
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    #[serde(default, deserialize_with = "fields::decimal")]
    budget: Option<Decimal>,
}

impl StopForm {
    fn into_values(self, position: usize) -> Result<StopValues, Error> {
        let Some(poi_name) = required(self.name) else {
            return Err(Error::bad_request(format!(
                "Name of the POI at position {position} is required"
            )));
        };

        let transport = self.transport.unwrap_or_default();

        Ok(StopValues {
            poi_id: required(self.id).unwrap_or_else(generate_id),
            poi_name,
            poi_address: self.address,
            poi_location: self.location,
            poi_tel: self.tel,
            poi_type: self.kind,
            poi_typecode: self.typecode,
            description: self.description,
            budget: self.budget.unwrap_or_default(),
            transport_type: transport.kind,
            transport_description: transport.description,
            transport_budget: transport.budget.unwrap_or_default(),
        })
    }
}

/// Validate all stops, keeping their order
fn parse_stops(pois: Option<Vec<StopForm>>) -> Result<Vec<StopValues>, Error> {
    pois.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(position, stop)| stop.into_values(position))
        .collect::<Result<Vec<StopValues>, Error>>()
}

pub async fn list(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
) -> Result<Success<Vec<ItineraryResponse>>, Error> {
    let aggregates = database
        .find_all_itineraries(&current_user)
        .await
        .map_err(Error::database)?;

    Ok(Success::ok(ItineraryResponse::from_aggregate_multiple(
        aggregates,
    )))
}

pub async fn create(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    Form(form): Form<ItineraryForm>,
) -> Result<Success<ItineraryResponse>, Error> {
    let Some(name) = required(form.name) else {
        return Err(Error::bad_request("Name is required"));
    };

    let id = required(form.id).unwrap_or_else(generate_id);
    let stops = parse_stops(form.pois)?;

    let aggregate = database
        .create_itinerary(&ItineraryValues {
            user: &current_user,
            id: &id,
            name: &name,
            date: form.date,
            description: form.description.as_deref(),
            stops: &stops,
        })
        .await
        .map_err(Error::database)?;

    tracing::debug!(
        "Created itinerary {} with {} stops",
        aggregate.itinerary.id,
        aggregate.stops.len()
    );

    Ok(Success::created(ItineraryResponse::from_aggregate(
        aggregate,
    )))
}

pub async fn update(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(itinerary_id): PathParameters<String>,
    Form(form): Form<ItineraryForm>,
) -> Result<Success<ItineraryResponse>, Error> {
    let Some(name) = required(form.name) else {
        return Err(Error::bad_request("Name is required"));
    };

    let stops = parse_stops(form.pois)?;

    let aggregate = database
        .update_itinerary(&ItineraryValues {
            user: &current_user,
            id: &itinerary_id,
            name: &name,
            date: form.date,
            description: form.description.as_deref(),
            stops: &stops,
        })
        .await
        .map_err(Error::database)?
        .ok_or_else(|| Error::not_found("Itinerary not found"))?;

    Ok(Success::ok(ItineraryResponse::from_aggregate(aggregate)))
}

pub async fn delete(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(itinerary_id): PathParameters<String>,
) -> Result<Success<Message>, Error> {
    let deleted = database
        .delete_itinerary(&current_user, &itinerary_id)
        .await
        .map_err(Error::database)?;

    if !deleted {
        return Err(Error::not_found("Itinerary not found"));
    }

    Ok(Success::message("Itinerary deleted"))
}
