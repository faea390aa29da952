use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::database::CreatePoiValues;
use crate::database::Database;
use crate::database::UpdatePoiValues;
use crate::pois::Poi;
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
pub struct PoiResponse {
    pub id: String,
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<String>,
    pub tel: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub typecode: Option<String>,
    pub created_at: NaiveDateTime,
}

impl PoiResponse {
    fn from_poi(poi: Poi) -> Self {
        Self {
            id: poi.id,
            user_id: poi.user_id,
            name: poi.name,
            address: poi.address,
            location: poi.location,
            tel: poi.tel,
            kind: poi.kind,
            typecode: poi.typecode,
            created_at: poi.created_at,
        }
    }

    fn from_poi_multiple(pois: Vec<Poi>) -> Vec<Self> {
        pois.into_iter().map(Self::from_poi).collect::<Vec<Self>>()
    }
}

#[derive(Deserialize)]
pub struct PoiForm {
    id: Option<String>,
    name: Option<String>,
    address: Option<String>,
    location: Option<String>,
    #[serde(default, deserialize_with = "fields::tel")]
    tel: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    typecode: Option<String>,
}

pub async fn list(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
) -> Result<Success<Vec<PoiResponse>>, Error> {
    let pois = database
        .find_all_pois(&current_user)
        .await
        .map_err(Error::database)?;

    Ok(Success::ok(PoiResponse::from_poi_multiple(pois)))
}

pub async fn create(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    Form(form): Form<PoiForm>,
) -> Result<Success<PoiResponse>, Error> {
    let Some(name) = required(form.name) else {
        return Err(Error::bad_request("Name is required"));
    };

    let id = required(form.id).unwrap_or_else(generate_id);

    let poi = database
        .create_poi(&CreatePoiValues {
            user: &current_user,
            id: &id,
            name: &name,
            address: form.address.as_deref(),
            location: form.location.as_deref(),
            tel: form.tel.as_deref(),
            kind: form.kind.as_deref(),
            typecode: form.typecode.as_deref(),
        })
        .await
        .map_err(Error::database_or_conflict("POI ID already exists"))?;

    Ok(Success::created(PoiResponse::from_poi(poi)))
}

pub async fn update(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(poi_id): PathParameters<String>,
    Form(form): Form<PoiForm>,
) -> Result<Success<PoiResponse>, Error> {
    let name = required(form.name);

    let poi = database
        .update_poi(
            &current_user,
            &poi_id,
            &UpdatePoiValues {
                name: name.as_deref(),
                address: form.address.as_deref(),
                location: form.location.as_deref(),
                tel: form.tel.as_deref(),
                kind: form.kind.as_deref(),
                typecode: form.typecode.as_deref(),
            },
        )
        .await
        .map_err(Error::database)?
        .ok_or_else(|| Error::not_found("POI not found"))?;

    Ok(Success::ok(PoiResponse::from_poi(poi)))
}

pub async fn delete(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(poi_id): PathParameters<String>,
) -> Result<Success<Message>, Error> {
    let deleted = database
        .delete_poi(&current_user, &poi_id)
        .await
        .map_err(Error::database_or_conflict("POI is used by an itinerary"))?;

    if !deleted {
        return Err(Error::not_found("POI not found"));
    }

    Ok(Success::message("POI deleted"))
}
