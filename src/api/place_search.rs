use axum::Extension;
use axum::extract::Query;
use serde::Deserialize;
use serde_json::Value;

use crate::place_search;
use crate::place_search::PlaceSearch;

use super::Error;
use super::Success;
use super::utils::required;

#[derive(Deserialize)]
pub struct SearchQuery {
    keywords: Option<String>,
    city: Option<String>,
}

/// Search places with the external provider, the response is passed on as-is
pub async fn text(
    Extension(place_search): Extension<PlaceSearch>,
    Query(query): Query<SearchQuery>,
) -> Result<Success<Value>, Error> {
    let Some(keywords) = required(query.keywords) else {
        return Err(Error::bad_request("Keywords are required"));
    };

    if !place_search.is_configured() {
        return Err(Error::internal_server_error(
            "Place search API key not configured",
        ));
    }

    let city = required(query.city);

    let places = place_search
        .search(&keywords, city.as_deref())
        .await
        .map_err(|err| match err {
            place_search::Error::NotConfigured => {
                Error::internal_server_error("Place search API key not configured")
            }
            err => {
                tracing::error!("{err}");

                Error::internal_server_error("Failed to fetch from place search provider")
            }
        })?;

    Ok(Success::ok(places))
}
