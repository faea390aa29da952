//! Place search
//!
//! Thin client for the text search of the AMap place API, results are passed on untouched

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::PlaceSearchConfig;

/// Upper bound for a single search, including reading the response
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Results per page, only the first page is requested
const PAGE_SIZE: &str = "20";

/// Place search failures
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Place search API key is not configured")]
    NotConfigured,

    #[error("Place search URL can not be used: {0}")]
    InvalidUrl(Url),

    #[error("Place search request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Place search client
///
/// Cheap to clone, the connection pool of the HTTP client is shared
#[derive(Clone)]
pub struct PlaceSearch {
    client: reqwest::Client,
    config: PlaceSearchConfig,
}

impl PlaceSearch {
    /// Create a new client
    pub fn new(config: PlaceSearchConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, config })
    }

    /// Search places matching the keywords, optionally within a city
    pub async fn search(&self, keywords: &str, city: Option<&str>) -> Result<Value, Error> {
        let url = self.build_url(keywords, city)?;

        tracing::debug!("Searching places for \"{keywords}\"");

        let response = self.client.get(url).send().await?.error_for_status()?;

        Ok(response.json::<Value>().await?)
    }

    /// URL of the text search, including the API key
    fn build_url(&self, keywords: &str, city: Option<&str>) -> Result<Url, Error> {
        let api_key = self.config.api_key.as_deref().ok_or(Error::NotConfigured)?;

        let mut url = self.config.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(["place", "text"]);

        url.query_pairs_mut()
            .append_pair("key", api_key)
            .append_pair("keywords", keywords)
            .append_pair("city", city.unwrap_or_default())
            .append_pair("offset", PAGE_SIZE)
            .append_pair("page", "1")
            .append_pair("extensions", "all");

        Ok(url)
    }

    /// Is an API key available
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_search(api_key: Option<&str>, base_url: &str) -> PlaceSearch {
        PlaceSearch::new(PlaceSearchConfig {
            api_key: api_key.map(ToString::to_string),
            base_url: Url::parse(base_url).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_build_url() {
        let place_search = place_search(Some("secret"), "https://restapi.amap.com/v3");

        let url = place_search.build_url("West Lake", Some("杭州")).unwrap();

        assert_eq!("/v3/place/text", url.path());
        assert_eq!(
            "key=secret&keywords=West+Lake&city=%E6%9D%AD%E5%B7%9E&offset=20&page=1&extensions=all",
            url.query().unwrap()
        );
    }

    #[test]
    fn test_build_url_trailing_slash() {
        let place_search = place_search(Some("secret"), "http://localhost:8080/v3/");

        let url = place_search.build_url("museum", None).unwrap();

        assert_eq!("/v3/place/text", url.path());
        assert!(url.query().unwrap().contains("&city=&"));
    }

    #[test]
    fn test_build_url_without_key() {
        let place_search = place_search(None, "https://restapi.amap.com/v3");

        assert!(!place_search.is_configured());
        assert!(matches!(
            place_search.build_url("museum", None),
            Err(Error::NotConfigured)
        ));
    }
}
