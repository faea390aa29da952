//! Application configuration
//!
//! Everything is read from the environment once at startup, a `.env` file is loaded beforehand by
//! `main`. Database settings are read by the database module itself.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use url::Url;

use crate::password::generate;
use crate::utils::env_var;
use crate::utils::env_var_or_else;

const DEFAULT_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_PLACE_SEARCH_URL: &str = "https://restapi.amap.com/v3";

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Settings of the external place search provider
#[derive(Clone, Debug)]
pub struct PlaceSearchConfig {
    /// API key, the proxy refuses to work without one
    pub api_key: Option<String>,

    /// Base URL of the provider, `/place/text` is appended to it
    pub base_url: Url,
}

/// All configuration loaded from the environment
#[derive(Clone, Debug)]
pub struct Config {
    /// Address to listen on
    pub address: SocketAddr,

    /// Secret used to sign access tokens
    pub jwt_secret: String,

    /// Reject tokens past their `exp` claim
    ///
    /// Off by default: a token with a valid signature stays usable after it expired
    pub enforce_token_expiry: bool,

    /// Place search provider
    pub place_search: PlaceSearchConfig,

    /// Origins allowed to call the API from a browser, any origin when empty
    pub cors_origins: Vec<HeaderValue>,
}

impl Config {
    /// Load the configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let address = parse_address()?;

        let jwt_secret = env_var_or_else("JWT_SECRET", || {
            let jwt_secret = generate();
            tracing::warn!("`JWT_SECRET` is not set, generating temporary one: {jwt_secret}");
            jwt_secret
        });

        let enforce_token_expiry = env_var("JWT_ENFORCE_EXPIRY")
            .map(|value| parse_flag("JWT_ENFORCE_EXPIRY", &value))
            .transpose()?
            .unwrap_or(false);

        let base_url = env_var_or_else("AMAP_API_URL", || DEFAULT_PLACE_SEARCH_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|err| ConfigError::InvalidValue("AMAP_API_URL", err.to_string()))?;

        let api_key = env_var("AMAP_API_KEY");
        if api_key.is_none() {
            tracing::warn!("`AMAP_API_KEY` is not set, place search is disabled");
        }

        let cors_origins = parse_origins()?;

        Ok(Self {
            address,
            jwt_secret,
            enforce_token_expiry,
            place_search: PlaceSearchConfig { api_key, base_url },
            cors_origins,
        })
    }
}

fn parse_address() -> Result<SocketAddr, ConfigError> {
    let mut address = env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS))
        .parse::<SocketAddr>()
        .map_err(|err| ConfigError::InvalidValue("ADDRESS", err.to_string()))?;

    // optional override of just the port
    if let Some(port) = env_var("PORT") {
        let port = port
            .parse::<u16>()
            .map_err(|err| ConfigError::InvalidValue("PORT", err.to_string()))?;

        address.set_port(port);
    }

    Ok(address)
}

/// Comma separated list of origins in `CORS_ORIGINS`
fn parse_origins() -> Result<Vec<HeaderValue>, ConfigError> {
    env_var("CORS_ORIGINS")
        .map(|origins| split_origins(&origins))
        .transpose()
        .map(Option::unwrap_or_default)
}

fn split_origins(origins: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|err| ConfigError::InvalidValue("CORS_ORIGINS", err.to_string()))
        })
        .collect()
}

fn parse_flag(var_name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            var_name,
            format!("'{other}' is not a boolean"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("FLAG", "true").unwrap());
        assert!(parse_flag("FLAG", " YES ").unwrap());
        assert!(parse_flag("FLAG", "1").unwrap());
        assert!(!parse_flag("FLAG", "off").unwrap());
        assert!(!parse_flag("FLAG", "0").unwrap());
        assert!(parse_flag("FLAG", "maybe").is_err());
    }

    #[test]
    fn test_split_origins() {
        let origins =
            split_origins(" https://trips.example.com, ,http://localhost:5173 ").unwrap();

        assert_eq!(
            vec!["https://trips.example.com", "http://localhost:5173"],
            origins
                .iter()
                .map(|origin| origin.to_str().unwrap())
                .collect::<Vec<_>>()
        );

        assert!(split_origins("https://trips.example.com\nhttp://localhost:5173").is_err());
    }
}
