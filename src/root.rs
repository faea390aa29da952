//! Welcome and documentation endpoints

use axum::Json;
use axum::http::HeaderMap;
use axum::http::header::HOST;
use chrono::Utc;
use serde_json::Value;
use serde_json::json;

/// All endpoints with a short description, served by `/api/docs`
const ENDPOINTS: &[(&str, &str)] = &[
    ("POST /api/auth/register", "Register a new user"),
    ("POST /api/auth/login", "Log in with username or email"),
    ("GET /api/auth/me", "Get the current user"),
    ("PUT /api/auth/me", "Update the current user"),
    ("DELETE /api/auth/me", "Delete the current user and all their data"),
    ("GET /api/pois", "List POIs"),
    ("POST /api/pois", "Create a POI"),
    ("PUT /api/pois/{id}", "Update a POI"),
    ("DELETE /api/pois/{id}", "Delete a POI"),
    ("GET /api/itineraries", "List itineraries with their POIs"),
    ("POST /api/itineraries", "Create an itinerary"),
    ("PUT /api/itineraries/{id}", "Replace an itinerary"),
    ("DELETE /api/itineraries/{id}", "Delete an itinerary"),
    ("GET /api/budgets", "List budgets"),
    ("POST /api/budgets", "Create a budget"),
    ("PUT /api/budgets/{id}", "Update a budget"),
    ("DELETE /api/budgets/{id}", "Delete a budget"),
    ("GET /api/memos", "List memos"),
    ("POST /api/memos", "Create a memo"),
    ("PUT /api/memos/{id}", "Update a memo"),
    ("DELETE /api/memos/{id}", "Delete a memo"),
    ("GET /api/amap/place/text", "Search places by keywords"),
];

/// Welcome document
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to TripMaster API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "timestamp": Utc::now(),
        "documentation": "/api/docs",
        "endpoints": {
            "auth": "/api/auth",
            "pois": "/api/pois",
            "itineraries": "/api/itineraries",
            "budgets": "/api/budgets",
            "memos": "/api/memos",
            "amap": "/api/amap",
        },
    }))
}

/// Endpoint listing
pub async fn docs(headers: HeaderMap) -> Json<Value> {
    let base_url = headers
        .get(HOST)
        .and_then(|host| host.to_str().ok())
        .map(|host| format!("http://{host}"));

    let endpoints = ENDPOINTS
        .iter()
        .map(|(endpoint, description)| ((*endpoint).to_string(), json!(description)))
        .collect::<serde_json::Map<String, Value>>();

    Json(json!({
        "message": "API Documentation",
        "baseUrl": base_url,
        "endpoints": endpoints,
    }))
}
