//! Health check

use std::time::Instant;

use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::Utc;
use serde_json::json;

use crate::database::Database;

/// Moment the process started serving
#[derive(Clone, Copy)]
pub struct Uptime(Instant);

impl Uptime {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    fn seconds(self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}

/// Report process and database health
///
/// `503 Service Unavailable` when the database can not be reached
pub async fn health(
    Extension(database): Extension<Database>,
    Extension(uptime): Extension<Uptime>,
) -> Response {
    match database.now().await {
        Ok(db_time) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "timestamp": Utc::now(),
                "database": "connected",
                "uptime": uptime.seconds(),
                "dbTime": db_time,
            })),
        )
            .into_response(),
        Err(err) => {
            tracing::warn!("Health check failed: {err}");

            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": Utc::now(),
                    "database": "disconnected",
                    "error": err.to_string(),
                })),
            )
                .into_response()
        }
    }
}
