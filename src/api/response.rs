//! API response helpers

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::database;

/// Hold data for a successful API interaction
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    data: V,
}

impl<V> Success<V>
where
    V: Serialize,
{
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: V) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            data,
        }
    }
}

/// Confirmation without any other content, used for deletions
#[derive(Serialize)]
pub struct Message {
    message: String,
}

impl Success<Message> {
    pub fn message<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::ok(Message {
            message: message.to_string(),
        })
    }
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (self.status_code, Json(self.data)).into_response()
    }
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    message: String,
    description: Option<String>,
}

impl Error {
    fn new<M>(status_code: StatusCode, message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code,
            message: message.to_string(),
            description: None,
        }
    }

    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_description<M>(self, description: M) -> Self
    where
        M: ToString,
    {
        Self {
            description: Some(description.to_string()),
            ..self
        }
    }

    /// Map a storage error
    ///
    /// Details of unexpected failures are logged, but never sent to the client
    pub fn database(err: database::Error) -> Self {
        match err {
            database::Error::Conflict(detail) => {
                Self::conflict("Resource already exists").with_description(detail)
            }
            database::Error::Reference(detail) => {
                Self::conflict("Resource is still in use").with_description(detail)
            }
            database::Error::ForeignPoi(id) => {
                Self::conflict("POI belongs to another user").with_description(id)
            }
            err => {
                tracing::error!("Database error: {err}");

                Self::internal_server_error("Database error")
            }
        }
    }

    /// Map a storage error, with a custom message for conflicts
    pub fn database_or_conflict<M>(message: M) -> impl FnOnce(database::Error) -> Self
    where
        M: ToString,
    {
        move |err| match err {
            database::Error::Conflict(_) | database::Error::Reference(_) => Self::conflict(message),
            err => Self::database(err),
        }
    }
}

#[derive(Serialize)]
struct ErrorWrapper<D>
where
    D: Serialize,
{
    error: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<D>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorWrapper {
                error: self.message,
                description: self.description,
            }),
        )
            .into_response()
    }
}
