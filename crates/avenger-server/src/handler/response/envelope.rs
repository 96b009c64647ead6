use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Success half of the response envelope: `{message, data?}`.
#[must_use]
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<T> Envelope<T> {
    /// Creates a 200 response with `message` and `data`.
    pub fn new(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            status: StatusCode::OK,
        }
    }

    /// Creates a 200 read response.
    pub fn success(data: T) -> Self {
        Self::new("success", data)
    }

    /// Creates a 201 response with `message` and `data`.
    pub fn created(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self::new(message, data).with_status(StatusCode::CREATED)
    }

    /// Overrides the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
