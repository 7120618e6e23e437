//! API response envelope.
//!
//! Every success body is `{code, status: "success", message?, data}`.
//! Errors use the same outer shape via `AppError`'s `IntoResponse`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    message: Option<String>,
    data: T,
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    code: u16,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    data: &'a T,
}

impl<T: Serialize> ApiResponse<T> {
    /// `200 OK` response.
    pub const fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: None,
            data,
        }
    }

    /// `201 Created` response.
    pub const fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: None,
            data,
        }
    }

    /// Attach a human readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload; `data` serializes as `null`.
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(()).with_message(message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            code: self.status.as_u16(),
            status: "success",
            message: self.message.as_deref(),
            data: &self.data,
        };
        (self.status, Json(body)).into_response()
    }
}
