//! Response envelopes and error mapping.

use std::time::Instant;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::dates::DateError;
use crate::presence::{PresenceError, PresenceSnapshot};

/// Errors surfaced to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid format Use MM/DD/YY")]
    InvalidFormat,

    #[error("invalid date")]
    InvalidDate,

    /// Upstream gave us nothing usable. The cause is not asserted.
    #[error("presence data unavailable")]
    PresenceUnavailable,

    #[error("not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidFormat | ApiError::InvalidDate => StatusCode::BAD_REQUEST,
            ApiError::PresenceUnavailable | ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<DateError> for ApiError {
    fn from(err: DateError) -> Self {
        match err {
            DateError::Format => ApiError::InvalidFormat,
            DateError::InvalidDate => ApiError::InvalidDate,
        }
    }
}

impl From<PresenceError> for ApiError {
    fn from(_: PresenceError) -> Self {
        ApiError::PresenceUnavailable
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeResponse {
    pub age: u32,
    pub next_birthday: String,
    pub timetook: String,
}

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    #[serde(flatten)]
    pub snapshot: PresenceSnapshot,
    pub timetook: String,
}

/// Handler time formatted as `<millis>ms`.
pub fn elapsed(start: Instant) -> String {
    format!("{}ms", start.elapsed().as_millis())
}
