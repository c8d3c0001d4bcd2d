// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of callcast errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use callcast_core::CallcastError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short error description.
    pub error: String,
    /// Underlying failure, when there is one worth showing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error returned by gateway handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A domain failure from the campaign, ingest, or storage layers.
    Domain(CallcastError),
    /// A request the handler could not interpret.
    BadRequest(String),
    /// Missing or wrong credentials.
    Unauthorized,
}

impl From<CallcastError> for ApiError {
    fn from(err: CallcastError) -> Self {
        Self::Domain(err)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Domain(CallcastError::Format(_) | CallcastError::MissingColumn { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid contact list")
            }
            ApiError::Domain(CallcastError::UnsupportedEvent { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid webhook type")
            }
            ApiError::Domain(CallcastError::Invalid(_)) => {
                (StatusCode::BAD_REQUEST, "invalid request format")
            }
            ApiError::Domain(CallcastError::NotFound { .. }) => (StatusCode::NOT_FOUND, "not found"),
            ApiError::Domain(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid request format"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        let details = match self {
            ApiError::Domain(err) => {
                if status.is_server_error() {
                    tracing::error!(error = %err, "request failed");
                }
                Some(err.to_string())
            }
            ApiError::BadRequest(detail) => Some(detail),
            ApiError::Unauthorized => None,
        };
        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                details,
            }),
        )
            .into_response()
    }
}
