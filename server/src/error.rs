//! Error responses for the list item API.
//!
//! # Design
//! Three outcomes reach the caller: a validation failure (400), a missing
//! item (404) and an internal fault (500). Internal faults are logged in full
//! where they are converted and answered with a fixed message, so no internal
//! detail leaks into the response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::model::ItemId;
use crate::store::StoreError;

pub const TITLE_REQUIRED: &str = "Item title is required";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Item with ID {0} not found")]
    NotFound(ItemId),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn title_required() -> Self {
        ApiError::Validation(TITLE_REQUIRED.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                INTERNAL_ERROR.to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(ErrorBody { error: &message })).into_response()
    }
}
