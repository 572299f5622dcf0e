/*
 * Responsibility
 * - Application-wide AppError (the only error type handlers return)
 * - translate(): error category -> HTTP status + uniform {code, message} body
 * - IntoResponse: the single place a returned error becomes a response
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::repos::error::RepoError;
use crate::services::auth::InvalidToken;

/// Error body shared by every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed routing-layer validation (malformed JSON, path, query or DTO rules).
    #[error("{0}")]
    BadRequest(String),
    /// No identity on a request that needs one.
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid token")]
    InvalidToken,
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("forbidden: admin required")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Map an error to its status code and response body.
///
/// Unclassified (`Internal`) errors keep their raw message text.
pub fn translate(err: &AppError) -> (StatusCode, ErrorBody) {
    let status = match err {
        AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound => StatusCode::NOT_FOUND,
        AppError::Conflict => StatusCode::CONFLICT,
        AppError::InvalidCredentials | AppError::Unauthorized | AppError::InvalidToken => {
            StatusCode::UNAUTHORIZED
        }
        AppError::Forbidden => StatusCode::FORBIDDEN,
        AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, ErrorBody::new(status, err.to_string()))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = translate(&self);

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Conflict => AppError::Conflict,
            RepoError::Db(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<InvalidToken> for AppError {
    fn from(_: InvalidToken) -> Self {
        AppError::InvalidToken
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.to_string())
    }
}
