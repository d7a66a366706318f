use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Error returned by every handler. Renders as `{"message": ...}`; server
/// side details only reach the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Access token required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("internal failure: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::WeakPassword => ApiError::Validation(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Validation("Invalid credentials".to_string()),
            AuthError::Token(_) => ApiError::InvalidToken,
            AuthError::PasswordHash | AuthError::TokenEncoding(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Store(_) => {
                error!("{self}");
                "Server error".to_string()
            }
            ApiError::Internal(_) => {
                error!("{self}");
                "Something went wrong!".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
