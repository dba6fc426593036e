use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    /// The identifier is not in the format the storage layer expects.
    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) | AppError::MalformedId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, message) = match self {
            AppError::ValidationError(err) => ("Validation error", err.to_string()),
            AppError::BadRequest(err) => ("Bad request", err.to_string()),
            AppError::MalformedId(id) => ("Malformed identifier", format!("Invalid id: {}", id)),
            AppError::NotFound(err) => ("Not found", err.to_string()),
            AppError::MethodNotAllowed => (
                "Method not allowed",
                "Method not allowed for this route".to_string(),
            ),
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Internal server error");
                ("Internal server error", err.to_string())
            }
            AppError::ServiceUnavailable => {
                ("Service unavailable", "Service unavailable".to_string())
            }
            AppError::DatabaseError(err) => {
                tracing::error!(error = %err, "Database error");
                ("Database error", err.to_string())
            }
            AppError::ConfigError(err) => ("Configuration error", err.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
