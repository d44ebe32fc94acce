use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Request-level failure taxonomy. Every variant carries (or maps to) the
/// client-facing Spanish message; internal causes are logged, never exposed.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadInvalid(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    UnexpectedField(String),

    #[error("Nombre de archivo inválido")]
    BadFilename,

    #[error("Servidor sin JWT_SECRET configurado")]
    MissingJwtSecret,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::PayloadInvalid(_)
            | AppError::PayloadTooLarge(_)
            | AppError::UnexpectedField(_)
            | AppError::BadFilename => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingJwtSecret
            | AppError::Config(_)
            | AppError::Database(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Infrastructure faults collapse to the
    /// legacy catch-all; the real cause only goes to the logs.
    fn mensaje(&self) -> String {
        match self {
            AppError::Config(_)
            | AppError::Database(_)
            | AppError::Io(_)
            | AppError::Internal(_) => "Error inesperado".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = json!({
            "error": 1,
            "response": { "mensaje": self.mensaje() }
        });

        (status, Json(body)).into_response()
    }
}
