pub mod case_files;
pub mod cases;
pub mod health;
pub mod notifications;
pub mod questions;
pub mod received;

pub use case_files::{serve_case_pdf, upload_case_pdf};
pub use cases::lookup_by_document;
pub use health::health_check;
pub use notifications::{
    create_notification, get_attachment, list_all_notifications, list_by_user, pending_cases,
    serve_notification_pdf, update_notification_status,
};
pub use questions::{create_questions, list_active_questions, update_question_status};
pub use received::{serve_received_by_id, serve_received_pdf};

use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use mongodb::bson::oid::ObjectId;
use std::path::PathBuf;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::error::AppError;

/// 24-hex identifier from caller input, with the caller-facing message.
pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::Validation("Identificador inválido".to_string()))
}

/// Required request field; absent, empty and whitespace-only all count
/// as missing, mirroring the falsy checks of the original clients.
pub(crate) fn require_field(value: Option<String>, missing: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(missing.to_string())),
    }
}

pub(crate) fn multipart_error(_: MultipartError) -> AppError {
    AppError::PayloadInvalid("Error al procesar el archivo".to_string())
}

/// Buffers one uploaded PDF part. The declared content type must be
/// exactly `application/pdf`; the byte ceiling is enforced while
/// reading so an oversize part fails with its own message before the
/// body limit layer can cut the stream.
pub(crate) async fn read_pdf_field(
    mut field: Field<'_>,
    max_bytes: usize,
    too_large: &str,
) -> Result<Vec<u8>, AppError> {
    if field.content_type() != Some("application/pdf") {
        return Err(AppError::PayloadInvalid(
            "Solo se permiten archivos PDF".to_string(),
        ));
    }

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(too_large.to_string()));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Streams a resolved PDF back with the fixed inline headers.
pub(crate) async fn serve_pdf(path: PathBuf, filename: &str) -> Result<Response, AppError> {
    let file = File::open(&path).await?;
    let stream = ReaderStream::new(file);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
