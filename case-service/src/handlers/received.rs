use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::error::AppError;
use crate::services::PdfFamily;
use crate::startup::AppState;

use super::{parse_object_id, serve_pdf};

/// GET /api/recibidos/pdf/:filename
pub async fn serve_received_pdf(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = state
        .uploads
        .resolve_named(PdfFamily::Received, &filename)
        .await?;
    serve_pdf(path, &filename).await
}

/// GET /api/recibidos/:id
///
/// Indirect variant: looks the case up and serves whatever received
/// document its record points at.
pub async fn serve_received_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let case_id = parse_object_id(&id)?;

    let case = state
        .db
        .find_case_by_id(case_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No se encontró el documento".to_string()))?;

    let ruta = case.ruta_documento_recibido.as_deref().ok_or_else(|| {
        AppError::NotFound("El documento no tiene archivo recibido".to_string())
    })?;

    let path = state
        .uploads
        .resolve_stored(PdfFamily::Received, ruta)
        .await?;

    let filename = ruta.rsplit('/').next().unwrap_or(ruta).to_string();
    serve_pdf(path, &filename).await
}
