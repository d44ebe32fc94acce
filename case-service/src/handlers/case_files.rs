use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::dtos::Envelope;
use crate::error::AppError;
use crate::services::{PdfFamily, MAX_CASE_PDF_BYTES};
use crate::startup::AppState;

use super::{multipart_error, parse_object_id, read_pdf_field, require_field, serve_pdf};

/// PUT /api/hoja_vida/pdf
///
/// Multipart with an "id" text field and a "pdf" file field. Storing
/// the PDF also moves the case into the pending-review state.
pub async fn upload_case_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut id: Option<String> = None;
    let mut pdf: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        match name.as_str() {
            "id" if !is_file => id = Some(field.text().await.map_err(multipart_error)?),
            "pdf" if is_file => {
                if pdf.is_some() {
                    return Err(AppError::UnexpectedField(
                        "Error al procesar el archivo".to_string(),
                    ));
                }
                pdf = Some(
                    read_pdf_field(
                        field,
                        MAX_CASE_PDF_BYTES,
                        "El archivo excede el límite de 40 MB",
                    )
                    .await?,
                );
            }
            _ if is_file => {
                return Err(AppError::UnexpectedField(
                    "Error al procesar el archivo".to_string(),
                ))
            }
            _ => {}
        }
    }

    let id = require_field(id, "Faltan parámetros requeridos")?;
    let pdf = pdf.ok_or_else(|| AppError::Validation("Faltan parámetros requeridos".to_string()))?;
    let case_id = parse_object_id(&id)?;

    let stored = state
        .uploads
        .store_case_pdf(&case_id.to_hex(), &pdf)
        .await?;

    let updated = state
        .db
        .attach_case_pdf(case_id, &stored.relative_path)
        .await?
        .ok_or_else(|| AppError::NotFound("No se encontró el documento".to_string()))?;

    tracing::info!(
        id = %case_id,
        archivo = %stored.filename,
        bytes = pdf.len(),
        "PDF de hoja de vida almacenado"
    );

    Ok(Envelope::ok(json!({
        "mensaje": "PDF almacenado correctamente",
        "id": updated.id.map(|oid| oid.to_hex()),
        "url": stored.relative_path,
    })))
}

/// GET /api/hoja_vida/pdf/:filename
pub async fn serve_case_pdf(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = state
        .uploads
        .resolve_named(PdfFamily::CaseFile, &filename)
        .await?;
    serve_pdf(path, &filename).await
}
