use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::dtos::{CaseSummaryResponse, DocumentLookupRequest, Envelope, PermitResponse};
use crate::error::AppError;
use crate::startup::AppState;

/// POST /api/estado_caso/por_documento
///
/// Two dependent lookups joined by the document number: no permit is a
/// hard 404, a permit without a case file is its own 404.
#[tracing::instrument(skip_all)]
pub async fn lookup_by_document(
    State(state): State<AppState>,
    Json(body): Json<DocumentLookupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let documento = match body.documento.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => d,
        _ => {
            return Err(AppError::Validation(
                "Debe enviar el número de documento".to_string(),
            ))
        }
    };

    let permiso = state
        .db
        .find_permit_by_document(documento)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No se encontraron permisos para este documento".to_string())
        })?;

    let hoja_vida = state
        .db
        .find_case_summary_by_document(documento)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "El documento tiene permiso, pero no se encontró hoja de vida relacionada"
                    .to_string(),
            )
        })?;

    tracing::info!(documento = %documento, "Estado de caso consultado");

    Ok(Envelope::ok(json!({
        "mensaje": "Consulta exitosa",
        "data": {
            "permiso": PermitResponse::from(permiso),
            "hoja_vida": CaseSummaryResponse::from(hoja_vida),
        }
    })))
}
