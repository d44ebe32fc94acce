use crate::models::{CaseFileSummary, Permit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DocumentLookupRequest {
    pub documento: Option<String>,
}

/// Permit summary inside the document-lookup response. The wire keeps
/// the legacy `Pe_` names; `Pe_TipoPermiso` and `Pe_FechaPermiso` are
/// renamed views of the stored permit type and creation timestamp.
#[derive(Debug, Serialize)]
pub struct PermitResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Pe_Documento")]
    pub documento: String,
    #[serde(rename = "Pe_TipoPermiso")]
    pub tipo_permiso: String,
    #[serde(rename = "Pe_FechaPermiso")]
    pub fecha_permiso: String,
    #[serde(rename = "Pe_Observaciones")]
    pub observaciones: String,
}

impl From<Permit> for PermitResponse {
    fn from(permit: Permit) -> Self {
        Self {
            id: permit.id.map(|id| id.to_hex()).unwrap_or_default(),
            documento: permit.documento,
            tipo_permiso: permit.permiso,
            fecha_permiso: permit.created_at.to_rfc3339(),
            observaciones: permit.observaciones.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaseSummaryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "DOCUMENTO")]
    pub documento: String,
    #[serde(rename = "NOMBRE")]
    pub nombre: String,
    #[serde(rename = "PRIMER_APELLIDO")]
    pub primer_apellido: String,
    #[serde(rename = "SEGUNDO_APELLIDO", skip_serializing_if = "Option::is_none")]
    pub segundo_apellido: Option<String>,
    #[serde(rename = "ESTADO")]
    pub estado: String,
    #[serde(rename = "TEXT_NOTIFICACION", skip_serializing_if = "Option::is_none")]
    pub text_notificacion: Option<String>,
    #[serde(rename = "FECHA_INSCRIPCION", skip_serializing_if = "Option::is_none")]
    pub fecha_inscripcion: Option<String>,
}

impl From<CaseFileSummary> for CaseSummaryResponse {
    fn from(summary: CaseFileSummary) -> Self {
        Self {
            id: summary.id.to_hex(),
            documento: summary.documento,
            nombre: summary.nombre,
            primer_apellido: summary.primer_apellido,
            segundo_apellido: summary.segundo_apellido,
            estado: summary.estado,
            text_notificacion: summary.text_notificacion,
            fecha_inscripcion: summary.fecha_inscripcion.map(|dt| dt.to_rfc3339()),
        }
    }
}
