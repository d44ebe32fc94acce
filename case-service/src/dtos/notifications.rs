use crate::models::{CaseFile, Notification, NotificationStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ListByUserParams {
    pub id_usuario: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentParams {
    pub id_notificacion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id_usuario: Option<String>,
    pub id_notificacion: Option<String>,
    pub estado: Option<String>,
}

/// Full notification record as the admin listing and the status update
/// return it.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub id_usuario: String,
    pub asunto: String,
    pub mensaje: String,
    pub ruta_documento_adjunto: Option<String>,
    pub estado: NotificationStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.map(|id| id.to_hex()).unwrap_or_default(),
            id_usuario: n.id_usuario.to_hex(),
            asunto: n.asunto,
            mensaje: n.mensaje,
            ruta_documento_adjunto: n.ruta_documento_adjunto,
            estado: n.estado,
            created_at: n.created_at.to_rfc3339(),
            updated_at: n.updated_at.to_rfc3339(),
        }
    }
}

/// Per-user listing entry. `documento_adjunto` carries an absolute URL
/// of the authenticated PDF route, or null when nothing was attached.
#[derive(Debug, Serialize)]
pub struct NotificationSummary {
    pub id: String,
    pub asunto: String,
    pub mensaje: String,
    pub estado: NotificationStatus,
    pub fecha_creacion: String,
    pub documento_adjunto: Option<String>,
}

impl NotificationSummary {
    pub fn from_record(n: Notification, base_url: &str) -> Self {
        let documento_adjunto = n.ruta_documento_adjunto.as_deref().map(|ruta| {
            let nombre = ruta.rsplit('/').next().unwrap_or(ruta);
            format!("{base_url}/api/notificaciones/pdf/{nombre}")
        });
        Self {
            id: n.id.map(|id| id.to_hex()).unwrap_or_default(),
            asunto: n.asunto,
            mensaje: n.mensaje,
            estado: n.estado,
            fecha_creacion: n.created_at.to_rfc3339(),
            documento_adjunto,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingNotification {
    #[serde(rename = "_id")]
    pub id: String,
    pub asunto: String,
    pub mensaje: String,
    pub ruta_documento_adjunto: Option<String>,
}

impl From<Notification> for PendingNotification {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.map(|id| id.to_hex()).unwrap_or_default(),
            asunto: n.asunto,
            mensaje: n.mensaje,
            ruta_documento_adjunto: n.ruta_documento_adjunto,
        }
    }
}

/// One row of the pending-consent aggregation: the case name fields
/// plus its latest active notification, when one exists.
#[derive(Debug, Serialize)]
pub struct PendingCase {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "NOMBRE")]
    pub nombre: String,
    #[serde(rename = "PRIMER_APELLIDO")]
    pub primer_apellido: String,
    #[serde(rename = "SEGUNDO_APELLIDO", skip_serializing_if = "Option::is_none")]
    pub segundo_apellido: Option<String>,
    pub notificacion: Option<PendingNotification>,
}

impl PendingCase {
    pub fn new(case: CaseFile, latest: Option<Notification>) -> Self {
        Self {
            id: case.id.map(|id| id.to_hex()).unwrap_or_default(),
            nombre: case.nombre,
            primer_apellido: case.primer_apellido,
            segundo_apellido: case.segundo_apellido,
            notificacion: latest.map(PendingNotification::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn sample(ruta: Option<&str>) -> Notification {
        Notification::new(
            ObjectId::new(),
            "Citación".into(),
            "Preséntese el lunes".into(),
            ruta.map(str::to_string),
        )
    }

    #[test]
    fn summary_builds_an_absolute_url_from_the_stored_path() {
        let mut n = sample(Some("/uploads/notificaciones/notificacion_1700000000000.pdf"));
        n.id = Some(ObjectId::new());
        let summary = NotificationSummary::from_record(n, "http://localhost:8080");
        assert_eq!(
            summary.documento_adjunto.as_deref(),
            Some("http://localhost:8080/api/notificaciones/pdf/notificacion_1700000000000.pdf")
        );
    }

    #[test]
    fn summary_attachment_is_null_without_a_stored_path() {
        let summary = NotificationSummary::from_record(sample(None), "http://localhost:8080");
        assert!(summary.documento_adjunto.is_none());
        let rendered = serde_json::to_value(&summary).expect("serialize");
        assert!(rendered["documento_adjunto"].is_null());
    }

    #[test]
    fn pending_case_serializes_a_null_notification() {
        let case = CaseFile {
            id: Some(ObjectId::new()),
            documento: "79456123".into(),
            nombre: "CARLOS".into(),
            primer_apellido: "RAMIREZ".into(),
            segundo_apellido: None,
            estado: "EN ESPERA".into(),
            text_notificacion: None,
            fecha_inscripcion: None,
            estado_notificacion_consentimiento: Some("SIN GESTION".into()),
            pdf_url: None,
            ruta_documento_recibido: None,
        };
        let rendered = serde_json::to_value(PendingCase::new(case, None)).expect("serialize");
        assert!(rendered["notificacion"].is_null());
        assert!(rendered.get("SEGUNDO_APELLIDO").is_none());
        assert_eq!(rendered["NOMBRE"], "CARLOS");
    }
}
