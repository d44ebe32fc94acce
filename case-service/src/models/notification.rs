use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a notification. The stored schema defaults to
/// INACTIVO; the creation flow always sets ACTIVO explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationStatus {
    Activo,
    #[default]
    Inactivo,
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStatus::Activo => write!(f, "ACTIVO"),
            NotificationStatus::Inactivo => write!(f, "INACTIVO"),
        }
    }
}

impl std::str::FromStr for NotificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVO" => Ok(NotificationStatus::Activo),
            "INACTIVO" => Ok(NotificationStatus::Inactivo),
            _ => Err("Estado inválido: use 'ACTIVO' o 'INACTIVO'".to_string()),
        }
    }
}

/// A message sent to (or about) a case, with an optional stored PDF
/// attachment path. Collection: `Cl_Notificaciones_mail_whatsapp`.
/// Records are never hard-deleted; they are only toggled via `estado`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Owning user; in the consent flow this holds a CaseFile id.
    pub id_usuario: ObjectId,
    pub asunto: String,
    pub mensaje: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruta_documento_adjunto: Option<String>,
    #[serde(default)]
    pub estado: NotificationStatus,
    #[serde(
        rename = "createdAt",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        rename = "updatedAt",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// New record carrying the schema default status (INACTIVO).
    pub fn new(
        id_usuario: ObjectId,
        asunto: String,
        mensaje: String,
        ruta_documento_adjunto: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            id_usuario,
            asunto,
            mensaje,
            ruta_documento_adjunto,
            estado: NotificationStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, estado: NotificationStatus) -> Self {
        self.estado = estado;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn status_defaults_to_inactivo() {
        let n = Notification::new(
            ObjectId::new(),
            "asunto".into(),
            "mensaje".into(),
            None,
        );
        assert_eq!(n.estado, NotificationStatus::Inactivo);
        assert_eq!(
            n.with_status(NotificationStatus::Activo).estado,
            NotificationStatus::Activo
        );
    }

    #[test]
    fn status_round_trips_through_the_legacy_strings() {
        assert_eq!(NotificationStatus::Activo.to_string(), "ACTIVO");
        assert_eq!("INACTIVO".parse(), Ok(NotificationStatus::Inactivo));
        assert!("activo".parse::<NotificationStatus>().is_err());
    }

    #[test]
    fn missing_estado_deserializes_to_the_schema_default() {
        let doc = bson::doc! {
            "_id": ObjectId::new(),
            "id_usuario": ObjectId::new(),
            "asunto": "Citación",
            "mensaje": "Preséntese",
            "createdAt": bson::DateTime::now(),
            "updatedAt": bson::DateTime::now(),
        };
        let n: Notification = bson::from_document(doc).expect("deserialize");
        assert_eq!(n.estado, NotificationStatus::Inactivo);
        assert!(n.ruta_documento_adjunto.is_none());
    }
}
