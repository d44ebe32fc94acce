use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Consent state meaning no notification has been handled yet.
pub const CONSENT_UNMANAGED: &str = "SIN GESTION";
/// Case status used by the pending-review listing.
pub const STATUS_PENDING_REVIEW: &str = "EN ESPERA";

/// Case file ("hoja de vida") of a person under process. Field names
/// follow the legacy uppercase schema so existing documents keep
/// deserializing untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "DOCUMENTO")]
    pub documento: String,
    #[serde(rename = "NOMBRE")]
    pub nombre: String,
    #[serde(rename = "PRIMER_APELLIDO")]
    pub primer_apellido: String,
    #[serde(rename = "SEGUNDO_APELLIDO", default, skip_serializing_if = "Option::is_none")]
    pub segundo_apellido: Option<String>,
    #[serde(rename = "ESTADO")]
    pub estado: String,
    #[serde(rename = "TEXT_NOTIFICACION", default, skip_serializing_if = "Option::is_none")]
    pub text_notificacion: Option<String>,
    #[serde(
        rename = "FECHA_INSCRIPCION",
        default,
        skip_serializing_if = "Option::is_none",
        with = "opt_chrono_datetime_as_bson_datetime"
    )]
    pub fecha_inscripcion: Option<DateTime<Utc>>,
    #[serde(
        rename = "H_ESTADO_NOTIFICACION_CONSENTIMIENTO",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub estado_notificacion_consentimiento: Option<String>,
    #[serde(rename = "PDF_URL", default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(
        rename = "RUTA_DOCUMENTO_RECIBIDO",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ruta_documento_recibido: Option<String>,
}

/// Projection returned by the document lookup. Only the fields the
/// caller screen needs travel over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseFileSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "DOCUMENTO")]
    pub documento: String,
    #[serde(rename = "NOMBRE")]
    pub nombre: String,
    #[serde(rename = "PRIMER_APELLIDO")]
    pub primer_apellido: String,
    #[serde(rename = "SEGUNDO_APELLIDO", default)]
    pub segundo_apellido: Option<String>,
    #[serde(rename = "ESTADO")]
    pub estado: String,
    #[serde(rename = "TEXT_NOTIFICACION", default)]
    pub text_notificacion: Option<String>,
    #[serde(
        rename = "FECHA_INSCRIPCION",
        default,
        with = "opt_chrono_datetime_as_bson_datetime"
    )]
    pub fecha_inscripcion: Option<DateTime<Utc>>,
}

/// Optional variant of the bson chrono helper; the stock helper only
/// covers the non-optional case.
mod opt_chrono_datetime_as_bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => bson::DateTime::from_chrono(*dt).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<bson::DateTime>::deserialize(deserializer)?;
        Ok(value.map(|dt| dt.to_chrono()))
    }
}
