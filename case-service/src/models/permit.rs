use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Permit granted to a person, keyed by national document number. The
/// legacy collection uses `Pe_`-prefixed field names; this service only
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permit {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "Pe_Documento")]
    pub documento: String,
    #[serde(rename = "Pe_Permiso")]
    pub permiso: String,
    #[serde(rename = "Pe_Observaciones", default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    #[serde(
        rename = "createdAt",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
}
