use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Availability of a questionnaire entry. Unlike notifications, this
/// catalog stores its states in lowercase and defaults to `activo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    #[default]
    Activo,
    Inactivo,
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionStatus::Activo => write!(f, "activo"),
            QuestionStatus::Inactivo => write!(f, "inactivo"),
        }
    }
}

impl std::str::FromStr for QuestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activo" => Ok(QuestionStatus::Activo),
            "inactivo" => Ok(QuestionStatus::Inactivo),
            _ => Err("Estado inválido: use 'activo' o 'inactivo'".to_string()),
        }
    }
}

/// Entry of the psychology questionnaire catalog. Collection:
/// `cl_preguntas_psicologia`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tipo: String,
    pub pregunta: String,
    #[serde(default)]
    pub estado: QuestionStatus,
    pub id_usuario_creacion: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_usuario_actualiza: Option<ObjectId>,
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

impl Question {
    pub fn new(
        tipo: String,
        pregunta: String,
        estado: QuestionStatus,
        id_usuario_creacion: ObjectId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            tipo,
            pregunta,
            estado,
            id_usuario_creacion,
            id_usuario_actualiza: None,
            created_at: now,
            updated_at: now,
        }
    }
}
