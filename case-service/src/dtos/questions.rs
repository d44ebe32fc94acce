use crate::models::{Question, QuestionStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateQuestionsRequest {
    pub id_usuario_creacion: Option<String>,
    #[serde(default)]
    pub preguntas: Vec<QuestionInput>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    pub tipo: Option<String>,
    pub pregunta: Option<String>,
    pub estado: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionStatusRequest {
    pub id_pregunta: Option<String>,
    pub estado: Option<String>,
    pub id_usuario_actualiza: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub tipo: String,
    pub pregunta: String,
    pub estado: QuestionStatus,
    pub id_usuario_creacion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_usuario_actualiza: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        Self {
            id: q.id.map(|id| id.to_hex()).unwrap_or_default(),
            tipo: q.tipo,
            pregunta: q.pregunta,
            estado: q.estado,
            id_usuario_creacion: q.id_usuario_creacion.to_hex(),
            id_usuario_actualiza: q.id_usuario_actualiza.map(|id| id.to_hex()),
            created_at: q.created_at.to_rfc3339(),
            updated_at: q.updated_at.to_rfc3339(),
        }
    }
}
