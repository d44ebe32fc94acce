use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::dtos::{CreateQuestionsRequest, Envelope, QuestionResponse, UpdateQuestionStatusRequest};
use crate::error::AppError;
use crate::models::{Question, QuestionStatus};
use crate::startup::AppState;

use super::{parse_object_id, require_field};

const CREATE_MESSAGE: &str = "Faltan parámetros obligatorios o preguntas vacías";

/// POST /api/preguntas_psicologia/crear
///
/// Bulk insert. An entry without an explicit estado (or with a blank
/// one) is stored as activo.
pub async fn create_questions(
    State(state): State<AppState>,
    Json(body): Json<CreateQuestionsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id_usuario_creacion = require_field(body.id_usuario_creacion, CREATE_MESSAGE)?;
    let id_usuario_creacion = parse_object_id(&id_usuario_creacion)?;

    if body.preguntas.is_empty() {
        return Err(AppError::Validation(CREATE_MESSAGE.to_string()));
    }

    let mut questions = Vec::with_capacity(body.preguntas.len());
    for entry in body.preguntas {
        let tipo = require_field(entry.tipo, CREATE_MESSAGE)?;
        let pregunta = require_field(entry.pregunta, CREATE_MESSAGE)?;
        let estado = match entry.estado {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim().parse::<QuestionStatus>().map_err(AppError::Validation)?
            }
            _ => QuestionStatus::Activo,
        };
        questions.push(Question::new(tipo, pregunta, estado, id_usuario_creacion));
    }

    let cantidad = state.db.insert_questions(&questions).await?;

    tracing::info!(cantidad, "Preguntas de psicología creadas");

    Ok(Envelope::ok(json!({
        "mensaje": "Preguntas creadas correctamente",
        "cantidad_registros": cantidad,
    })))
}

/// GET /api/preguntas_psicologia/activas
pub async fn list_active_questions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let questions = state.db.list_active_questions().await?;
    let data: Vec<QuestionResponse> = questions.into_iter().map(QuestionResponse::from).collect();

    Ok(Envelope::ok(json!({
        "mensaje": "Consulta exitosa",
        "data": data,
    })))
}

/// PUT /api/preguntas_psicologia/actualizar-estado
pub async fn update_question_status(
    State(state): State<AppState>,
    Json(body): Json<UpdateQuestionStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id_pregunta = require_field(body.id_pregunta, "Faltan parámetros obligatorios")?;
    let estado = require_field(body.estado, "Faltan parámetros obligatorios")?;
    let id_usuario_actualiza =
        require_field(body.id_usuario_actualiza, "Faltan parámetros obligatorios")?;

    let estado: QuestionStatus = estado.trim().parse().map_err(AppError::Validation)?;
    let id_pregunta = parse_object_id(&id_pregunta)?;
    let id_usuario_actualiza = parse_object_id(&id_usuario_actualiza)?;

    let updated = state
        .db
        .update_question_status(id_pregunta, estado, id_usuario_actualiza)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No se encontró la pregunta para actualizar".to_string())
        })?;

    tracing::info!(id = %id_pregunta, estado = %estado, "Estado de pregunta actualizado");

    Ok(Envelope::ok(json!({
        "mensaje": "Estado actualizado correctamente",
        "pregunta": QuestionResponse::from(updated),
    })))
}
