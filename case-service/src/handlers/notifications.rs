use axum::{
    extract::{Host, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::dtos::{
    AttachmentParams, Envelope, ListByUserParams, NotificationResponse, NotificationSummary,
    PendingCase, UpdateStatusRequest,
};
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{Notification, NotificationStatus};
use crate::services::{PdfFamily, MAX_NOTIFICATION_PDF_BYTES};
use crate::startup::AppState;

use super::{multipart_error, parse_object_id, read_pdf_field, require_field, serve_pdf};

const ACCEPTED_FILE_FIELDS: [&str; 3] = ["pdf", "documento_adjunto", "archivo"];
const FILE_FIELD_MESSAGE: &str =
    "Campo de archivo inválido. Use 'pdf', 'documento_adjunto' o 'archivo'";

/// POST /api/notificaciones/crear
///
/// Multipart: the three text fields are mandatory, the PDF is optional
/// and accepted under any one of three historical field names. The
/// stored record is explicitly ACTIVO even though the model default is
/// INACTIVO.
pub async fn create_notification(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut id_usuario: Option<String> = None;
    let mut asunto: Option<String> = None;
    let mut mensaje: Option<String> = None;
    let mut pdf: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        match name.as_str() {
            "id_usuario" if !is_file => {
                id_usuario = Some(field.text().await.map_err(multipart_error)?)
            }
            "asunto" if !is_file => asunto = Some(field.text().await.map_err(multipart_error)?),
            "mensaje" if !is_file => mensaje = Some(field.text().await.map_err(multipart_error)?),
            name if is_file && ACCEPTED_FILE_FIELDS.contains(&name) => {
                if pdf.is_some() {
                    return Err(AppError::UnexpectedField(FILE_FIELD_MESSAGE.to_string()));
                }
                pdf = Some(
                    read_pdf_field(
                        field,
                        MAX_NOTIFICATION_PDF_BYTES,
                        "El archivo excede los 100MB permitidos",
                    )
                    .await?,
                );
            }
            _ if is_file => return Err(AppError::UnexpectedField(FILE_FIELD_MESSAGE.to_string())),
            // unknown text fields are ignored
            _ => {}
        }
    }

    let id_usuario = require_field(id_usuario, "Faltan parámetros obligatorios")?;
    let asunto = require_field(asunto, "Faltan parámetros obligatorios")?;
    let mensaje = require_field(mensaje, "Faltan parámetros obligatorios")?;
    let id_usuario = parse_object_id(&id_usuario)?;

    let ruta_documento_adjunto = match pdf {
        Some(data) => {
            let stored = state.uploads.store_notification_pdf(&data).await?;
            tracing::info!(archivo = %stored.filename, bytes = data.len(), "Adjunto almacenado");
            Some(stored.relative_path)
        }
        None => None,
    };

    let record = Notification::new(id_usuario, asunto, mensaje, ruta_documento_adjunto)
        .with_status(NotificationStatus::Activo);
    let id = state.db.insert_notification(&record).await?;

    tracing::info!(id = %id, id_usuario = %id_usuario, "Notificación creada");

    Ok((
        StatusCode::CREATED,
        Envelope::ok(json!({
            "mensaje": "Registro creado correctamente",
            "id": id.to_hex(),
        })),
    ))
}

/// GET /api/notificaciones/listar-por-usuario?id_usuario=
///
/// Newest first; each row carries an absolute URL for its attachment
/// built from the request host, or null.
pub async fn list_by_user(
    State(state): State<AppState>,
    Host(host): Host,
    Query(params): Query<ListByUserParams>,
) -> Result<impl IntoResponse, AppError> {
    let id_usuario = require_field(params.id_usuario, "El id_usuario es obligatorio")?;
    let id_usuario = parse_object_id(&id_usuario)?;

    let notifications = state.db.list_notifications_by_user(id_usuario).await?;

    let base_url = format!("http://{host}");
    let rows: Vec<NotificationSummary> = notifications
        .into_iter()
        .map(|n| NotificationSummary::from_record(n, &base_url))
        .collect();

    Ok(Envelope::ok(rows))
}

/// PUT /api/notificaciones/actualizar-estado
pub async fn update_notification_status(
    State(state): State<AppState>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id_usuario = require_field(body.id_usuario, "Faltan parámetros obligatorios")?;
    let id_notificacion = require_field(body.id_notificacion, "Faltan parámetros obligatorios")?;
    let estado = require_field(body.estado, "Faltan parámetros obligatorios")?;

    let estado: NotificationStatus = estado.trim().parse().map_err(AppError::Validation)?;
    let id_notificacion = parse_object_id(&id_notificacion)?;
    let id_usuario = parse_object_id(&id_usuario)?;

    let updated = state
        .db
        .update_notification_status(id_notificacion, id_usuario, estado)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No se encontró la notificación para actualizar".to_string())
        })?;

    tracing::info!(id = %id_notificacion, estado = %estado, "Estado de notificación actualizado");

    Ok(Envelope::ok(json!({
        "mensaje": "Estado actualizado correctamente",
        "notificacion": NotificationResponse::from(updated),
    })))
}

/// GET /api/notificaciones/obtener-documento?id_notificacion=
///
/// Serves the attachment through the path stored on the record; the
/// fixed download name matches the historical contract.
pub async fn get_attachment(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(params): Query<AttachmentParams>,
) -> Result<Response, AppError> {
    let id_notificacion = require_field(params.id_notificacion, "El id_notificacion es obligatorio")?;
    let id = parse_object_id(&id_notificacion)?;

    let notificacion = state
        .db
        .find_notification_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notificación no encontrada".to_string()))?;

    let ruta = notificacion.ruta_documento_adjunto.as_deref().ok_or_else(|| {
        AppError::NotFound("La notificación no tiene archivo adjunto".to_string())
    })?;

    let path = state
        .uploads
        .resolve_stored(PdfFamily::Notification, ruta)
        .await?;

    tracing::info!(
        id_notificacion = %id,
        id_usuario = claims.id_usuario.as_deref().unwrap_or("-"),
        "Documento adjunto entregado"
    );

    serve_pdf(path, "documento.pdf").await
}

/// GET /api/notificaciones/casos_pendientes
///
/// Cases whose consent state is still unmanaged, each joined with its
/// most recent active notification. The join is one lookup per case;
/// the pending set is expected to stay small. An empty set keeps the
/// historical 200-with-error-flag shape.
#[tracing::instrument(skip_all)]
pub async fn pending_cases(State(state): State<AppState>) -> Result<Response, AppError> {
    let cases = state.db.list_pending_consent_cases().await?;

    if cases.is_empty() {
        return Ok(
            Envelope::failed(json!({ "mensaje": "No hay casos pendientes" })).into_response(),
        );
    }

    let mut data = Vec::with_capacity(cases.len());
    for case in cases {
        let latest = match case.id {
            Some(id) => state.db.find_latest_active_notification_for(id).await?,
            None => None,
        };
        data.push(PendingCase::new(case, latest));
    }

    tracing::info!(casos = data.len(), "Casos pendientes consultados");

    Ok(Envelope::ok(json!({
        "mensaje": "Consulta exitosa",
        "data": data,
    }))
    .into_response())
}

/// GET /api/notificaciones/consultar
pub async fn list_all_notifications(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let notifications = state.db.list_all_notifications().await?;
    let total = notifications.len();
    let rows: Vec<NotificationResponse> = notifications
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    Ok(Envelope::ok(json!({
        "mensaje": format!("Se encontraron {total} notificaciones"),
        "total": total,
        "notificaciones": rows,
    })))
}

/// GET /api/notificaciones/pdf/:filename
pub async fn serve_notification_pdf(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = state
        .uploads
        .resolve_named(PdfFamily::Notification, &filename)
        .await?;
    serve_pdf(path, &filename).await
}
