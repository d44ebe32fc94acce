use std::future::IntoFuture;
use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::CaseConfig;
use crate::error::AppError;
use crate::handlers;
use crate::middleware;
use crate::services::{JwtVerifier, MongoDb, UploadStore};

// Transport ceilings sit above the per-file limits so the handlers get
// to reject oversize uploads with their own message instead of the
// stream being cut mid-body.
const NOTIFICATION_BODY_LIMIT: usize = 105 * 1024 * 1024;
const CASE_BODY_LIMIT: usize = 45 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: CaseConfig,
    pub db: MongoDb,
    pub jwt: JwtVerifier,
    pub uploads: UploadStore,
}

/// Assembles the full route table. The case lookup and the health probe
/// are open; every other /api route sits behind the bearer guard.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/notificaciones/crear",
            post(handlers::create_notification)
                .layer(DefaultBodyLimit::max(NOTIFICATION_BODY_LIMIT)),
        )
        .route(
            "/api/notificaciones/listar-por-usuario",
            get(handlers::list_by_user),
        )
        .route(
            "/api/notificaciones/actualizar-estado",
            put(handlers::update_notification_status),
        )
        .route(
            "/api/notificaciones/obtener-documento",
            get(handlers::get_attachment),
        )
        .route(
            "/api/notificaciones/casos_pendientes",
            get(handlers::pending_cases),
        )
        .route(
            "/api/notificaciones/consultar",
            get(handlers::list_all_notifications),
        )
        .route(
            "/api/notificaciones/pdf/:filename",
            get(handlers::serve_notification_pdf),
        )
        .route(
            "/api/hoja_vida/pdf",
            put(handlers::upload_case_pdf).layer(DefaultBodyLimit::max(CASE_BODY_LIMIT)),
        )
        .route("/api/hoja_vida/pdf/:filename", get(handlers::serve_case_pdf))
        .route("/api/recibidos/pdf/:filename", get(handlers::serve_received_pdf))
        .route("/api/recibidos/:id", get(handlers::serve_received_by_id))
        .route(
            "/api/preguntas_psicologia/crear",
            post(handlers::create_questions),
        )
        .route(
            "/api/preguntas_psicologia/activas",
            get(handlers::list_active_questions),
        )
        .route(
            "/api/preguntas_psicologia/actualizar-estado",
            put(handlers::update_question_status),
        )
        .layer(from_fn_with_state(state.clone(), middleware::require_bearer));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/estado_caso/por_documento",
            post(handlers::lookup_by_document),
        )
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: CaseConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Fallo la conexión a MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Fallo la creación de índices: {}", e);
            e
        })?;

        let uploads = UploadStore::new(&config.uploads.root);
        uploads.ensure_directories().await.map_err(|e| {
            tracing::error!(
                "Fallo la preparación del directorio de archivos {}: {}",
                config.uploads.root,
                e
            );
            e
        })?;

        let jwt = JwtVerifier::new(config.jwt.secret.as_deref());
        if config.jwt.secret.is_none() {
            tracing::warn!("JWT_SECRET sin configurar; las rutas protegidas responderán 500");
        }

        let state = AppState {
            config: config.clone(),
            db,
            jwt,
            uploads,
        };

        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("No se pudo enlazar el puerto {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Escuchando en el puerto {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
