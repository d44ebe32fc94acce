use case_service::config::CaseConfig;
use case_service::startup::Application;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CaseConfig::load().map_err(|e| {
        tracing::error!("No se pudo cargar la configuración: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("No se pudo iniciar el servicio: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    tracing::info!(puerto = app.port(), "case-service iniciado");

    app.run_until_stopped().await
}
