use person_service::config::PersonConfig;
use person_service::services::init_metrics;
use person_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = PersonConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        database = %config.mongodb.database,
        "Starting person service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    shutdown_tracing();
    Ok(())
}
