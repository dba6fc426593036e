//! Verify that the configured MongoDB deployment is reachable, then exit.

use person_service::config::PersonConfig;
use person_service::services::MongoDb;
use service_core::observability::init_tracing;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match PersonConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing("check-connection", &config.log_level, None);
    tracing::info!("Testing MongoDB connection");

    match MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await {
        Ok(db) => {
            tracing::info!(
                database = %db.database().name(),
                "MongoDB connection test succeeded"
            );
            db.shutdown().await;
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("MongoDB connection test failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
