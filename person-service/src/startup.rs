use crate::config::PersonConfig;
use crate::routes::build_router;
use crate::services::{MongoDb, MongoPersonRepository, PersonRepository};
use axum::Router;
use service_core::error::AppError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[derive(Clone)]
pub struct AppState {
    pub config: PersonConfig,
    pub repository: Arc<dyn PersonRepository>,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Connect to MongoDB, ensure indexes, and bind the HTTP listener.
    pub async fn build(config: PersonConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let repository: Arc<dyn PersonRepository> = Arc::new(MongoPersonRepository::new(db));
        Self::build_with_repository(config, repository).await
    }

    /// Bind the HTTP listener over an already constructed repository.
    pub async fn build_with_repository(
        config: PersonConfig,
        repository: Arc<dyn PersonRepository>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            repository,
        };
        let router = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, "Server is running");
        tracing::info!(
            "API available at http://localhost:{}{}",
            port,
            config.http.persons_path()
        );

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM, then close the storage connection.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(shutdown_signal()).await
    }

    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let result = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await;

        self.state.repository.shutdown().await;
        result
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
