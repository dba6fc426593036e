//! Shared setup for person-service integration tests.
//!
//! Every app here runs over an in-memory repository unless a test opts into
//! MongoDB explicitly.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use mongodb::bson::oid::ObjectId;
use person_service::config::{HttpConfig, MongoConfig, PersonConfig};
use person_service::models::{NewPerson, Person};
use person_service::services::{InMemoryPersonRepository, PersonRepository};
use person_service::startup::{AppState, Application};
use person_service::build_router;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use tower::ServiceExt;

pub const PERSONS: &str = "/api/persons";

pub fn test_config() -> PersonConfig {
    PersonConfig {
        common: CoreConfig { port: 0 },
        service_name: "person-service".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "person_test".to_string(),
        },
        http: HttpConfig {
            base_path: "/api".to_string(),
        },
    }
}

/// Router over an in-memory repository, driven with `oneshot`.
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryPersonRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryPersonRepository::new());
        let state = AppState {
            config: test_config(),
            repository: repository.clone(),
        };
        Self {
            router: build_router(state),
            repository,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        send(&self.router, method, uri, body).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(
        &self,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        self.request(Method::PUT, uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a person and return the response body; panics unless 201.
    pub async fn create(&self, body: serde_json::Value) -> serde_json::Value {
        let (status, created) = self.post(PERSONS, body).await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", created);
        created
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Router over a repository whose every call fails like a lost connection.
pub fn failing_router() -> Router {
    let state = AppState {
        config: test_config(),
        repository: Arc::new(FailingRepository),
    };
    build_router(state)
}

/// Spawn a real server over an in-memory repository on a random port.
pub struct SpawnedApp {
    pub address: String,
    pub repository: Arc<InMemoryPersonRepository>,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl SpawnedApp {
    pub async fn spawn() -> Self {
        let repository = Arc::new(InMemoryPersonRepository::new());
        let app = Application::build_with_repository(test_config(), repository.clone())
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(app.run_with_shutdown(async {
            let _ = rx.await;
        }));

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        Self {
            address,
            repository,
            shutdown: Some(tx),
            handle,
        }
    }

    pub fn persons_url(&self) -> String {
        format!("{}{}", self.address, PERSONS)
    }

    /// Trigger graceful shutdown and wait for the server task to finish.
    pub async fn stop(mut self) -> std::io::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.expect("server task panicked")
    }
}

pub struct FailingRepository;

fn storage_down() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl PersonRepository for FailingRepository {
    async fn insert_one(&self, _person: NewPerson) -> Result<Person, AppError> {
        Err(storage_down())
    }

    async fn insert_many(&self, _people: Vec<NewPerson>) -> Result<Vec<Person>, AppError> {
        Err(storage_down())
    }

    async fn find_all(&self) -> Result<Vec<Person>, AppError> {
        Err(storage_down())
    }

    async fn find_one_by_food(&self, _food: &str) -> Result<Option<Person>, AppError> {
        Err(storage_down())
    }

    async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Person>, AppError> {
        Err(storage_down())
    }

    async fn push_favorite_food(
        &self,
        _id: ObjectId,
        _food: &str,
    ) -> Result<Option<Person>, AppError> {
        Err(storage_down())
    }

    async fn update_age_by_name(
        &self,
        _name: &str,
        _age: i32,
    ) -> Result<Option<Person>, AppError> {
        Err(storage_down())
    }

    async fn delete_by_id(&self, _id: ObjectId) -> Result<Option<Person>, AppError> {
        Err(storage_down())
    }

    async fn delete_many_by_name(&self, _name: &str) -> Result<u64, AppError> {
        Err(storage_down())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(storage_down())
    }

    async fn shutdown(&self) {}
}
