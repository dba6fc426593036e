use crate::handlers;
use crate::startup::AppState;
use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use tower_http::trace::TraceLayer;

/// Person routes relative to the API base path.
///
/// Literal segments (`bulk`, `food`, `name`) are matched before `:id`.
pub fn person_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/persons",
            post(handlers::create_person)
                .get(handlers::list_people)
                .fallback(method_not_allowed),
        )
        .route(
            "/persons/bulk",
            post(handlers::create_many_people).fallback(method_not_allowed),
        )
        .route(
            "/persons/food/:food",
            get(handlers::find_one_by_food).fallback(method_not_allowed),
        )
        .route(
            "/persons/name/mary",
            delete(handlers::delete_all_named_mary).fallback(method_not_allowed),
        )
        .route(
            "/persons/name/:name/age",
            put(handlers::update_age_by_name).fallback(method_not_allowed),
        )
        .route(
            "/persons/:id",
            get(handlers::find_person_by_id)
                .delete(handlers::delete_person_by_id)
                .fallback(method_not_allowed),
        )
        .route(
            "/persons/:id/favorite",
            put(handlers::add_favorite_food).fallback(method_not_allowed),
        )
}

pub fn build_router(state: AppState) -> Router {
    let base_path = state.config.http.base_path.clone();
    let api = if base_path.is_empty() {
        person_routes()
    } else {
        Router::new().nest(&base_path, person_routes())
    };

    Router::new()
        .route(
            "/health",
            get(handlers::health_check).fallback(method_not_allowed),
        )
        .route(
            "/ready",
            get(handlers::readiness_check).fallback(method_not_allowed),
        )
        .route(
            "/metrics",
            get(handlers::metrics).fallback(method_not_allowed),
        )
        .merge(api)
        .fallback(route_not_found)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
}

async fn route_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Route not found"))
}

// Path matched but no handler for the method.
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
