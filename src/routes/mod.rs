//! Rutas HTTP

pub mod parking_routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

/// Crear el router principal con CORS y trazas
pub fn create_app_router(state: AppState) -> Router {
    let cors = if state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .merge(parking_routes::create_parking_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
