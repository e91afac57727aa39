//! Router HTTP
//!
//! Compone los routers de cada recurso bajo `/api` según el rol del servicio
//! y aplica las capas comunes (trace, timeout, compresión y CORS).

pub mod demande_routes;
pub mod livreur_routes;
pub mod manager_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Construir la aplicación completa a partir del estado
pub fn create_app(state: AppState) -> Router {
    let role = state.config.role;
    let mut api = Router::new();

    if role.serves_demandes() {
        api = api.nest("/demandes", demande_routes::create_demande_router());
    }
    if role.serves_livreurs() {
        api = api
            .nest("/livreurs", livreur_routes::create_livreur_router())
            .nest("/managers", manager_routes::create_manager_router());
    }

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(CompressionLayer::new())
        .layer(cors_middleware(&state.config))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "storage": state.repository.backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
