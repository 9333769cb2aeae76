//! HTTP server for heapcal: calendar events, heap tasks, categories, settings
//! and model-assisted scheduling over a single JSON data file.

pub mod routes;
pub mod singleton;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::state::AppState;

/// Every route, with CORS open to any origin
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::events::router())
        .merge(routes::categories::router())
        .merge(routes::settings::router())
        .merge(routes::transfer::router())
        .merge(routes::ai::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
