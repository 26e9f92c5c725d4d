//! REST API for the metronome
//!
//! Routes:
//! - `GET|PUT /bpm`
//! - `GET|DELETE /bpm/list`
//! - `GET|DELETE /bpm/min`
//! - `GET|DELETE /bpm/max`
//! - `GET /health`, `GET /build_info`, `GET /events` (SSE)
//!
//! Every response is JSON and carries `Access-Control-Allow-Origin: *`.

pub mod error;
pub mod handlers;
pub mod sse;

pub use error::{ApiError, ApiResult};

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controller::TempoController;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: TempoController,
}

impl AppState {
    pub fn new(controller: TempoController) -> Self {
        Self { controller }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/bpm", get(handlers::get_bpm).put(handlers::set_bpm))
        .route(
            "/bpm/list",
            get(handlers::get_bpm_list).delete(handlers::delete_bpm),
        )
        .route("/bpm/min", get(handlers::get_min).delete(handlers::delete_min))
        .route("/bpm/max", get(handlers::get_max).delete(handlers::delete_max))
        .route("/health", get(handlers::health))
        .route("/build_info", get(handlers::get_build_info))
        .route("/events", get(sse::event_stream))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
