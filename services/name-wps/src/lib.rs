//! NAME WPS Service Library
//!
//! HTTP front end exposing NAME dispersion-model runs as Web Processing
//! Service processes.

pub mod command_runner;
pub mod config;
pub mod handlers;
pub mod kvp;
pub mod state;
pub mod tracker;

use axum::{routing::get, Extension, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/wps", get(handlers::wps::wps_handler))
        .route("/jobs", get(handlers::jobs::jobs_handler))
        .route("/health", get(handlers::health::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
