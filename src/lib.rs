pub mod config;
pub mod error;
pub mod state;
pub mod models;
pub mod routes;
pub mod effects;
pub mod email;
pub mod submission;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::submission::pipeline::Pipeline;

pub fn build_app(config: Config) -> Router {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .expect("Failed to build reqwest client");

    build_app_with_pipeline(Pipeline::from_config(&config, client), config.max_body_size)
}

/// Router around an already-wired pipeline.
pub fn build_app_with_pipeline(pipeline: Pipeline, max_body_size: usize) -> Router {
    let state: SharedState = Arc::new(AppState { pipeline });

    Router::new()
        .merge(routes::ingest_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
