//! Axum router wiring.
//!
//! The instrumentation pipeline is installed last so it wraps every route
//! and the fallback.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::middleware::Pipeline;
use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let pipeline = Pipeline::standard(state.metrics());
    build_router_with(state, pipeline)
}

/// Same routes as [`build_router`] behind a caller-supplied pipeline.
pub fn build_router_with(state: AppState, pipeline: Pipeline) -> Router {
    let body_limit = usize::try_from(state.cfg().max_file_size).unwrap_or(usize::MAX);

    let documents = Router::new()
        .route(
            "/parse",
            post(api::documents::parse).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/:id/metadata", get(api::documents::metadata));

    let app = Router::new()
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .nest("/api/v1/documents", documents)
        .fallback(ops::not_found)
        .with_state(state);

    pipeline.install(app)
}
