//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness
//! - `/metrics` : Prometheus text format
//!
//! Plus the JSON 404 used as the router fallback.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use docproc_core::error::DocProcError;

use crate::{app_state::AppState, error::ApiError};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn not_found(req: Request) -> ApiError {
    ApiError(DocProcError::NotFound(format!("no route for {} {}", req.method(), req.uri().path())))
}
