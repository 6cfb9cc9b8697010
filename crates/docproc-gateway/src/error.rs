//! HTTP mapping for `DocProcError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use docproc_core::error::DocProcError;

/// Error returned by route handlers and the failure stages of the pipeline.
#[derive(Debug)]
pub struct ApiError(pub DocProcError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<DocProcError> for ApiError {
    fn from(e: DocProcError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
