//! Document routes.
//!
//! - `POST /api/v1/documents/parse`          raw body upload
//! - `GET  /api/v1/documents/:id/metadata`   metadata lookup
//!
//! Uploads are bounded by `MAX_FILE_SIZE` and by the `WORKERS` pool; the
//! processed / error counters are bumped here from the service outcome.

use axum::{
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};

use bytes::Bytes;
use docproc_core::error::DocProcError;
use docproc_core::{DocumentId, DocumentMetadata, DocumentUpload};

use crate::app_state::AppState;
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};

pub const FILENAME_HEADER: &str = "x-filename";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn upload_from(headers: &HeaderMap, body: Bytes) -> DocumentUpload {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();
    let filename = headers
        .get(FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    DocumentUpload {
        filename,
        content_type,
        body,
    }
}

pub async fn parse(
    State(app): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Json<DocumentMetadata>)> {
    let limit = app.cfg().max_file_size;
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            let size = headers
                .get(header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(limit.saturating_add(1));
            ApiError(DocProcError::PayloadTooLarge { size, limit })
        } else {
            ApiError(DocProcError::BadRequest(rejection.body_text()))
        }
    })?;

    let _permit = app
        .workers()
        .acquire_owned()
        .await
        .map_err(|_| DocProcError::Unavailable("worker pool closed".into()))?;

    let metrics = app.metrics();
    match app.documents().parse(&ctx, upload_from(&headers, body)).await {
        Ok(meta) => {
            metrics.increment_documents_processed();
            Ok((StatusCode::CREATED, Json(meta)))
        }
        Err(e) => {
            metrics.increment_documents_processing_errors();
            tracing::warn!(request_id = %ctx.request_id, error = %e, "document processing failed");
            Err(e.into())
        }
    }
}

pub async fn metadata(
    State(app): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<DocumentMetadata>> {
    let id = DocumentId::parse(&id)?;
    let meta = app.documents().metadata(&ctx, &id).await?;
    Ok(Json(meta))
}
