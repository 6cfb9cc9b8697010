use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use docproc_core::error::{DocProcError, Result};
use docproc_core::{DocumentId, DocumentMetadata, DocumentUpload};

use crate::context::RequestContext;

/// Document parsing and metadata backend.
///
/// Implementations own the processing semantics; the gateway only routes,
/// bounds concurrency, and counts outcomes.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn parse(&self, ctx: &RequestContext, upload: DocumentUpload) -> Result<DocumentMetadata>;
    async fn metadata(&self, ctx: &RequestContext, id: &DocumentId) -> Result<DocumentMetadata>;
}

/// Keeps metadata for accepted uploads in memory; the payload itself is not
/// retained.
#[derive(Default)]
pub struct InMemoryDocuments {
    docs: DashMap<DocumentId, DocumentMetadata>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
        }
    }
}

#[async_trait]
impl DocumentService for InMemoryDocuments {
    async fn parse(&self, ctx: &RequestContext, upload: DocumentUpload) -> Result<DocumentMetadata> {
        if upload.body.is_empty() {
            return Err(DocProcError::BadRequest("empty document".into()));
        }

        let id = DocumentId::parse(&Uuid::new_v4().to_string())?;
        let size_bytes = upload.size_bytes();
        let meta = DocumentMetadata {
            id: id.clone(),
            filename: upload.filename,
            content_type: upload.content_type,
            size_bytes,
            received_at: Utc::now(),
        };

        tracing::debug!(request_id = %ctx.request_id, document_id = %id, size = meta.size_bytes, "document accepted");
        self.docs.insert(id, meta.clone());
        Ok(meta)
    }

    async fn metadata(&self, _ctx: &RequestContext, id: &DocumentId) -> Result<DocumentMetadata> {
        self.docs
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| DocProcError::NotFound(format!("document {id}")))
    }
}
