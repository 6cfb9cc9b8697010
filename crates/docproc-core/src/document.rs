//! Document model exchanged between the gateway and document services.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DocProcError, Result};

/// Longest identifier accepted on the metadata route.
pub const MAX_ID_LEN: usize = 64;

/// Opaque document identifier.
///
/// Restricted to ASCII alphanumerics, `-` and `_` so it is safe to echo in
/// logs and URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(DocProcError::BadRequest("document id must not be empty".into()));
        }
        if raw.len() > MAX_ID_LEN {
            return Err(DocProcError::BadRequest(format!(
                "document id longer than {MAX_ID_LEN} bytes"
            )));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(DocProcError::BadRequest(
                "document id contains invalid characters".into(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw upload as received by the parse route.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: Option<String>,
    pub content_type: String,
    pub body: Bytes,
}

impl DocumentUpload {
    pub fn size_bytes(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Metadata returned by the parse and metadata routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: DocumentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub content_type: String,
    pub size_bytes: u64,
    pub received_at: DateTime<Utc>,
}
