//! docproc core: error surface and document model shared by the gateway and
//! the document service implementations.
//!
//! This crate carries no transport or runtime dependencies so document
//! backends can depend on it without pulling in the HTTP stack.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod document;
pub mod error;

pub use document::{DocumentId, DocumentMetadata, DocumentUpload};
pub use error::{ClientCode, DocProcError, Result};
