//! Document services the API routes delegate to.

pub mod documents;

pub use documents::{DocumentService, InMemoryDocuments};
