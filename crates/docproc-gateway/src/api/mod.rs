//! Versioned document API (`/api/v1/documents`).

pub mod documents;
