//! docproc gateway library entry.
//!
//! This crate wires configuration, the metrics registry, the request
//! instrumentation pipeline, and the document API into one axum router. It
//! is consumed by the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
