//! Shared application state for the docproc gateway.
//!
//! Built once at startup from the loaded `Config`; cloned cheaply into every
//! handler.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::Config;
use crate::obs::Metrics;
use crate::services::{DocumentService, InMemoryDocuments};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: Config,
    metrics: Arc<Metrics>,
    documents: Arc<dyn DocumentService>,
    workers: Arc<Semaphore>,
}

impl AppState {
    /// State with a fresh registry and the in-memory document service.
    pub fn new(cfg: Config) -> Self {
        Self::with_parts(cfg, Arc::new(Metrics::new()), Arc::new(InMemoryDocuments::new()))
    }

    pub fn with_parts(
        cfg: Config,
        metrics: Arc<Metrics>,
        documents: Arc<dyn DocumentService>,
    ) -> Self {
        // A zero-sized pool would park every upload until the timeout fires.
        let permits = cfg.workers.max(1);
        if permits != cfg.workers {
            tracing::warn!(workers = cfg.workers, "WORKERS must be positive; using 1");
        }

        Self {
            inner: Arc::new(AppStateInner {
                workers: Arc::new(Semaphore::new(permits)),
                cfg,
                metrics,
                documents,
            }),
        }
    }

    pub fn cfg(&self) -> &Config {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.inner.metrics)
    }

    pub fn documents(&self) -> Arc<dyn DocumentService> {
        Arc::clone(&self.inner.documents)
    }

    pub fn workers(&self) -> Arc<Semaphore> {
        Arc::clone(&self.inner.workers)
    }
}
