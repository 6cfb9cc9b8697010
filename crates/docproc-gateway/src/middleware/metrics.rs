//! Request metrics: one counter increment and one duration observation per
//! completed request, keyed by the raw request path and the final status.

use std::sync::Arc;

use super::Interceptor;
use crate::context::RequestContext;
use crate::obs::Metrics;

pub struct RecordMetrics {
    metrics: Arc<Metrics>,
}

impl RecordMetrics {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

impl Interceptor for RecordMetrics {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn on_complete(&self, ctx: &RequestContext) {
        let method = ctx.method.as_str();
        let path = ctx.path.as_str();
        let status = ctx.final_status().canonical_reason().unwrap_or("");

        self.metrics.increment_request_counter(method, path, status);
        self.metrics
            .observe_request_duration(method, path, ctx.elapsed());
    }
}
