//! Structured access log: one event per request, emitted at completion.

use tracing::info;

use super::Interceptor;
use crate::context::RequestContext;

#[derive(Debug, Default)]
pub struct AccessLog;

impl Interceptor for AccessLog {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn on_complete(&self, ctx: &RequestContext) {
        // duration is reported in milliseconds
        info!(
            method = %ctx.method,
            path = %ctx.path,
            status = ctx.final_status().as_u16(),
            duration = ctx.elapsed().as_secs_f64() * 1000.0,
            remote_addr = %ctx.remote_addr(),
            user_agent = %ctx.user_agent,
            request_id = %ctx.request_id,
            outcome = ctx.outcome.as_str(),
            "HTTP request"
        );
    }
}
