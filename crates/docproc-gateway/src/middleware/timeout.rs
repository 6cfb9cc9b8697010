//! Handler time bound.
//!
//! When the bound elapses the inner future is dropped (abandoning the
//! handler) and `504 Gateway Timeout` is returned instead.

use std::time::Duration;

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use docproc_core::error::DocProcError;

use super::{Interceptor, Next};
use crate::context::{Outcome, RequestContext};
use crate::error::ApiError;

/// Default bound on handler execution.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    limit: Duration,
}

impl Timeout {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

#[async_trait]
impl Interceptor for Timeout {
    fn name(&self) -> &'static str {
        "timeout"
    }

    async fn intercept(&self, ctx: &mut RequestContext, req: Request, next: Next<'_>) -> Response {
        match tokio::time::timeout(self.limit, next.run(ctx, req)).await {
            Ok(response) => response,
            Err(_) => {
                ctx.outcome = Outcome::TimedOut;
                warn!(
                    request_id = %ctx.request_id,
                    method = %ctx.method,
                    path = %ctx.path,
                    limit_ms = self.limit.as_millis() as u64,
                    "handler exceeded time bound; abandoned"
                );
                ApiError(DocProcError::Timeout(self.limit)).into_response()
            }
        }
    }
}
