//! Request instrumentation pipeline.
//!
//! The pipeline is an ordered list of [`Interceptor`] stages. Each stage gets
//! the request-scoped [`RequestContext`], the request, and a [`Next`] cursor
//! for the remainder of the chain; the last `Next` hands off to the routed
//! handler. The standard order is load-bearing:
//!
//! ```text
//! request_id -> real_ip -> access_log -> recover -> timeout -> metrics -> handler
//! ```
//!
//! - `request_id` and `real_ip` run first so everything later sees them.
//! - `recover` wraps every stage after it, including the handler.
//! - `timeout` wraps only what remains, so abandoning the handler never
//!   touches bookkeeping already done by outer stages.
//!
//! Completion: once the outermost stage returns, the final status is stored
//! in the context and every stage's [`Interceptor::on_complete`] runs in
//! declared order. Access logging and metrics both report from there, so a
//! logged request always has a matching metric observation, including
//! responses produced by `recover` (500) and `timeout` (504). If the client
//! disconnects first, completion still runs once with status 499.

pub mod access_log;
pub mod metrics;
pub mod real_ip;
pub mod recover;
pub mod request_id;
pub mod timeout;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use tokio::time::Instant;

use crate::context::{Outcome, RequestContext};
use crate::obs::Metrics;

pub use access_log::AccessLog;
pub use metrics::RecordMetrics;
pub use real_ip::RealIp;
pub use recover::Recover;
pub use request_id::{RequestId, REQUEST_ID_HEADER};
pub use timeout::{Timeout, REQUEST_TIMEOUT};

/// Nginx-style status for requests abandoned by the client.
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// One stage of the pipeline.
#[async_trait]
pub trait Interceptor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run this stage. The default passes straight through.
    async fn intercept(&self, ctx: &mut RequestContext, req: Request, next: Next<'_>) -> Response {
        next.run(ctx, req).await
    }

    /// Called exactly once per request after the final status is known.
    fn on_complete(&self, _ctx: &RequestContext) {}
}

/// Cursor over the stages that have not run yet.
pub struct Next<'a> {
    stages: &'a [Arc<dyn Interceptor>],
    endpoint: axum::middleware::Next,
}

impl<'a> Next<'a> {
    pub async fn run(self, ctx: &mut RequestContext, mut req: Request) -> Response {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    stages: rest,
                    endpoint: self.endpoint,
                };
                stage.intercept(ctx, req, next).await
            }
            None => {
                req.extensions_mut().insert(ctx.clone());
                self.endpoint.run(req).await
            }
        }
    }
}

/// Runs completion hooks exactly once, even if the request future is dropped.
struct Completion<'a> {
    stages: &'a [Arc<dyn Interceptor>],
    ctx: RequestContext,
    done: bool,
}

impl Completion<'_> {
    fn finish(&mut self, status: StatusCode) {
        if self.done {
            return;
        }
        self.done = true;
        self.ctx.status = Some(status);
        self.ctx.finished = Some(Instant::now());
        for stage in self.stages {
            stage.on_complete(&self.ctx);
        }
    }
}

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.ctx.outcome = Outcome::Cancelled;
            let status = StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                .unwrap_or(StatusCode::BAD_REQUEST);
            self.finish(status);
        }
    }
}

/// Ordered interceptor chain.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<[Arc<dyn Interceptor>]>,
}

impl Pipeline {
    pub fn new(stages: Vec<Arc<dyn Interceptor>>) -> Self {
        Self {
            stages: stages.into(),
        }
    }

    /// The production chain with the default 30 s handler bound.
    pub fn standard(metrics: Arc<Metrics>) -> Self {
        Self::standard_with_timeout(metrics, REQUEST_TIMEOUT)
    }

    pub fn standard_with_timeout(metrics: Arc<Metrics>, limit: Duration) -> Self {
        let stages: Vec<Arc<dyn Interceptor>> = vec![
            Arc::new(RequestId::new()),
            Arc::new(RealIp),
            Arc::new(AccessLog),
            Arc::new(Recover),
            Arc::new(Timeout::new(limit)),
            Arc::new(RecordMetrics::new(metrics)),
        ];
        Self::new(stages)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Drive one request through every stage and into `endpoint`.
    pub async fn handle(&self, req: Request, endpoint: axum::middleware::Next) -> Response {
        let mut completion = Completion {
            stages: &self.stages[..],
            ctx: RequestContext::from_request(&req),
            done: false,
        };

        let next = Next {
            stages: &self.stages[..],
            endpoint,
        };
        let response = next.run(&mut completion.ctx, req).await;

        completion.finish(response.status());
        response
    }

    /// Install the pipeline ahead of every route (and the fallback) of `router`.
    pub fn install<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(axum::middleware::from_fn_with_state(self, run_pipeline))
    }
}

async fn run_pipeline(
    State(pipeline): State<Pipeline>,
    req: Request,
    next: axum::middleware::Next,
) -> Response {
    pipeline.handle(req, next).await
}
