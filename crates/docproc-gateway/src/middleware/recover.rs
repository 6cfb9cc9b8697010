//! Panic recovery.
//!
//! Any unwind raised by an inner stage or the handler is caught here and
//! turned into a `500` response; the connection and the process carry on.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;
use tracing::error;

use docproc_core::error::DocProcError;

use super::{Interceptor, Next};
use crate::context::{Outcome, RequestContext};
use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct Recover;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[async_trait]
impl Interceptor for Recover {
    fn name(&self) -> &'static str {
        "recover"
    }

    async fn intercept(&self, ctx: &mut RequestContext, req: Request, next: Next<'_>) -> Response {
        let caught = AssertUnwindSafe(next.run(ctx, req)).catch_unwind().await;
        match caught {
            Ok(response) => response,
            Err(payload) => {
                ctx.outcome = Outcome::Panicked;
                error!(
                    request_id = %ctx.request_id,
                    method = %ctx.method,
                    path = %ctx.path,
                    panic = panic_message(payload.as_ref()),
                    "handler panicked; recovered"
                );
                ApiError(DocProcError::Internal("internal server error".into())).into_response()
            }
        }
    }
}
