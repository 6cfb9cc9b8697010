//! Request-id assignment.
//!
//! An inbound `X-Request-Id` is kept when it is short, visible ASCII;
//! otherwise a fresh UUID v4 is generated. The id is written back onto the
//! request for the handler and echoed on the response.

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::response::Response;
use uuid::Uuid;

use super::{Interceptor, Next};
use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound id we are willing to propagate.
const MAX_INBOUND_LEN: usize = 128;

#[derive(Debug, Default)]
pub struct RequestId;

impl RequestId {
    pub fn new() -> Self {
        Self
    }
}

fn inbound_id(req: &Request) -> Option<String> {
    let raw = req.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let ok = !raw.is_empty()
        && raw.len() <= MAX_INBOUND_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());
    ok.then(|| raw.to_string())
}

#[async_trait]
impl Interceptor for RequestId {
    fn name(&self) -> &'static str {
        "request_id"
    }

    async fn intercept(&self, ctx: &mut RequestContext, mut req: Request, next: Next<'_>) -> Response {
        let id = inbound_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
        // Graphic ASCII and UUIDs are always valid header values.
        let value = HeaderValue::from_str(&id).ok();
        ctx.request_id = id;

        if let Some(v) = &value {
            req.headers_mut().insert(REQUEST_ID_HEADER, v.clone());
        }

        let mut response = next.run(ctx, req).await;
        if let Some(v) = value {
            response.headers_mut().insert(REQUEST_ID_HEADER, v);
        }
        response
    }
}
