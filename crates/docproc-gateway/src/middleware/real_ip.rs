//! Real client address resolution.
//!
//! Trusted proxy headers are consulted in order `True-Client-IP`,
//! `X-Real-IP`, then the left-most `X-Forwarded-For` entry. Only values that
//! parse as an address are accepted; otherwise the socket peer is used.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::response::Response;

use super::{Interceptor, Next};
use crate::context::RequestContext;

const TRUE_CLIENT_IP: &str = "true-client-ip";
const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Debug, Default)]
pub struct RealIp;

fn parse_addr(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|s| s.ip()))
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Client address claimed by proxy headers, if any.
pub fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    header_str(headers, TRUE_CLIENT_IP)
        .and_then(parse_addr)
        .or_else(|| header_str(headers, X_REAL_IP).and_then(parse_addr))
        .or_else(|| {
            header_str(headers, X_FORWARDED_FOR)
                .and_then(|v| v.split(',').next())
                .and_then(parse_addr)
        })
}

#[async_trait]
impl Interceptor for RealIp {
    fn name(&self) -> &'static str {
        "real_ip"
    }

    async fn intercept(&self, ctx: &mut RequestContext, req: Request, next: Next<'_>) -> Response {
        ctx.client_ip = forwarded_ip(req.headers()).or(ctx.peer.map(|p| p.ip()));
        next.run(ctx, req).await
    }
}
