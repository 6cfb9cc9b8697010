//! Request-scoped context shared by the middleware stages and handlers.
//!
//! A `RequestContext` is created when a request enters the pipeline, filled
//! in by the stages, and handed to the terminal handler as an
//! `Extension<RequestContext>` snapshot. It is never shared across requests.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::extract::{ConnectInfo, Request};
use axum::http::{header, Method, StatusCode};
use tokio::time::Instant;

/// How the request left the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler (or an inner stage) produced the response.
    Completed,
    /// A panic was recovered into an error response.
    Panicked,
    /// The handler exceeded the time bound and was abandoned.
    TimedOut,
    /// The client went away before a response was produced.
    Cancelled,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Panicked => "panicked",
            Outcome::TimedOut => "timed_out",
            Outcome::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Assigned by the request-id stage; empty before it runs.
    pub request_id: String,
    pub method: Method,
    /// Raw request path; also the metrics `endpoint` label.
    pub path: String,
    pub user_agent: String,
    /// Socket peer as seen by the listener.
    pub peer: Option<SocketAddr>,
    /// Originating client, set by the real-ip stage.
    pub client_ip: Option<IpAddr>,
    pub started: Instant,
    pub finished: Option<Instant>,
    pub status: Option<StatusCode>,
    pub outcome: Outcome,
}

impl RequestContext {
    pub fn from_request(req: &Request) -> Self {
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Self {
            request_id: String::new(),
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            user_agent,
            peer: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
            client_ip: None,
            started: Instant::now(),
            finished: None,
            status: None,
            outcome: Outcome::Completed,
        }
    }

    /// Resolved client address, falling back to the socket peer.
    pub fn remote_addr(&self) -> String {
        match (self.client_ip, self.peer) {
            (Some(ip), _) => ip.to_string(),
            (None, Some(peer)) => peer.ip().to_string(),
            (None, None) => "unknown".to_string(),
        }
    }

    /// Time spent in the pipeline; frozen once the request completed.
    pub fn elapsed(&self) -> Duration {
        match self.finished {
            Some(end) => end.duration_since(self.started),
            None => self.started.elapsed(),
        }
    }

    /// Final status, or 500 if the pipeline never recorded one.
    pub fn final_status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
