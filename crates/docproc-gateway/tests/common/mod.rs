#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use chrono::Utc;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

use docproc_core::error::{DocProcError, Result};
use docproc_core::{DocumentId, DocumentMetadata, DocumentUpload};
use docproc_gateway::app_state::AppState;
use docproc_gateway::config::Config;
use docproc_gateway::context::RequestContext;
use docproc_gateway::obs::Metrics;
use docproc_gateway::router::build_router;
use docproc_gateway::services::DocumentService;

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("utf8 body")
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Reply {
    let resp = app.clone().oneshot(req).await.expect("infallible");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    Reply { status, headers, body }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(body.into())
        .unwrap()
}

pub fn with_peer(mut req: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

/// Router over the in-memory document service plus its registry.
pub fn app() -> (Router, Arc<Metrics>) {
    app_with(Config::default())
}

pub fn app_with(cfg: Config) -> (Router, Arc<Metrics>) {
    let state = AppState::new(cfg);
    let metrics = state.metrics();
    (build_router(state), metrics)
}

/// Router over a scripted document service.
pub fn scripted(behavior: Behavior) -> (Router, Arc<Metrics>) {
    let metrics = Arc::new(Metrics::new());
    let state = AppState::with_parts(
        Config::default(),
        Arc::clone(&metrics),
        Arc::new(Scripted(behavior)),
    );
    (build_router(state), metrics)
}

#[derive(Clone, Copy)]
pub enum Behavior {
    /// `parse` panics.
    Panic,
    /// `metadata` sleeps far past the pipeline time bound.
    Hang,
    /// `parse` fails with an internal error.
    Fail,
    /// `parse` reports the request id and client ip it was handed.
    Echo,
}

pub struct Scripted(pub Behavior);

fn meta(id: &str, filename: Option<String>) -> DocumentMetadata {
    DocumentMetadata {
        id: DocumentId::parse(id).unwrap(),
        filename,
        content_type: "text/plain".into(),
        size_bytes: 0,
        received_at: Utc::now(),
    }
}

#[async_trait]
impl DocumentService for Scripted {
    async fn parse(&self, ctx: &RequestContext, _upload: DocumentUpload) -> Result<DocumentMetadata> {
        match self.0 {
            Behavior::Panic => panic!("parser blew up"),
            Behavior::Fail => Err(DocProcError::Internal("corrupt document".into())),
            Behavior::Echo => Ok(meta(
                "echo",
                Some(format!("{}|{}", ctx.request_id, ctx.remote_addr())),
            )),
            Behavior::Hang => Ok(meta("hang", None)),
        }
    }

    async fn metadata(&self, _ctx: &RequestContext, id: &DocumentId) -> Result<DocumentMetadata> {
        if let Behavior::Hang = self.0 {
            tokio::time::sleep(Duration::from_secs(600)).await;
        }
        Ok(meta(id.as_str(), None))
    }
}

/// Parse service that records how many calls overlap.
#[derive(Default)]
pub struct Tracked {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl Tracked {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentService for Tracked {
    async fn parse(&self, _ctx: &RequestContext, upload: DocumentUpload) -> Result<DocumentMetadata> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(meta("tracked", upload.filename))
    }

    async fn metadata(&self, _ctx: &RequestContext, id: &DocumentId) -> Result<DocumentMetadata> {
        Err(DocProcError::NotFound(id.to_string()))
    }
}

/// Router over a [`Tracked`] service with the given config.
pub fn tracked(cfg: Config) -> (Router, Arc<Tracked>) {
    let service = Arc::new(Tracked::default());
    let state = AppState::with_parts(cfg, Arc::new(Metrics::new()), service.clone());
    (build_router(state), service)
}

/// In-memory sink for JSON log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl LogBuffer {
    /// Install as the thread-local subscriber for the returned guard's lifetime.
    pub fn capture(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_writer(self.clone())
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<serde_json::Value> {
        let raw = self.0.lock().unwrap().clone();
        String::from_utf8(raw)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    /// Access-log entries only.
    pub fn access_entries(&self) -> Vec<serde_json::Value> {
        self.lines()
            .into_iter()
            .filter(|l| l["message"] == "HTTP request")
            .collect()
    }
}
