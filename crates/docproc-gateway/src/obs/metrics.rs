//! In-process metrics registry for the document processor.
//!
//! Counter and histogram families with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering. Histogram buckets are fixed in microseconds to avoid floating
//! point math on the hot path; rendering converts them to seconds.
//!
//! Writers touch one shard and one atomic cell. The hot path takes a shard
//! read lock when the series already exists, so increments and scrapes only
//! contend while a brand-new series is inserted.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const REQUESTS_TOTAL: &str = "document_processor_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "document_processor_request_duration_seconds";
pub const DOCUMENTS_PROCESSED_TOTAL: &str = "documents_processed_total";
pub const DOCUMENTS_PROCESSING_ERRORS_TOTAL: &str = "documents_processing_errors_total";

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

/// Unlabeled monotonic counter.
#[derive(Default)]
pub struct Counter {
    v: AtomicU64,
}

impl Counter {
    pub fn inc(&self) {
        self.v.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.v.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let key = label_key(labels);
        if let Some(counter) = self.map.get(&key) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum over every series.
    pub fn total(&self) -> u64 {
        self.map.iter().map(|r| r.value().load(Ordering::Relaxed)).sum()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

// Default Prometheus buckets (.005s .. 10s), stored in microseconds.
const BUCKETS: [(u64, &str); 11] = [
    (5_000, "0.005"),
    (10_000, "0.01"),
    (25_000, "0.025"),
    (50_000, "0.05"),
    (100_000, "0.1"),
    (250_000, "0.25"),
    (500_000, "0.5"),
    (1_000_000, "1"),
    (2_500_000, "2.5"),
    (5_000_000, "5"),
    (10_000_000, "10"),
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: [AtomicU64; BUCKETS.len()],
}

impl AtomicHistogram {
    fn observe(&self, micros: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_micros.fetch_add(micros, Ordering::Relaxed);

        // Cumulative: every bucket whose bound covers the value.
        for (i, &(le, _)) in BUCKETS.iter().enumerate() {
            if micros <= le {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        let key = label_key(labels);
        if let Some(hist) = self.map.get(&key) {
            hist.observe(micros);
            return;
        }
        self.map
            .entry(key)
            .or_insert_with(AtomicHistogram::default)
            .observe(micros);
    }

    /// Number of observations across every series.
    pub fn total_count(&self) -> u64 {
        self.map
            .iter()
            .map(|r| r.value().count.load(Ordering::Relaxed))
            .sum()
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "histogram");
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };

            for (i, &(_, le)) in BUCKETS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = hist.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0;
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

/// Process-wide registry. Build once at startup and share via `Arc`.
#[derive(Default)]
pub struct Metrics {
    requests: CounterVec,
    request_duration: HistogramVec,
    documents_processed: Counter,
    documents_processing_errors: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_request_counter(&self, method: &str, path: &str, status_text: &str) {
        self.requests
            .inc(&[("method", method), ("endpoint", path), ("status", status_text)]);
    }

    pub fn observe_request_duration(&self, method: &str, path: &str, elapsed: Duration) {
        self.request_duration
            .observe(&[("method", method), ("endpoint", path)], elapsed);
    }

    pub fn increment_documents_processed(&self) {
        self.documents_processed.inc();
    }

    pub fn increment_documents_processing_errors(&self) {
        self.documents_processing_errors.inc();
    }

    pub fn request_count(&self, method: &str, path: &str, status_text: &str) -> u64 {
        self.requests
            .get(&[("method", method), ("endpoint", path), ("status", status_text)])
    }

    /// Requests counted across every label combination.
    pub fn requests_total(&self) -> u64 {
        self.requests.total()
    }

    /// Duration observations across every label combination.
    pub fn duration_observations(&self) -> u64 {
        self.request_duration.total_count()
    }

    pub fn documents_processed(&self) -> u64 {
        self.documents_processed.get()
    }

    pub fn documents_processing_errors(&self) -> u64 {
        self.documents_processing_errors.get()
    }

    /// Render every family in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests
            .render(REQUESTS_TOTAL, "Total number of HTTP requests", &mut out);
        self.request_duration.render(
            REQUEST_DURATION_SECONDS,
            "HTTP request duration in seconds",
            &mut out,
        );
        self.documents_processed.render(
            DOCUMENTS_PROCESSED_TOTAL,
            "Total number of documents processed",
            &mut out,
        );
        self.documents_processing_errors.render(
            DOCUMENTS_PROCESSING_ERRORS_TOTAL,
            "Total number of document processing errors",
            &mut out,
        );
        out
    }
}
