//! Request metrics for the field type endpoints

use logscope_telemetry::{Counter, Histogram, HistogramSnapshot};
use serde::Serialize;

#[derive(Clone)]
pub struct ApiMetrics {
    pub requests: Counter,
    pub denied: Counter,
    pub failures: Counter,
    pub latency_ms: Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub denied_total: u64,
    pub failures_total: u64,
    pub latency_ms: HistogramSnapshot,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self {
            requests: Counter::new("field_types_requests_total"),
            denied: Counter::new("field_types_denied_total"),
            failures: Counter::new("field_types_failures_total"),
            latency_ms: Histogram::new("field_types_latency_ms"),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests.get(),
            denied_total: self.denied.get(),
            failures_total: self.failures.get(),
            latency_ms: self.latency_ms.snapshot(),
        }
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}
