//! Counters for a single export run
//!
//! Tracks how many remote calls a run issued and how sessions were
//! classified, using atomic counters so concurrent session fetches can
//! record without locking.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ExportMetrics {
    pub requests_issued: AtomicU64,
    pub sessions_listed: AtomicU64,
    pub sessions_skipped: AtomicU64,
    pub sessions_exported: AtomicU64,
}

impl ExportMetrics {
    /// Record one remote API call
    pub fn record_request(&self) {
        self.requests_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sessions_listed(&self, count: usize) {
        self.sessions_listed.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a session dropped by the completion filter
    pub fn record_skipped(&self) {
        self.sessions_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_exported(&self) {
        self.sessions_exported.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> ExportMetricsSnapshot {
        ExportMetricsSnapshot {
            requests_issued: self.requests_issued.load(Ordering::Relaxed),
            sessions_listed: self.sessions_listed.load(Ordering::Relaxed),
            sessions_skipped: self.sessions_skipped.load(Ordering::Relaxed),
            sessions_exported: self.sessions_exported.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMetricsSnapshot {
    pub requests_issued: u64,
    pub sessions_listed: u64,
    pub sessions_skipped: u64,
    pub sessions_exported: u64,
}

impl ExportMetricsSnapshot {
    /// Share of listed sessions that made it into the output
    pub fn completion_rate(&self) -> f64 {
        if self.sessions_listed == 0 {
            0.0
        } else {
            self.sessions_exported as f64 / self.sessions_listed as f64
        }
    }
}
