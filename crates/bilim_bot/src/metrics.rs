//! Metrics collection for publish cycles.

use crate::CycleReport;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics collector for publish cycles.
#[derive(Debug, Clone)]
pub struct CycleMetrics {
    inner: Arc<CycleMetricsInner>,
}

#[derive(Debug)]
struct CycleMetricsInner {
    cycles: AtomicU64,
    facts_generated: AtomicU64,
    duplicates: AtomicU64,
    fallbacks: AtomicU64,
    image_fallbacks: AtomicU64,
    published: AtomicU64,
    failed: AtomicU64,

    last_publish: parking_lot::Mutex<Option<Instant>>,
}

impl Default for CycleMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CycleMetricsInner {
                cycles: AtomicU64::new(0),
                facts_generated: AtomicU64::new(0),
                duplicates: AtomicU64::new(0),
                fallbacks: AtomicU64::new(0),
                image_fallbacks: AtomicU64::new(0),
                published: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                last_publish: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Adds the counts of a finished cycle.
    pub fn record_cycle(&self, report: &CycleReport) {
        let inner = &self.inner;
        inner.cycles.fetch_add(1, Ordering::Relaxed);
        inner
            .facts_generated
            .fetch_add(report.attempts as u64, Ordering::Relaxed);
        inner
            .duplicates
            .fetch_add(report.duplicates as u64, Ordering::Relaxed);
        inner
            .fallbacks
            .fetch_add(report.fallbacks as u64, Ordering::Relaxed);
        inner
            .image_fallbacks
            .fetch_add(report.image_fallbacks as u64, Ordering::Relaxed);
        inner
            .failed
            .fetch_add(report.failed as u64, Ordering::Relaxed);
    }

    /// Records one successful publish.
    pub fn record_publish(&self) {
        self.inner.published.fetch_add(1, Ordering::Relaxed);
        *self.inner.last_publish.lock() = Some(Instant::now());
    }

    /// Gets the number of finished cycles.
    pub fn cycles(&self) -> u64 {
        self.inner.cycles.load(Ordering::Relaxed)
    }

    /// Gets the number of successful publishes.
    pub fn published(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }

    /// Gets the number of failed publishes.
    pub fn failed(&self) -> u64 {
        self.inner.failed.load(Ordering::Relaxed)
    }

    /// Gets time since the last successful publish.
    pub fn time_since_publish(&self) -> Option<std::time::Duration> {
        self.inner.last_publish.lock().map(|instant| instant.elapsed())
    }

    /// Share of publish attempts that succeeded (0.0 - 1.0).
    pub fn publish_success_rate(&self) -> f64 {
        let published = self.published();
        let total = published + self.failed();

        if total == 0 {
            return 1.0;
        }

        published as f64 / total as f64
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = &self.inner;
        MetricsSnapshot {
            cycles: self.cycles(),
            facts_generated: inner.facts_generated.load(Ordering::Relaxed),
            duplicates: inner.duplicates.load(Ordering::Relaxed),
            fallbacks: inner.fallbacks.load(Ordering::Relaxed),
            image_fallbacks: inner.image_fallbacks.load(Ordering::Relaxed),
            published: self.published(),
            failed: self.failed(),
            seconds_since_publish: self.time_since_publish().map(|d| d.as_secs()),
            publish_success_rate: self.publish_success_rate(),
        }
    }
}

/// Serializable snapshot of cycle metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Finished cycles
    pub cycles: u64,
    /// Generation attempts
    pub facts_generated: u64,
    /// Facts rejected as duplicates
    pub duplicates: u64,
    /// Facts replaced by the fallback fact
    pub fallbacks: u64,
    /// Images replaced by the fallback image
    pub image_fallbacks: u64,
    /// Successful publishes
    pub published: u64,
    /// Failed publishes
    pub failed: u64,
    /// Seconds since the last successful publish
    pub seconds_since_publish: Option<u64>,
    /// Share of publish attempts that succeeded
    pub publish_success_rate: f64,
}
