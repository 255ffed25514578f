use std::sync::atomic::{AtomicU64, Ordering};

use mediagate_core::GateOutcome;

#[derive(Debug, Default)]
pub struct GateMetrics {
    served: AtomicU64,
    not_modified: AtomicU64,
    denied: AtomicU64,
    redirected: AtomicU64,
    not_found: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GateMetricsSnapshot {
    pub served: u64,
    pub not_modified: u64,
    pub denied: u64,
    pub redirected: u64,
    pub not_found: u64,
    pub failed: u64,
}

impl GateMetrics {
    pub fn record(&self, outcome: &GateOutcome) {
        let counter = match outcome {
            GateOutcome::File(mediagate_core::FileResponse::Full(_)) => &self.served,
            GateOutcome::File(mediagate_core::FileResponse::NotModified) => &self.not_modified,
            GateOutcome::Denied => &self.denied,
            GateOutcome::Redirect(_) => &self.redirected,
            GateOutcome::NotFound | GateOutcome::Skipped => &self.not_found,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GateMetricsSnapshot {
        GateMetricsSnapshot {
            served: self.served.load(Ordering::Relaxed),
            not_modified: self.not_modified.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            redirected: self.redirected.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_increment_their_counters() {
        let metrics = GateMetrics::default();
        metrics.record(&GateOutcome::Denied);
        metrics.record(&GateOutcome::NotFound);
        metrics.record(&GateOutcome::Skipped);
        metrics.record(&GateOutcome::File(mediagate_core::FileResponse::NotModified));
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.denied, 1);
        assert_eq!(snapshot.not_found, 2);
        assert_eq!(snapshot.not_modified, 1);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.served, 0);
    }
}
