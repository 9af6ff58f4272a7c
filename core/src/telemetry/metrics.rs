use std::sync::Mutex;

/// Run counters shared between the CLI and the presenter bridge.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub completed: usize,
    pub failed: usize,
    pub rows_predicted: usize,
}

struct Metrics {
    completed: usize,
    failed: usize,
    rows_predicted: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                completed: 0,
                failed: 0,
                rows_predicted: 0,
            }),
        }
    }

    pub fn record_completed(&self, rows: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.completed += 1;
            metrics.rows_predicted += rows;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                completed: metrics.completed,
                failed: metrics.failed,
                rows_predicted: metrics.rows_predicted,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
