// src/pipeline/metrics.rs
//
// Cycle counters and timing for the control loop. Counters are shared
// atomics so a handle can be cloned out before the loop moves to its
// blocking thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct CycleMetrics {
    pub total_cycles: Arc<AtomicU64>,
    pub tracked_cycles: Arc<AtomicU64>,
    pub turn_overrides: Arc<AtomicU64>,
    pub no_track_cycles: Arc<AtomicU64>,
    pub degenerate_cycles: Arc<AtomicU64>,
    pub commands_sent: Arc<AtomicU64>,
    pub ack_warnings: Arc<AtomicU64>,
    pub transport_errors: Arc<AtomicU64>,
    pub vision_time_us: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl CycleMetrics {
    pub fn new() -> Self {
        Self {
            total_cycles: Arc::new(AtomicU64::new(0)),
            tracked_cycles: Arc::new(AtomicU64::new(0)),
            turn_overrides: Arc::new(AtomicU64::new(0)),
            no_track_cycles: Arc::new(AtomicU64::new(0)),
            degenerate_cycles: Arc::new(AtomicU64::new(0)),
            commands_sent: Arc::new(AtomicU64::new(0)),
            ack_warnings: Arc::new(AtomicU64::new(0)),
            transport_errors: Arc::new(AtomicU64::new(0)),
            vision_time_us: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_timing(&self, counter: &AtomicU64, duration_us: u64) {
        counter.store(duration_us, Ordering::Relaxed);
    }

    pub fn fps(&self) -> f64 {
        let cycles = self.total_cycles.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            cycles as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_cycles: self.total_cycles.load(Ordering::Relaxed),
            fps: self.fps(),
            tracked_cycles: self.tracked_cycles.load(Ordering::Relaxed),
            turn_overrides: self.turn_overrides.load(Ordering::Relaxed),
            no_track_cycles: self.no_track_cycles.load(Ordering::Relaxed),
            degenerate_cycles: self.degenerate_cycles.load(Ordering::Relaxed),
            commands_sent: self.commands_sent.load(Ordering::Relaxed),
            ack_warnings: self.ack_warnings.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            last_vision_us: self.vision_time_us.load(Ordering::Relaxed),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for CycleMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub total_cycles: u64,
    pub fps: f64,
    pub tracked_cycles: u64,
    pub turn_overrides: u64,
    pub no_track_cycles: u64,
    pub degenerate_cycles: u64,
    pub commands_sent: u64,
    pub ack_warnings: u64,
    pub transport_errors: u64,
    pub last_vision_us: u64,
    pub elapsed_secs: f64,
}

impl MetricsSummary {
    /// Share of cycles that produced a usable detection.
    pub fn tracking_ratio(&self) -> f64 {
        if self.total_cycles == 0 {
            return 0.0;
        }
        (self.tracked_cycles + self.turn_overrides) as f64 / self.total_cycles as f64
    }
}
