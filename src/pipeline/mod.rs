// src/pipeline/mod.rs

pub mod control_loop;
pub mod metrics;
pub mod overlay;

pub use control_loop::{
    CancelFlag, ControlLoop, CycleOutcome, CycleReport, DisplaySink, DriveMode, FrameSource,
    LinkReport, OperatorInput, StopReason, TrackStatus,
};
pub use metrics::{CycleMetrics, MetricsSummary};
pub use overlay::{Overlay, OverlaySegment, OverlayText};
