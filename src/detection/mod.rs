// src/detection/mod.rs
//
// Single-frame vision path:
//   Frame → edges::EdgeExtractor → EdgeMask
//         → scanner::LaneScanner (+ ScanHistory) → DetectionResult
//         → deviation::compute_deviation → TrackState

mod deviation;
mod edges;
mod scanner;
mod types;

// Re-export public APIs
pub use deviation::compute_deviation;
pub use edges::{EdgeExtractor, EdgeMask};
pub use scanner::{LaneScanner, ScanOutcome};
pub use types::*;
