// src/detection/deviation.rs

use super::types::{BoundaryPair, TrackState};
use std::f64::consts::PI;
use tracing::debug;

/// Heading angle and lateral gap between the robot's heading line and the
/// center (cap) line.
///
/// The two lines and the segment joining their far-row endpoints form a
/// triangle; the law of cosines recovers the angle between the lines.
/// `theta` is negative when the robot veers right (the center line's near-row
/// x is left of its far-row x). `epsilon` is the signed near-row gap,
/// heading minus center.
///
/// Returns `None` for degenerate geometry: a zero-length line, or a cosine
/// outside [-1, 1].
pub fn compute_deviation(heading: &BoundaryPair, center: &BoundaryPair) -> Option<TrackState> {
    let a = center.length();
    let b = heading.length();
    if a == 0.0 || b == 0.0 {
        debug!("Degenerate line: |center|={:.1}, |heading|={:.1}", a, b);
        return None;
    }

    let c = (center.dx() + heading.dx()) as f64;
    let cos_arg = (c * c - a * a - b * b) / (2.0 * a * b);
    if !(-1.0..=1.0).contains(&cos_arg) {
        debug!("Law-of-cosines argument out of range: {}", cos_arg);
        return None;
    }

    let mut theta = ((cos_arg.acos() - PI) * 180.0 / PI).round().abs() as i32;
    if center.near.x < center.far.x {
        theta = -theta;
    }
    let epsilon = heading.near.x - center.near.x;

    Some(TrackState::new(theta, epsilon))
}
