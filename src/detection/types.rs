// src/detection/types.rs

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One boundary line sampled on the two scan rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundaryPair {
    /// Point on the lower (near) scan row
    pub near: Point,
    /// Point on the upper (far) scan row
    pub far: Point,
}

impl BoundaryPair {
    pub fn new(near: Point, far: Point) -> Self {
        Self { near, far }
    }

    pub fn dx(&self) -> i32 {
        self.far.x - self.near.x
    }

    pub fn dy(&self) -> i32 {
        self.far.y - self.near.y
    }

    pub fn length(&self) -> f64 {
        (self.dx() as f64).hypot(self.dy() as f64)
    }
}

/// The three boundaries found scanning inward from the right border.
///
/// Either all three are present or there is no detection at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub track_edge: BoundaryPair,
    pub inner_line: BoundaryPair,
    pub outer_line: BoundaryPair,
    /// The track edge has not moved since the previous detection
    pub turn_right: bool,
}

/// Context carried between scans: the last successful track-edge pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanHistory {
    last_track_edge: Option<BoundaryPair>,
}

impl ScanHistory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_track_edge(track_edge: BoundaryPair) -> Self {
        Self {
            last_track_edge: Some(track_edge),
        }
    }

    pub fn last_track_edge(&self) -> Option<&BoundaryPair> {
        self.last_track_edge.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.last_track_edge.is_none()
    }
}

/// Heading deviation (degrees) and lateral gap (pixels) for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackState {
    pub theta: i32,
    pub epsilon: i32,
}

impl TrackState {
    pub fn new(theta: i32, epsilon: i32) -> Self {
        Self { theta, epsilon }
    }

    pub fn straight() -> Self {
        Self::default()
    }
}
