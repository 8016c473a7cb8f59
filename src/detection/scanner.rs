// src/detection/scanner.rs
//
// Row scanner for the three right-side boundaries.
//
// The vehicle's own body sits right of the painted line, so scanning each
// scan row from the right border inward meets, in order:
//   1. the track edge (body shadow boundary)
//   2. the inner edge of the painted line, after skipping `inner_skip` columns
//   3. the outer edge of the painted line, after skipping `outer_skip` columns
//
// Constant work per row; no line fitting.

use super::edges::EdgeMask;
use super::types::{BoundaryPair, DetectionResult, Point, ScanHistory};
use crate::error::{FollowerError, FollowerResult};
use crate::types::VisionConfig;
use tracing::debug;

/// Detection for one mask plus the history to hand to the next scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub detection: Option<DetectionResult>,
    pub history: ScanHistory,
}

#[derive(Debug, Clone, Copy)]
struct RowHits {
    track_edge: usize,
    inner_line: usize,
    outer_line: usize,
}

pub struct LaneScanner {
    inner_skip: usize,
    outer_skip: usize,
    turn_tolerance_px: i32,
}

impl LaneScanner {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            inner_skip: config.inner_skip,
            outer_skip: config.outer_skip,
            turn_tolerance_px: config.turn_tolerance_px,
        }
    }

    /// Scan rows `y1` and `y2` (either order; the larger is the near row).
    ///
    /// A failed scan yields no detection and an empty history.
    pub fn scan(
        &self,
        mask: &EdgeMask,
        y1: usize,
        y2: usize,
        history: ScanHistory,
    ) -> FollowerResult<ScanOutcome> {
        for row in [y1, y2] {
            if row >= mask.height() {
                return Err(FollowerError::ScanRowOutOfBounds {
                    row,
                    height: mask.height(),
                });
            }
        }
        let (near_y, far_y) = if y1 < y2 { (y2, y1) } else { (y1, y2) };

        let hits = self
            .scan_row(mask, near_y)
            .zip(self.scan_row(mask, far_y));
        let Some((near, far)) = hits else {
            debug!("No boundary set on rows {}/{}", near_y, far_y);
            return Ok(ScanOutcome {
                detection: None,
                history: ScanHistory::empty(),
            });
        };

        let pair = |near_x: usize, far_x: usize| {
            BoundaryPair::new(
                Point::new(near_x as i32, near_y as i32),
                Point::new(far_x as i32, far_y as i32),
            )
        };
        let track_edge = pair(near.track_edge, far.track_edge);
        let turn_right = self.track_edge_unmoved(&track_edge, &history);

        let detection = DetectionResult {
            track_edge,
            inner_line: pair(near.inner_line, far.inner_line),
            outer_line: pair(near.outer_line, far.outer_line),
            turn_right,
        };

        debug!(
            "Boundaries near/far: edge {}/{}, inner {}/{}, outer {}/{}, turn_right={}",
            near.track_edge,
            far.track_edge,
            near.inner_line,
            far.inner_line,
            near.outer_line,
            far.outer_line,
            turn_right
        );

        Ok(ScanOutcome {
            detection: Some(detection),
            history: ScanHistory::with_track_edge(track_edge),
        })
    }

    fn scan_row(&self, mask: &EdgeMask, y: usize) -> Option<RowHits> {
        let track_edge = first_edge_leftward(mask, y, mask.width() as i64 - 1)?;
        let inner_line = first_edge_leftward(mask, y, track_edge as i64 - self.inner_skip as i64)?;
        let outer_line = first_edge_leftward(mask, y, inner_line as i64 - self.outer_skip as i64)?;
        Some(RowHits {
            track_edge,
            inner_line,
            outer_line,
        })
    }

    fn track_edge_unmoved(&self, track_edge: &BoundaryPair, history: &ScanHistory) -> bool {
        match history.last_track_edge() {
            Some(last) => {
                (last.near.x - track_edge.near.x).abs() < self.turn_tolerance_px
                    || (last.far.x - track_edge.far.x).abs() < self.turn_tolerance_px
            }
            None => false,
        }
    }
}

/// First edge column at or left of `start` on row `y`, column 0 included.
fn first_edge_leftward(mask: &EdgeMask, y: usize, start: i64) -> Option<usize> {
    if start < 0 || mask.width() == 0 {
        return None;
    }
    let start = (start as usize).min(mask.width() - 1);
    (0..=start).rev().find(|&x| mask.is_edge(x, y))
}
