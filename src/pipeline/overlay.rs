// src/pipeline/overlay.rs
//
// What the display should draw for one cycle. Rendering itself belongs to
// the display sink.

use crate::detection::{DetectionResult, Point, TrackState};

use super::control_loop::DriveMode;

/// Colors in RGB.
pub mod colors {
    pub const ROBOT: [u8; 3] = [255, 0, 255];
    pub const CENTRE: [u8; 3] = [255, 0, 0];
    pub const STATUS: [u8; 3] = [255, 0, 0];
    pub const MODE: [u8; 3] = [0, 0, 255];
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySegment {
    pub from: Point,
    pub to: Point,
    pub color: [u8; 3],
    /// Drawn just above the `to` endpoint
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    pub text: String,
    pub origin: Point,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub segments: Vec<OverlaySegment>,
    pub texts: Vec<OverlayText>,
}

impl Overlay {
    pub fn for_cycle(
        detection: Option<&DetectionResult>,
        state: TrackState,
        fps: u32,
        mode: DriveMode,
    ) -> Self {
        let mut overlay = Overlay::default();

        if let Some(det) = detection {
            overlay.segments.push(OverlaySegment {
                from: det.inner_line.near,
                to: det.inner_line.far,
                color: colors::ROBOT,
                label: Some("Robot".to_string()),
            });
            overlay.segments.push(OverlaySegment {
                from: det.outer_line.near,
                to: det.outer_line.far,
                color: colors::CENTRE,
                label: Some("Centre".to_string()),
            });
        }

        overlay.texts.push(OverlayText {
            text: format!(
                "FPS: {}, Theta: {}, Eps: {}",
                fps, state.theta, state.epsilon
            ),
            origin: Point::new(2, 10),
            color: colors::STATUS,
        });

        if let Some(label) = mode.badge() {
            overlay.texts.push(OverlayText {
                text: label.to_string(),
                origin: Point::new(2, 20),
                color: colors::MODE,
            });
        }

        overlay
    }
}
