// src/error.rs

use thiserror::Error;

/// Errors surfaced by the vision, protocol and control-loop layers.
///
/// Per-cycle recoverable conditions (no track, degenerate geometry, bad
/// acknowledgments) are not errors; they travel as `TrackStatus` and
/// `AckStatus` values instead.
#[derive(Error, Debug)]
pub enum FollowerError {
    #[error("frame is {actual_width}x{actual_height} ({actual_len} bytes), session expects {expected_width}x{expected_height}")]
    FrameDimensions {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
        actual_len: usize,
    },

    #[error("scan row {row} is outside a mask of height {height}")]
    ScanRowOutOfBounds { row: usize, height: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to open serial device {device}: {reason}")]
    SerialOpen { device: String, reason: String },

    #[error("serial transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("motor link is closed")]
    LinkClosed,

    #[error("camera error: {0}")]
    Camera(String),

    #[error("frame decode error: {0}")]
    Decode(#[from] image::ImageError),
}

impl From<serialport::Error> for FollowerError {
    fn from(err: serialport::Error) -> Self {
        FollowerError::Transport(err.into())
    }
}

#[cfg(feature = "camera")]
impl From<opencv::Error> for FollowerError {
    fn from(err: opencv::Error) -> Self {
        FollowerError::Camera(err.message)
    }
}

pub type FollowerResult<T> = std::result::Result<T, FollowerError>;
