// src/lib.rs
//
// Track following for a camera-guided vehicle: edge extraction, boundary
// scanning, deviation geometry and the framed serial motor protocol, tied
// together by a synchronous control loop.

#[cfg(feature = "camera")]
pub mod camera;
pub mod config;
pub mod detection;
pub mod error;
pub mod motor;
pub mod pipeline;
pub mod preprocessing;
pub mod types;
pub mod video_processor;

pub use error::{FollowerError, FollowerResult};
pub use types::{Config, Frame};
