// src/motor/protocol.rs
//
// ASCII command framing for the motor controller firmware.
//
//   command:  T<theta>E<epsilon>U<u*100><end marker>     e.g. T+12E-05U+20UniRAIL
//   reply:    OK_<command>
//
// Numeric fields carry an explicit sign and are zero-padded to three
// characters including the sign. Every command is followed by exactly one
// acknowledgment read; a bad or missing echo is a warning, never an error.

use super::transport::SerialTransport;
use crate::error::{FollowerError, FollowerResult};
use crate::types::SerialConfig;
use serde::Serialize;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const ACK_PREFIX: &str = "OK_";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotorCommand {
    pub theta: i32,
    pub epsilon: i32,
    /// Speed in [-1, 1]
    pub u: f32,
}

impl MotorCommand {
    pub fn new(theta: i32, epsilon: i32, u: f32) -> Self {
        Self { theta, epsilon, u }
    }

    /// Stop: no steering, no speed.
    pub fn neutral() -> Self {
        Self::new(0, 0, 0.0)
    }

    /// Speed as transmitted: clamped to [-1, 1] and scaled to hundredths.
    pub fn speed_hundredths(&self) -> i32 {
        let u = if self.u.is_nan() { 0.0 } else { self.u.clamp(-1.0, 1.0) };
        (u * 100.0).round() as i32
    }

    pub fn encode(&self, end_marker: &str) -> String {
        format!(
            "T{:+03}E{:+03}U{:+03}{}",
            self.theta,
            self.epsilon,
            self.speed_hundredths(),
            end_marker
        )
    }
}

/// Result of the acknowledgment read that follows every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckStatus {
    Acknowledged,
    /// A full-length reply arrived but differs from the expected echo
    Mismatch { expected: String, received: String },
    /// Fewer bytes than expected arrived before the timeout
    TimedOut { received: String },
}

impl AckStatus {
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, AckStatus::Acknowledged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Closed,
    Open,
}

/// Motor controller session: framing and echo verification on top of a
/// transport it owns.
pub struct MotorController<T: SerialTransport> {
    transport: T,
    state: LinkState,
    end_marker: String,
    stop_settle: Duration,
    ack_warnings: u64,
}

impl<T: SerialTransport> MotorController<T> {
    pub fn new(transport: T, config: &SerialConfig) -> Self {
        Self {
            transport,
            state: LinkState::Closed,
            end_marker: config.end_marker.clone(),
            stop_settle: Duration::from_millis(config.stop_settle_ms),
            ack_warnings: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open
    }

    /// Acknowledgment reads that were mismatched or timed out.
    pub fn ack_warnings(&self) -> u64 {
        self.ack_warnings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn start_com(&mut self) -> FollowerResult<()> {
        if self.state == LinkState::Open {
            debug!("Motor link already open");
            return Ok(());
        }
        self.transport.open()?;
        self.state = LinkState::Open;

        info!("🔌 Motor controller linked");
        info!("   serial link: {}", self.transport.describe());
        info!("   end marker: {}", self.end_marker);
        Ok(())
    }

    pub fn send_command(&mut self, command: &MotorCommand) -> FollowerResult<AckStatus> {
        if self.state != LinkState::Open {
            return Err(FollowerError::LinkClosed);
        }

        let frame = command.encode(&self.end_marker);
        let expected = format!("{}{}", ACK_PREFIX, frame);

        // A reply that missed the previous read window must not be taken
        // for this command's echo
        self.transport.discard_input()?;
        self.transport.write_all(frame.as_bytes())?;
        let reply = self.transport.read_up_to(expected.len())?;
        let received = String::from_utf8_lossy(&reply).into_owned();

        let status = if reply == expected.as_bytes() {
            AckStatus::Acknowledged
        } else if reply.len() < expected.len() {
            AckStatus::TimedOut { received }
        } else {
            AckStatus::Mismatch { expected, received }
        };

        match &status {
            AckStatus::Acknowledged => debug!("→ {} acknowledged", frame),
            AckStatus::TimedOut { received } => {
                self.ack_warnings += 1;
                warn!(
                    "Motor controller did not acknowledge {} in time (got {:?})",
                    frame, received
                );
            }
            AckStatus::Mismatch { expected, received } => {
                self.ack_warnings += 1;
                warn!(
                    "Motor controller echo mismatch: expected {:?}, got {:?}",
                    expected, received
                );
            }
        }

        Ok(status)
    }

    /// Stop the vehicle and close the link. No-op when already closed.
    pub fn end_com(&mut self) -> FollowerResult<()> {
        if self.state == LinkState::Closed {
            return Ok(());
        }

        if let Err(e) = self.send_command(&MotorCommand::neutral()) {
            warn!("Neutral stop command failed: {}", e);
        }
        thread::sleep(self.stop_settle);

        self.state = LinkState::Closed;
        self.transport.close()?;
        info!("🔌 Motor controller link closed");
        Ok(())
    }
}

impl<T: SerialTransport> Drop for MotorController<T> {
    fn drop(&mut self) {
        if let Err(e) = self.end_com() {
            warn!("Motor link shutdown failed: {}", e);
        }
    }
}
