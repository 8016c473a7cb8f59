// src/motor/mod.rs

#[cfg(test)]
pub mod mock;
mod protocol;
mod transport;

pub use protocol::{AckStatus, LinkState, MotorCommand, MotorController};
pub use transport::{SerialPortTransport, SerialSettings, SerialTransport};
