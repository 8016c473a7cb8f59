// src/motor/transport.rs
//
// Narrow byte-pipe capability the motor protocol runs over. The hardware
// implementation wraps the `serialport` crate; tests use `MockTransport`.

use crate::error::{FollowerError, FollowerResult};
use crate::types::SerialConfig;
use serialport::{ClearBuffer, SerialPort};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};
use tracing::debug;

pub trait SerialTransport {
    fn open(&mut self) -> FollowerResult<()>;

    fn close(&mut self) -> FollowerResult<()>;

    fn is_open(&self) -> bool;

    /// Drop bytes already received but not yet read, such as a late echo.
    fn discard_input(&mut self) -> FollowerResult<()>;

    fn write_all(&mut self, bytes: &[u8]) -> FollowerResult<()>;

    /// Read up to `len` bytes, returning fewer if the read timeout elapses first.
    fn read_up_to(&mut self, len: usize) -> FollowerResult<Vec<u8>>;

    /// Human-readable device identifier for logs.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub device: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl From<&SerialConfig> for SerialSettings {
    fn from(config: &SerialConfig) -> Self {
        Self {
            device: config.device(),
            baud_rate: config.baud_rate,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

pub struct SerialPortTransport {
    settings: SerialSettings,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialPortTransport {
    pub fn new(settings: SerialSettings) -> Self {
        Self {
            settings,
            port: None,
        }
    }
}

impl SerialTransport for SerialPortTransport {
    fn open(&mut self) -> FollowerResult<()> {
        if self.port.is_some() {
            return Ok(());
        }
        let port = serialport::new(&self.settings.device, self.settings.baud_rate)
            .timeout(self.settings.timeout)
            .open()
            .map_err(|e| FollowerError::SerialOpen {
                device: self.settings.device.clone(),
                reason: e.to_string(),
            })?;
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> FollowerResult<()> {
        // Dropping the handle closes the file descriptor
        if self.port.take().is_some() {
            debug!("Closed {}", self.settings.device);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn discard_input(&mut self) -> FollowerResult<()> {
        let port = self.port.as_mut().ok_or(FollowerError::LinkClosed)?;
        port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> FollowerResult<()> {
        let port = self.port.as_mut().ok_or(FollowerError::LinkClosed)?;
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    fn read_up_to(&mut self, len: usize) -> FollowerResult<Vec<u8>> {
        let timeout = self.settings.timeout;
        let port = self.port.as_mut().ok_or(FollowerError::LinkClosed)?;

        let mut buf = vec![0u8; len];
        let mut filled = 0;
        let deadline = Instant::now() + timeout;

        while filled < len {
            match port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        buf.truncate(filled);
        Ok(buf)
    }

    fn describe(&self) -> String {
        format!(
            "{} @ {} baud, timeout {:.1}s",
            self.settings.device,
            self.settings.baud_rate,
            self.settings.timeout.as_secs_f32()
        )
    }
}
