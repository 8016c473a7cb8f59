// src/motor/mock.rs

use super::transport::SerialTransport;
use crate::error::{FollowerError, FollowerResult};
use std::collections::VecDeque;

/// How the fake motor controller answers a written frame.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer `OK_` + the frame, like healthy firmware
    Echo,
    /// Answer with these exact bytes
    Bytes(Vec<u8>),
    /// Answer nothing; the read times out
    Silence,
}

/// In-memory transport that records writes and scripts replies.
#[derive(Debug, Default)]
pub struct MockTransport {
    open: bool,
    pub fail_open: bool,
    pub fail_writes: bool,
    pub written: Vec<Vec<u8>>,
    pub open_count: usize,
    pub close_count: usize,
    pub discarded: usize,
    replies: VecDeque<Reply>,
    pending: Vec<u8>,
}

impl MockTransport {
    /// A transport whose every reply is a correct echo.
    pub fn echoing() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn written_frames(&self) -> Vec<String> {
        self.written
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }
}

impl SerialTransport for MockTransport {
    fn open(&mut self) -> FollowerResult<()> {
        if self.fail_open {
            return Err(FollowerError::SerialOpen {
                device: "mock".to_string(),
                reason: "no such device".to_string(),
            });
        }
        self.open = true;
        self.open_count += 1;
        Ok(())
    }

    fn close(&mut self) -> FollowerResult<()> {
        self.open = false;
        self.close_count += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn discard_input(&mut self) -> FollowerResult<()> {
        if !self.open {
            return Err(FollowerError::LinkClosed);
        }
        self.discarded += self.pending.len();
        self.pending.clear();
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> FollowerResult<()> {
        if !self.open {
            return Err(FollowerError::LinkClosed);
        }
        if self.fail_writes {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged").into());
        }
        self.written.push(bytes.to_vec());
        match self.replies.pop_front().unwrap_or(Reply::Echo) {
            Reply::Echo => {
                self.pending.extend_from_slice(b"OK_");
                self.pending.extend_from_slice(bytes);
            }
            Reply::Bytes(b) => self.pending.extend_from_slice(&b),
            Reply::Silence => {}
        }
        Ok(())
    }

    fn read_up_to(&mut self, len: usize) -> FollowerResult<Vec<u8>> {
        if !self.open {
            return Err(FollowerError::LinkClosed);
        }
        let n = len.min(self.pending.len());
        Ok(self.pending.drain(..n).collect())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
