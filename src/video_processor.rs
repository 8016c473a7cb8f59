// src/video_processor.rs
//
// Frame sources and sinks that need no camera hardware: replay of recorded
// frames from a directory and a headless display.

use crate::detection::EdgeMask;
use crate::error::FollowerResult;
use crate::pipeline::{DisplaySink, FrameSource, OperatorInput, Overlay};
use crate::types::Frame;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Replays still images in file-name order as if they came from the camera.
pub struct ReplaySource {
    files: Vec<PathBuf>,
    next: usize,
    frame_period_ms: f64,
}

impl ReplaySource {
    pub fn open(dir: impl AsRef<Path>) -> FollowerResult<Self> {
        let dir = dir.as_ref();
        let files = find_frame_files(dir);
        info!("🎞️  Replaying {} frames from {}", files.len(), dir.display());
        Ok(Self {
            files,
            next: 0,
            frame_period_ms: 1000.0 / 30.0,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn progress(&self) -> f32 {
        if self.files.is_empty() {
            return 0.0;
        }
        (self.next as f32 / self.files.len() as f32) * 100.0
    }
}

impl FrameSource for ReplaySource {
    fn read_frame(&mut self) -> FollowerResult<Option<Frame>> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let timestamp_ms = self.next as f64 * self.frame_period_ms;
        self.next += 1;

        debug!("Frame {} from {}", self.next, path.display());
        Ok(Some(Frame::new(rgb.into_raw(), width, height, timestamp_ms)))
    }

    fn release(&mut self) {
        self.next = self.files.len();
    }
}

fn find_frame_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Display sink for headless runs.
#[derive(Debug, Default)]
pub struct NullDisplay {
    presented: u64,
}

impl NullDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl DisplaySink for NullDisplay {
    fn present(
        &mut self,
        _frame: &Frame,
        _edges: &EdgeMask,
        _overlay: &Overlay,
    ) -> FollowerResult<OperatorInput> {
        self.presented += 1;
        Ok(OperatorInput::None)
    }
}
