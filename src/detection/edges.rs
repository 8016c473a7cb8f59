// src/detection/edges.rs
//
// Binary edge extraction for a dark track on a bright floor.
//
//   RGB → gray (BT.601) → inverted threshold → opening (k×k) → Canny
//
// Operates on raw row-major buffers; no OpenCV dependency, so the vision
// path builds and tests without a system OpenCV install.

use crate::error::{FollowerError, FollowerResult};
use crate::types::{Frame, VisionConfig};
use tracing::debug;

const TAN_22_5: f32 = 0.414_213_56;
const TAN_67_5: f32 = 2.414_213_6;

/// Binary edge image, 255 for edge pixels and 0 elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMask {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl EdgeMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    pub fn set_edge(&mut self, x: usize, y: usize) {
        self.data[y * self.width + x] = 255;
    }

    /// Highlight a full row, used to show the scan rows on the display.
    pub fn mark_row(&mut self, y: usize) {
        if y < self.height {
            self.data[y * self.width..(y + 1) * self.width].fill(255);
        }
    }

    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

pub struct EdgeExtractor {
    width: usize,
    height: usize,
    threshold: u8,
    kernel_size: usize,
    canny_low: f32,
    canny_high: f32,
}

impl EdgeExtractor {
    pub fn new(width: usize, height: usize, config: &VisionConfig) -> Self {
        Self {
            width,
            height,
            threshold: config.threshold,
            kernel_size: config.kernel_size,
            canny_low: config.canny_low,
            canny_high: config.canny_high,
        }
    }

    pub fn extract(&self, frame: &Frame) -> FollowerResult<EdgeMask> {
        if frame.width != self.width || frame.height != self.height || !frame.has_consistent_buffer()
        {
            return Err(FollowerError::FrameDimensions {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: frame.width,
                actual_height: frame.height,
                actual_len: frame.data.len(),
            });
        }

        let (w, h) = (self.width, self.height);
        let gray = to_gray(&frame.data);
        let binary = threshold_inverted(&gray, self.threshold);

        let radius = self.kernel_size / 2;
        let eroded = morph(&binary, w, h, radius, true);
        let opened = morph(&eroded, w, h, radius, false);

        let edges = canny(&opened, w, h, self.canny_low, self.canny_high);
        let mask = EdgeMask {
            data: edges,
            width: w,
            height: h,
        };

        debug!("Edge mask: {} edge pixels", mask.edge_count());
        Ok(mask)
    }
}

/// Fixed-point BT.601 luma, same weights and rounding as OpenCV's RGB2GRAY.
fn to_gray(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .map(|p| {
            let v = p[0] as u32 * 4899 + p[1] as u32 * 9617 + p[2] as u32 * 1868 + 8192;
            (v >> 14) as u8
        })
        .collect()
}

fn threshold_inverted(gray: &[u8], threshold: u8) -> Vec<u8> {
    gray.iter()
        .map(|&g| if g > threshold { 0 } else { 255 })
        .collect()
}

/// Separable square erosion (min) or dilation (max). Taps outside the image
/// are ignored.
fn morph(src: &[u8], w: usize, h: usize, radius: usize, erode: bool) -> Vec<u8> {
    if w == 0 || h == 0 || radius == 0 {
        return src.to_vec();
    }

    let init = if erode { u8::MAX } else { 0 };
    let pick = |acc: u8, v: u8| if erode { acc.min(v) } else { acc.max(v) };

    let mut tmp = vec![0u8; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(w - 1);
            tmp[y * w + x] = row[x0..=x1].iter().fold(init, |acc, &v| pick(acc, v));
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(h - 1);
        for x in 0..w {
            out[y * w + x] = (y0..=y1).fold(init, |acc, yy| pick(acc, tmp[yy * w + x]));
        }
    }
    out
}

/// Canny edge detector: 3×3 Sobel (replicated border), L1 magnitude,
/// 4-direction non-maximum suppression and 8-connected hysteresis.
fn canny(src: &[u8], w: usize, h: usize, low: f32, high: f32) -> Vec<u8> {
    let mut out = vec![0u8; w * h];
    if w == 0 || h == 0 {
        return out;
    }

    let (wi, hi) = (w as i64, h as i64);
    let px = |x: i64, y: i64| -> i32 {
        let x = x.clamp(0, wi - 1) as usize;
        let y = y.clamp(0, hi - 1) as usize;
        src[y * w + x] as i32
    };

    let mut gx = vec![0i32; w * h];
    let mut gy = vec![0i32; w * h];
    let mut mag = vec![0i32; w * h];
    for y in 0..hi {
        for x in 0..wi {
            let dx = (px(x + 1, y - 1) + 2 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x - 1, y) + px(x - 1, y + 1));
            let dy = (px(x - 1, y + 1) + 2 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x, y - 1) + px(x + 1, y - 1));
            let idx = (y * wi + x) as usize;
            gx[idx] = dx;
            gy[idx] = dy;
            mag[idx] = dx.abs() + dy.abs();
        }
    }

    let m = |x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= wi || y >= hi {
            0
        } else {
            mag[(y * wi + x) as usize]
        }
    };

    // 0 = suppressed, 1 = weak, 2 = strong
    let mut state = vec![0u8; w * h];
    let mut stack = Vec::new();
    for y in 0..hi {
        for x in 0..wi {
            let idx = (y * wi + x) as usize;
            let mv = mag[idx];
            if mv as f32 <= low {
                continue;
            }

            let ax = gx[idx].abs() as f32;
            let ay = gy[idx].abs() as f32;
            let is_max = if ay < ax * TAN_22_5 {
                mv > m(x - 1, y) && mv >= m(x + 1, y)
            } else if ay > ax * TAN_67_5 {
                mv > m(x, y - 1) && mv >= m(x, y + 1)
            } else {
                let s = if (gx[idx] < 0) != (gy[idx] < 0) { -1 } else { 1 };
                mv > m(x - s, y - 1) && mv > m(x + s, y + 1)
            };

            if is_max {
                if mv as f32 > high {
                    state[idx] = 2;
                    out[idx] = 255;
                    stack.push((x, y));
                } else {
                    state[idx] = 1;
                }
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for ny in (y - 1)..=(y + 1) {
            for nx in (x - 1)..=(x + 1) {
                if nx < 0 || ny < 0 || nx >= wi || ny >= hi {
                    continue;
                }
                let n = (ny * wi + nx) as usize;
                if state[n] == 1 && out[n] == 0 {
                    out[n] = 255;
                    stack.push((nx, ny));
                }
            }
        }
    }

    out
}
