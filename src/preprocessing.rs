// src/preprocessing.rs

use crate::error::{FollowerError, FollowerResult};
use crate::types::Frame;
use tracing::debug;

/// Fixed rotation about the frame center, applied to every frame before edge
/// extraction to undo the camera's mounting angle.
///
/// Follows the `getRotationMatrix2D` + `warpAffine` convention: the forward
/// matrix maps source to destination, and each destination pixel is sampled
/// bilinearly from the inverse-mapped source location.
#[derive(Debug, Clone)]
pub struct RotationCorrection {
    width: usize,
    height: usize,
    inverse: [[f64; 3]; 2],
    border: [u8; 3],
    identity: bool,
}

impl RotationCorrection {
    pub fn new(width: usize, height: usize, angle_deg: f64, border: [u8; 3]) -> Self {
        let forward = rotation_matrix(
            ((width / 2) as f64, (height / 2) as f64),
            angle_deg,
            1.0,
        );
        let inverse = invert_affine(&forward);
        let identity = angle_deg.rem_euclid(360.0) == 0.0;

        debug!(
            "Rotation correction {:.1}° about ({}, {}), identity={}",
            angle_deg,
            width / 2,
            height / 2,
            identity
        );

        Self {
            width,
            height,
            inverse,
            border,
            identity,
        }
    }

    /// Rotate one frame. The frame must match the session size and carry a
    /// full RGB buffer.
    pub fn apply(&self, frame: &Frame) -> FollowerResult<Frame> {
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
        if self.identity {
            return Ok(frame.clone());
        }

        let w = self.width;
        let h = self.height;
        let mut out = vec![0u8; w * h * 3];
        let m = &self.inverse;

        for dy in 0..h {
            for dx in 0..w {
                let x = dx as f64;
                let y = dy as f64;
                let sx = m[0][0] * x + m[0][1] * y + m[0][2];
                let sy = m[1][0] * x + m[1][1] * y + m[1][2];

                let rgb = self.sample_bilinear(frame, sx, sy);
                let idx = (dy * w + dx) * 3;
                out[idx..idx + 3].copy_from_slice(&rgb);
            }
        }

        Ok(Frame {
            data: out,
            width: w,
            height: h,
            timestamp_ms: frame.timestamp_ms,
        })
    }

    fn sample_bilinear(&self, frame: &Frame, sx: f64, sy: f64) -> [u8; 3] {
        let x0 = sx.floor();
        let y0 = sy.floor();
        let fx = sx - x0;
        let fy = sy - y0;
        let x0 = x0 as i64;
        let y0 = y0 as i64;

        let p00 = self.tap(frame, x0, y0);
        let p10 = self.tap(frame, x0 + 1, y0);
        let p01 = self.tap(frame, x0, y0 + 1);
        let p11 = self.tap(frame, x0 + 1, y0 + 1);

        let mut rgb = [0u8; 3];
        for c in 0..3 {
            let val = p00[c] as f64 * (1.0 - fx) * (1.0 - fy)
                + p10[c] as f64 * fx * (1.0 - fy)
                + p01[c] as f64 * (1.0 - fx) * fy
                + p11[c] as f64 * fx * fy;
            rgb[c] = val.round().clamp(0.0, 255.0) as u8;
        }
        rgb
    }

    fn tap(&self, frame: &Frame, x: i64, y: i64) -> [u8; 3] {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            self.border
        } else {
            frame.pixel(x as usize, y as usize)
        }
    }
}

/// 2x3 rotation matrix about `center`, positive angles counter-clockwise in
/// image coordinates.
fn rotation_matrix(center: (f64, f64), angle_deg: f64, scale: f64) -> [[f64; 3]; 2] {
    let (cx, cy) = center;
    let rad = angle_deg.to_radians();
    let alpha = scale * rad.cos();
    let beta = scale * rad.sin();
    [
        [alpha, beta, (1.0 - alpha) * cx - beta * cy],
        [-beta, alpha, beta * cx + (1.0 - alpha) * cy],
    ]
}

fn invert_affine(m: &[[f64; 3]; 2]) -> [[f64; 3]; 2] {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    let det = if det != 0.0 { 1.0 / det } else { 0.0 };
    let a11 = m[1][1] * det;
    let a22 = m[0][0] * det;
    let a12 = -m[0][1] * det;
    let a21 = -m[1][0] * det;
    let b1 = -a11 * m[0][2] - a12 * m[1][2];
    let b2 = -a21 * m[0][2] - a22 * m[1][2];
    [[a11, a12, b1], [a21, a22, b2]]
}
