// src/camera.rs
//
// Live capture and on-screen display through OpenCV. Built only with the
// `camera` feature.

use crate::detection::EdgeMask;
use crate::error::{FollowerError, FollowerResult};
use crate::pipeline::{DisplaySink, FrameSource, OperatorInput, Overlay};
use crate::types::{CameraConfig, Frame};
use opencv::{
    core::{self, Mat},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::time::Instant;
use tracing::{info, warn};

const IMAGE_WINDOW: &str = "Image";
const EDGES_WINDOW: &str = "Contours";

pub struct OpenCvCamera {
    cap: VideoCapture,
    width: i32,
    height: i32,
    opened_at: Instant,
    released: bool,
}

impl OpenCvCamera {
    /// Open the device and size its frames to `rescale_percent` of the
    /// native resolution, which must equal the declared frame size.
    pub fn open(config: &CameraConfig) -> FollowerResult<Self> {
        let cap = VideoCapture::new(config.device_index, videoio::CAP_ANY)?;
        if !cap.is_opened()? {
            return Err(FollowerError::Camera(format!(
                "camera {} failed to open",
                config.device_index
            )));
        }

        let native_w = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let native_h = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let width = (native_w * config.rescale_percent / 100) as i32;
        let height = (native_h * config.rescale_percent / 100) as i32;

        if width as usize != config.frame_width || height as usize != config.frame_height {
            return Err(FollowerError::FrameDimensions {
                expected_width: config.frame_width,
                expected_height: config.frame_height,
                actual_width: width as usize,
                actual_height: height as usize,
                actual_len: (width * height * 3) as usize,
            });
        }

        info!("📷 Camera {} opened", config.device_index);
        info!(
            "   native {}x{}, rescaled {}% to {}x{}",
            native_w, native_h, config.rescale_percent, width, height
        );

        Ok(Self {
            cap,
            width,
            height,
            opened_at: Instant::now(),
            released: false,
        })
    }
}

impl FrameSource for OpenCvCamera {
    fn read_frame(&mut self) -> FollowerResult<Option<Frame>> {
        if self.released {
            return Ok(None);
        }

        let mut raw = Mat::default();
        if !self.cap.read(&mut raw)? || raw.empty() {
            return Ok(None);
        }

        let mut scaled = Mat::default();
        imgproc::resize(
            &raw,
            &mut scaled,
            core::Size::new(self.width, self.height),
            0.0,
            0.0,
            imgproc::INTER_AREA,
        )?;

        let mut rgb = Mat::default();
        imgproc::cvt_color(&scaled, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
        let data = rgb.data_bytes()?.to_vec();

        Ok(Some(Frame::new(
            data,
            self.width as usize,
            self.height as usize,
            self.opened_at.elapsed().as_secs_f64() * 1000.0,
        )))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.cap.release() {
            warn!("Camera release failed: {}", e);
        }
        info!("📷 Camera released");
    }
}

/// HighGUI windows for the annotated frame and the edge mask.
pub struct HighGuiDisplay {
    show_edges: bool,
    open: bool,
}

impl HighGuiDisplay {
    pub fn new(show_edges: bool) -> Self {
        Self {
            show_edges,
            open: false,
        }
    }
}

fn scalar(rgb: [u8; 3]) -> core::Scalar {
    core::Scalar::new(rgb[2] as f64, rgb[1] as f64, rgb[0] as f64, 0.0)
}

fn point(p: crate::detection::Point) -> core::Point {
    core::Point::new(p.x, p.y)
}

/// Convert the RGB frame to BGR and draw the overlay on it.
fn annotate(frame: &Frame, overlay: &Overlay) -> FollowerResult<Mat> {
    let mat = Mat::from_slice(&frame.data)?;
    let mat = mat.reshape(3, frame.height as i32)?;

    let mut output = Mat::default();
    imgproc::cvt_color(&mat, &mut output, imgproc::COLOR_RGB2BGR, 0)?;

    for segment in &overlay.segments {
        let color = scalar(segment.color);
        imgproc::line(
            &mut output,
            point(segment.from),
            point(segment.to),
            color,
            1,
            imgproc::LINE_8,
            0,
        )?;
        if let Some(label) = &segment.label {
            imgproc::put_text(
                &mut output,
                label,
                core::Point::new(segment.to.x, segment.to.y - 2),
                imgproc::FONT_HERSHEY_COMPLEX_SMALL,
                0.4,
                color,
                1,
                imgproc::LINE_8,
                false,
            )?;
        }
    }

    for text in &overlay.texts {
        imgproc::put_text(
            &mut output,
            &text.text,
            point(text.origin),
            imgproc::FONT_HERSHEY_COMPLEX_SMALL,
            0.4,
            scalar(text.color),
            1,
            imgproc::LINE_8,
            false,
        )?;
    }

    Ok(output)
}

impl DisplaySink for HighGuiDisplay {
    fn present(
        &mut self,
        frame: &Frame,
        edges: &EdgeMask,
        overlay: &Overlay,
    ) -> FollowerResult<OperatorInput> {
        self.open = true;

        let annotated = annotate(frame, overlay)?;
        highgui::imshow(IMAGE_WINDOW, &annotated)?;

        if self.show_edges {
            let mask = Mat::from_slice(edges.as_bytes())?;
            let mask = mask.reshape(1, edges.height() as i32)?;
            highgui::imshow(EDGES_WINDOW, &mask)?;
        }

        let input = match highgui::wait_key(1)? {
            k if k == 'q' as i32 => OperatorInput::Quit,
            k if k == 'p' as i32 => OperatorInput::ToggleBridge,
            k if k == 'd' as i32 => OperatorInput::ToggleSide,
            _ => OperatorInput::None,
        };
        Ok(input)
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = highgui::destroy_all_windows() {
            warn!("Could not close display windows: {}", e);
        }
    }
}
