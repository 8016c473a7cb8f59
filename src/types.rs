use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub serial: SerialConfig,
    pub vision: VisionConfig,
    pub control: ControlConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub device_index: i32,
    /// Percentage of the native capture resolution requested from the camera
    pub rescale_percent: u32,
    /// Declared frame size for the session; every frame must match it
    pub frame_width: usize,
    pub frame_height: usize,
    /// Rotation applied about the frame center before edge extraction (degrees,
    /// OpenCV convention: positive is counter-clockwise)
    pub rotation_deg: f64,
    /// RGB fill for pixels rotated in from outside the frame
    pub border_fill: [u8; 3],
    /// Read frames from a directory of images instead of a live camera
    pub replay_dir: Option<String>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            rescale_percent: 60,
            frame_width: 384,
            frame_height: 288,
            rotation_deg: -123.0,
            border_fill: [255, 255, 255],
            replay_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port_index: u32,
    pub device_prefix: String,
    /// Full device path; takes precedence over prefix + index
    pub device_path: Option<String>,
    pub baud_rate: u32,
    pub timeout_ms: u64,
    /// Pause after the neutral command before the port is closed
    pub stop_settle_ms: u64,
    pub end_marker: String,
}

impl SerialConfig {
    pub fn device(&self) -> String {
        match &self.device_path {
            Some(path) => path.clone(),
            None => format!("{}{}", self.device_prefix, self.port_index),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_index: 0,
            device_prefix: "/dev/serial".to_string(),
            device_path: None,
            baud_rate: 115_200,
            timeout_ms: 1000,
            stop_settle_ms: 100,
            end_marker: "UniRAIL".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Intensities at or below this become foreground (the track is dark)
    pub threshold: u8,
    /// Side of the square structuring element used for the opening
    pub kernel_size: usize,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Scan rows as fractions of the frame height
    pub near_row_ratio: f32,
    pub far_row_ratio: f32,
    /// Columns skipped after the track edge before looking for the inner line
    pub inner_skip: usize,
    /// Columns skipped after the inner line before looking for the outer line
    pub outer_skip: usize,
    pub turn_tolerance_px: i32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            threshold: 70,
            kernel_size: 7,
            canny_low: 0.0,
            canny_high: 1.0,
            near_row_ratio: 0.85,
            far_row_ratio: 0.70,
            inner_skip: 3,
            outer_skip: 1,
            turn_tolerance_px: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Send theta = 0, epsilon = 0 when no deviation is available
    Zero,
    /// Re-send the last successfully computed deviation
    HoldLast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub normal: f32,
    pub bridge: f32,
    pub side: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            normal: 0.10,
            bridge: 0.10,
            side: 0.20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Camera mounting bias subtracted from every measured epsilon
    pub epsilon_bias: i32,
    /// Heading forced when the turn heuristic fires
    pub turn_theta: i32,
    pub fallback: FallbackPolicy,
    pub speeds: SpeedConfig,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            epsilon_bias: 60,
            turn_theta: 100,
            fallback: FallbackPolicy::Zero,
            speeds: SpeedConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub enabled: bool,
    pub show_edges: bool,
    pub draw_scan_rows: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_edges: true,
            draw_scan_rows: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// One RGB8 camera frame, row-major.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub timestamp_ms: f64,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: usize, height: usize, timestamp_ms: f64) -> Self {
        debug_assert_eq!(data.len(), width * height * 3);
        Self {
            data,
            width,
            height,
            timestamp_ms,
        }
    }

    /// A frame filled with a single color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self::new(data, width, height, 0.0)
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let idx = (y * self.width + x) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    pub fn has_consistent_buffer(&self) -> bool {
        self.data.len() == self.width * self.height * 3
    }
}
