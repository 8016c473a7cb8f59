use crate::error::FollowerError;
use crate::types::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Near and far scan rows for the declared frame height, near first.
    pub fn scan_rows(&self) -> (usize, usize) {
        let h = self.camera.frame_height;
        let near = (h as f32 * self.vision.near_row_ratio) as usize;
        let far = (h as f32 * self.vision.far_row_ratio) as usize;
        (near.max(far), near.min(far))
    }

    pub fn validate(&self) -> Result<(), FollowerError> {
        let invalid = |msg: String| Err(FollowerError::InvalidConfig(msg));

        if self.camera.frame_width == 0 || self.camera.frame_height == 0 {
            return invalid("camera frame size must be non-zero".to_string());
        }
        if self.camera.rescale_percent == 0 || self.camera.rescale_percent > 100 {
            return invalid(format!(
                "camera.rescale_percent must be in 1..=100, got {}",
                self.camera.rescale_percent
            ));
        }
        if self.vision.kernel_size == 0 || self.vision.kernel_size % 2 == 0 {
            return invalid(format!(
                "vision.kernel_size must be odd, got {}",
                self.vision.kernel_size
            ));
        }
        if self.vision.canny_low > self.vision.canny_high {
            return invalid("vision.canny_low must not exceed canny_high".to_string());
        }
        for (name, ratio) in [
            ("near_row_ratio", self.vision.near_row_ratio),
            ("far_row_ratio", self.vision.far_row_ratio),
        ] {
            if !(0.0..1.0).contains(&ratio) {
                return invalid(format!("vision.{} must be in [0, 1), got {}", name, ratio));
            }
        }
        let (near, far) = self.scan_rows();
        if near == far {
            return invalid(format!("scan rows collapse onto row {}", near));
        }
        if self.vision.turn_tolerance_px < 0 {
            return invalid("vision.turn_tolerance_px must be non-negative".to_string());
        }
        let speeds = &self.control.speeds;
        for (name, u) in [
            ("normal", speeds.normal),
            ("bridge", speeds.bridge),
            ("side", speeds.side),
        ] {
            if !(-1.0..=1.0).contains(&u) {
                return invalid(format!("control.speeds.{} must be in [-1, 1], got {}", name, u));
            }
        }
        if self.serial.baud_rate == 0 {
            return invalid("serial.baud_rate must be non-zero".to_string());
        }
        if self.serial.end_marker.is_empty() || !self.serial.end_marker.is_ascii() {
            return invalid("serial.end_marker must be non-empty ASCII".to_string());
        }
        if self.serial.device().is_empty() {
            return invalid("serial device path is empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FallbackPolicy;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.serial.device(), "/dev/serial0");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.vision.threshold, 70);
        assert_eq!(config.control.epsilon_bias, 60);
    }

    #[test]
    fn test_scan_rows_near_first() {
        let config = Config::default();
        let (near, far) = config.scan_rows();
        assert_eq!(near, 244); // 288 * 0.85
        assert_eq!(far, 201); // 288 * 0.70
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "serial:\n  port_index: 2\ncontrol:\n  fallback: hold_last\n  epsilon_bias: 45\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.serial.device(), "/dev/serial2");
        assert_eq!(config.control.fallback, FallbackPolicy::HoldLast);
        assert_eq!(config.control.epsilon_bias, 45);
        // Untouched sections keep their defaults
        assert_eq!(config.vision.kernel_size, 7);
        assert_eq!(config.serial.end_marker, "UniRAIL");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/lane_follower.yaml").is_err());
    }

    #[test]
    fn test_validate_rejects_even_kernel() {
        let mut config = Config::default();
        config.vision.kernel_size = 6;
        assert!(matches!(
            config.validate(),
            Err(FollowerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_speed() {
        let mut config = Config::default();
        config.control.speeds.side = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_device_path_wins() {
        let mut config = Config::default();
        config.serial.device_path = Some("/dev/ttyUSB0".to_string());
        assert_eq!(config.serial.device(), "/dev/ttyUSB0");
    }
}
