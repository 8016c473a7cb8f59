// src/main.rs

use anyhow::{Context, Result};
use lane_follower::motor::{SerialPortTransport, SerialSettings};
use lane_follower::pipeline::{CancelFlag, ControlLoop, DisplaySink, FrameSource, StopReason};
use lane_follower::video_processor::{NullDisplay, ReplaySource};
use lane_follower::Config;
use std::path::Path;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "LANE_FOLLOWER_CONFIG";
const DEFAULT_CONFIG: &str = "config.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let config_found = Path::new(&config_path).exists();
    let config = if config_found {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lane_follower={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚗 Lane follower starting");
    if config_found {
        info!("✓ Configuration loaded from {}", config_path);
    } else {
        warn!("{} not found, using built-in defaults", config_path);
    }

    config.validate().context("configuration rejected")?;
    let (near, far) = config.scan_rows();
    info!(
        "Vision: threshold={}, kernel={}, scan rows {}/{}, rotation {:.1}°",
        config.vision.threshold, config.vision.kernel_size, near, far, config.camera.rotation_deg
    );

    let cancel = CancelFlag::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current cycle");
                on_signal.cancel();
            }
            Err(e) => error!("Could not listen for Ctrl-C: {}", e),
        }
    });

    let reason = tokio::task::spawn_blocking(move || drive(&config, cancel))
        .await
        .context("control thread panicked")??;

    info!("✓ Lane follower stopped ({:?})", reason);
    Ok(())
}

/// Build the collaborators and run the control loop on the current thread.
fn drive(config: &Config, cancel: CancelFlag) -> Result<StopReason> {
    let source = open_source(config)?;
    let display = open_display(config);
    let transport = SerialPortTransport::new(SerialSettings::from(&config.serial));

    let mut control = ControlLoop::new(config, source, display, transport, cancel)
        .context("starting control loop")?;
    let reason = control.run()?;
    Ok(reason)
}

fn open_source(config: &Config) -> Result<Box<dyn FrameSource>> {
    if let Some(dir) = &config.camera.replay_dir {
        return Ok(Box::new(ReplaySource::open(dir)?));
    }

    #[cfg(feature = "camera")]
    {
        let camera = lane_follower::camera::OpenCvCamera::open(&config.camera)
            .context("opening camera")?;
        Ok(Box::new(camera))
    }

    #[cfg(not(feature = "camera"))]
    {
        anyhow::bail!("built without the `camera` feature; set camera.replay_dir to replay recorded frames")
    }
}

fn open_display(config: &Config) -> Box<dyn DisplaySink> {
    #[cfg(feature = "camera")]
    if config.display.enabled {
        return Box::new(lane_follower::camera::HighGuiDisplay::new(
            config.display.show_edges,
        ));
    }

    if config.display.enabled {
        info!("Display requested but built without the `camera` feature; running headless");
    }
    Box::new(NullDisplay::new())
}
