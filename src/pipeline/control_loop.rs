// src/pipeline/control_loop.rs
//
// One synchronous control thread:
//
//   read frame → rotate → edges → scan (+history) → deviation
//             → command for drive mode → send + ack read → display
//
// Every cycle ends in an explicit `CycleOutcome`; only camera failure and
// configuration problems surface as errors. Shutdown (neutral command,
// transport close, camera release) runs on every exit path.

use super::metrics::CycleMetrics;
use super::overlay::Overlay;
use crate::detection::{
    compute_deviation, DetectionResult, EdgeExtractor, EdgeMask, LaneScanner, ScanHistory,
    TrackState,
};
use crate::error::FollowerResult;
use crate::motor::{AckStatus, MotorCommand, MotorController, SerialTransport};
use crate::preprocessing::RotationCorrection;
use crate::types::{Config, ControlConfig, FallbackPolicy, Frame};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Yields camera frames; `Ok(None)` means the source is exhausted.
pub trait FrameSource {
    fn read_frame(&mut self) -> FollowerResult<Option<Frame>>;

    fn release(&mut self) {}
}

impl<F: FrameSource + ?Sized> FrameSource for Box<F> {
    fn read_frame(&mut self) -> FollowerResult<Option<Frame>> {
        (**self).read_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Shows each cycle's frame and reports operator key input.
pub trait DisplaySink {
    fn present(
        &mut self,
        frame: &Frame,
        edges: &EdgeMask,
        overlay: &Overlay,
    ) -> FollowerResult<OperatorInput>;

    fn close(&mut self) {}
}

impl<D: DisplaySink + ?Sized> DisplaySink for Box<D> {
    fn present(
        &mut self,
        frame: &Frame,
        edges: &EdgeMask,
        overlay: &Overlay,
    ) -> FollowerResult<OperatorInput> {
        (**self).present(frame, edges, overlay)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorInput {
    None,
    Quit,
    ToggleBridge,
    ToggleSide,
}

/// Speed regime chosen by the operator for the current track segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    Normal,
    /// Narrow bridge: drive straight at bridge speed
    Bridge,
    /// Widened side segment: steer at side speed
    Side,
}

impl DriveMode {
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            DriveMode::Normal => None,
            DriveMode::Bridge => Some("BRIDGE"),
            DriveMode::Side => Some("SIDE"),
        }
    }
}

/// Shared cancellation signal, polled once per cycle.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    Tracked,
    /// Track edge unchanged since the last detection; theta forced
    TurnOverride,
    /// No complete boundary set in this frame
    NoTrack,
    /// Boundaries found but no usable angle
    DegenerateGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkReport {
    Ack(AckStatus),
    /// Transport I/O failed; the next cycle tries again
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub frame_index: u64,
    pub status: TrackStatus,
    pub detection: Option<DetectionResult>,
    pub state: TrackState,
    pub command: MotorCommand,
    pub link: LinkReport,
    pub mode: DriveMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    OperatorQuit,
    CameraExhausted,
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Continue(CycleReport),
    Stop(StopReason),
}

pub struct ControlLoop<S: FrameSource, D: DisplaySink, T: SerialTransport> {
    source: S,
    display: D,
    motor: MotorController<T>,
    correction: RotationCorrection,
    extractor: EdgeExtractor,
    scanner: LaneScanner,
    scan_rows: (usize, usize),
    control: ControlConfig,
    draw_scan_rows: bool,
    history: ScanHistory,
    mode: DriveMode,
    last_good: TrackState,
    quit_requested: bool,
    cancel: CancelFlag,
    metrics: CycleMetrics,
    frame_index: u64,
    last_frame_at: Option<Instant>,
    shut_down: bool,
}

impl<S: FrameSource, D: DisplaySink, T: SerialTransport> ControlLoop<S, D, T> {
    /// Validate the configuration and open the motor link.
    pub fn new(
        config: &Config,
        mut source: S,
        display: D,
        transport: T,
        cancel: CancelFlag,
    ) -> FollowerResult<Self> {
        if let Err(e) = config.validate() {
            source.release();
            return Err(e);
        }

        let (w, h) = (config.camera.frame_width, config.camera.frame_height);
        let mut motor = MotorController::new(transport, &config.serial);
        if let Err(e) = motor.start_com() {
            source.release();
            return Err(e);
        }

        let scan_rows = config.scan_rows();
        info!(
            "Control loop ready: {}x{} frames, scan rows {}/{}, fallback {:?}",
            w, h, scan_rows.0, scan_rows.1, config.control.fallback
        );

        Ok(Self {
            source,
            display,
            motor,
            correction: RotationCorrection::new(
                w,
                h,
                config.camera.rotation_deg,
                config.camera.border_fill,
            ),
            extractor: EdgeExtractor::new(w, h, &config.vision),
            scanner: LaneScanner::new(&config.vision),
            scan_rows,
            control: config.control.clone(),
            draw_scan_rows: config.display.draw_scan_rows,
            history: ScanHistory::empty(),
            mode: DriveMode::Normal,
            last_good: TrackState::straight(),
            quit_requested: false,
            cancel,
            metrics: CycleMetrics::new(),
            frame_index: 0,
            last_frame_at: None,
            shut_down: false,
        })
    }

    pub fn metrics(&self) -> &CycleMetrics {
        &self.metrics
    }

    pub fn motor(&self) -> &MotorController<T> {
        &self.motor
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    /// Drive cycles until a stop condition or a fatal error, then shut down.
    pub fn run(&mut self) -> FollowerResult<StopReason> {
        info!("🚦 Lane following started");

        let result = loop {
            match self.run_cycle() {
                Ok(CycleOutcome::Continue(report)) => {
                    debug!(
                        "Cycle {}: {:?} θ={} ε={} u={:.2}",
                        report.frame_index,
                        report.status,
                        report.state.theta,
                        report.state.epsilon,
                        report.command.u
                    );
                }
                Ok(CycleOutcome::Stop(reason)) => break Ok(reason),
                Err(e) => break Err(e),
            }
        };

        match &result {
            Ok(reason) => info!("🛑 Stopping: {:?}", reason),
            Err(e) => warn!("🛑 Stopping on fatal error: {}", e),
        }
        self.shutdown();
        result
    }

    pub fn run_cycle(&mut self) -> FollowerResult<CycleOutcome> {
        if self.cancel.is_cancelled() {
            return Ok(CycleOutcome::Stop(StopReason::Cancelled));
        }
        if self.quit_requested {
            return Ok(CycleOutcome::Stop(StopReason::OperatorQuit));
        }

        let Some(frame) = self.source.read_frame()? else {
            return Ok(CycleOutcome::Stop(StopReason::CameraExhausted));
        };
        self.frame_index += 1;
        self.metrics.inc(&self.metrics.total_cycles);
        let fps = self.instant_fps();

        let vision_start = Instant::now();
        let corrected = self.correction.apply(&frame)?;
        let mut edges = self.extractor.extract(&corrected)?;
        let (near, far) = self.scan_rows;
        let outcome = self.scanner.scan(&edges, near, far, self.history)?;
        self.history = outcome.history;
        let (status, state) = self.steer(outcome.detection.as_ref());
        self.metrics.set_timing(
            &self.metrics.vision_time_us,
            vision_start.elapsed().as_micros() as u64,
        );

        let command = self.command_for(state);
        let link = self.transmit(&command);

        let overlay = Overlay::for_cycle(outcome.detection.as_ref(), state, fps, self.mode);
        if self.draw_scan_rows {
            edges.mark_row(near);
            edges.mark_row(far);
        }
        let mode = self.mode;
        match self.display.present(&corrected, &edges, &overlay) {
            Ok(input) => self.apply_input(input),
            Err(e) => warn!("Display failed: {}", e),
        }

        Ok(CycleOutcome::Continue(CycleReport {
            frame_index: self.frame_index,
            status,
            detection: outcome.detection,
            state,
            command,
            link,
            mode,
        }))
    }

    /// Neutral stop, link close, camera release, display close. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        if let Err(e) = self.motor.end_com() {
            warn!("Motor shutdown failed: {}", e);
        }
        self.source.release();
        self.display.close();

        let summary = self.metrics.summary();
        info!(
            "Ran {} cycles ({:.1} FPS), {:.0}% tracked, {} ack warnings",
            summary.total_cycles,
            summary.fps,
            summary.tracking_ratio() * 100.0,
            summary.ack_warnings
        );
        match serde_json::to_string(&summary) {
            Ok(json) => info!("📊 {}", json),
            Err(e) => warn!("Could not serialize metrics: {}", e),
        }
    }

    fn steer(&mut self, detection: Option<&DetectionResult>) -> (TrackStatus, TrackState) {
        let Some(det) = detection else {
            self.metrics.inc(&self.metrics.no_track_cycles);
            return (TrackStatus::NoTrack, self.fallback());
        };

        let Some(raw) = compute_deviation(&det.inner_line, &det.outer_line) else {
            self.metrics.inc(&self.metrics.degenerate_cycles);
            return (TrackStatus::DegenerateGeometry, self.fallback());
        };

        let mut state = TrackState::new(raw.theta, raw.epsilon - self.control.epsilon_bias);
        // Held values are the measured heading, never the forced turn
        self.last_good = state;
        let status = if det.turn_right {
            state.theta = self.control.turn_theta;
            self.metrics.inc(&self.metrics.turn_overrides);
            TrackStatus::TurnOverride
        } else {
            self.metrics.inc(&self.metrics.tracked_cycles);
            TrackStatus::Tracked
        };

        (status, state)
    }

    fn fallback(&self) -> TrackState {
        match self.control.fallback {
            FallbackPolicy::Zero => TrackState::straight(),
            FallbackPolicy::HoldLast => self.last_good,
        }
    }

    fn command_for(&self, state: TrackState) -> MotorCommand {
        let speeds = &self.control.speeds;
        match self.mode {
            DriveMode::Normal => MotorCommand::new(state.theta, state.epsilon, speeds.normal),
            DriveMode::Bridge => MotorCommand::new(0, 0, speeds.bridge),
            DriveMode::Side => MotorCommand::new(state.theta, state.epsilon, speeds.side),
        }
    }

    fn transmit(&mut self, command: &MotorCommand) -> LinkReport {
        self.metrics.inc(&self.metrics.commands_sent);
        match self.motor.send_command(command) {
            Ok(ack) => {
                if !ack.is_acknowledged() {
                    self.metrics.inc(&self.metrics.ack_warnings);
                }
                LinkReport::Ack(ack)
            }
            Err(e) => {
                warn!("Command not delivered: {}", e);
                self.metrics.inc(&self.metrics.transport_errors);
                LinkReport::Failed(e.to_string())
            }
        }
    }

    fn apply_input(&mut self, input: OperatorInput) {
        let next = match input {
            OperatorInput::None => return,
            OperatorInput::Quit => {
                self.quit_requested = true;
                return;
            }
            OperatorInput::ToggleBridge if self.mode == DriveMode::Bridge => DriveMode::Normal,
            OperatorInput::ToggleBridge => DriveMode::Bridge,
            OperatorInput::ToggleSide if self.mode == DriveMode::Side => DriveMode::Normal,
            OperatorInput::ToggleSide => DriveMode::Side,
        };
        info!("Drive mode {:?} → {:?}", self.mode, next);
        self.mode = next;
    }

    fn instant_fps(&mut self) -> u32 {
        let now = Instant::now();
        let fps = match self.last_frame_at {
            Some(prev) => {
                let dt = now.duration_since(prev).as_secs_f64();
                if dt > 0.0 {
                    (1.0 / dt) as u32
                } else {
                    0
                }
            }
            None => 0,
        };
        self.last_frame_at = Some(now);
        fps
    }
}

impl<S: FrameSource, D: DisplaySink, T: SerialTransport> Drop for ControlLoop<S, D, T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FollowerError;
    use crate::motor::mock::{MockTransport, Reply};
    use std::collections::VecDeque;

    const W: usize = 120;
    const H: usize = 60;
    const BRIGHT: [u8; 3] = [210, 210, 210];
    const DARK: [u8; 3] = [15, 15, 15];

    struct ScriptedSource {
        frames: VecDeque<Frame>,
        released: bool,
    }

    impl ScriptedSource {
        fn new(frames: Vec<Frame>) -> Self {
            Self {
                frames: frames.into(),
                released: false,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn read_frame(&mut self) -> FollowerResult<Option<Frame>> {
            Ok(self.frames.pop_front())
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    #[derive(Default)]
    struct ScriptedDisplay {
        inputs: VecDeque<OperatorInput>,
        presented: usize,
        closed: bool,
    }

    impl DisplaySink for ScriptedDisplay {
        fn present(
            &mut self,
            _frame: &Frame,
            _edges: &EdgeMask,
            _overlay: &Overlay,
        ) -> FollowerResult<OperatorInput> {
            self.presented += 1;
            Ok(self.inputs.pop_front().unwrap_or(OperatorInput::None))
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.camera.frame_width = W;
        config.camera.frame_height = H;
        config.camera.rotation_deg = 0.0;
        config.serial.stop_settle_ms = 0;
        config
    }

    /// Straight track: a painted line (columns 20..40) and the body shadow
    /// (columns 70..100), both vertical.
    fn straight_track() -> Frame {
        let mut frame = Frame::filled(W, H, BRIGHT);
        for y in 0..H {
            for x in (20..40).chain(70..100) {
                frame.set_pixel(x, y, DARK);
            }
        }
        frame
    }

    fn empty_floor() -> Frame {
        Frame::filled(W, H, BRIGHT)
    }

    fn control_loop(
        config: &Config,
        frames: Vec<Frame>,
        inputs: Vec<OperatorInput>,
        transport: MockTransport,
    ) -> ControlLoop<ScriptedSource, ScriptedDisplay, MockTransport> {
        let display = ScriptedDisplay {
            inputs: inputs.into(),
            ..Default::default()
        };
        ControlLoop::new(
            config,
            ScriptedSource::new(frames),
            display,
            transport,
            CancelFlag::new(),
        )
        .unwrap()
    }

    fn expect_report(outcome: CycleOutcome) -> CycleReport {
        match outcome {
            CycleOutcome::Continue(report) => report,
            CycleOutcome::Stop(reason) => panic!("unexpected stop: {:?}", reason),
        }
    }

    #[test]
    fn test_straight_track_yields_zero_theta_and_biased_epsilon() {
        let config = config();
        let mut ctl = control_loop(&config, vec![straight_track()], vec![], MockTransport::echoing());

        let report = expect_report(ctl.run_cycle().unwrap());
        let det = report.detection.expect("straight track should be detected");

        assert_eq!(report.status, TrackStatus::Tracked);
        assert_eq!(report.state.theta, 0);
        let gap = det.inner_line.near.x - det.outer_line.near.x;
        assert_eq!(report.state.epsilon, gap - config.control.epsilon_bias);
        assert!(det.inner_line.near.x > det.outer_line.near.x);
        assert!(det.track_edge.near.x > det.inner_line.near.x);
        assert_eq!(report.link, LinkReport::Ack(AckStatus::Acknowledged));
        assert_eq!(report.command.u, config.control.speeds.normal);
    }

    #[test]
    fn test_unmoved_track_edge_forces_turn() {
        let config = config();
        let frames = vec![straight_track(), straight_track()];
        let mut ctl = control_loop(&config, frames, vec![], MockTransport::echoing());

        let first = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(first.status, TrackStatus::Tracked);

        let second = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(second.status, TrackStatus::TurnOverride);
        assert_eq!(second.state.theta, config.control.turn_theta);
        assert_eq!(second.command.theta, 100);
    }

    #[test]
    fn test_lost_track_falls_back_to_zero_and_clears_history() {
        let config = config();
        let frames = vec![straight_track(), empty_floor()];
        let mut ctl = control_loop(&config, frames, vec![], MockTransport::echoing());

        expect_report(ctl.run_cycle().unwrap());
        assert!(!ctl.history().is_empty());

        let report = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(report.status, TrackStatus::NoTrack);
        assert_eq!(report.state, TrackState::straight());
        assert!(ctl.history().is_empty());
    }

    #[test]
    fn test_hold_last_policy_repeats_last_good_state() {
        let mut config = config();
        config.control.fallback = FallbackPolicy::HoldLast;
        let frames = vec![straight_track(), empty_floor()];
        let mut ctl = control_loop(&config, frames, vec![], MockTransport::echoing());

        let good = expect_report(ctl.run_cycle().unwrap());
        let lost = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(lost.status, TrackStatus::NoTrack);
        assert_eq!(lost.state, good.state);
    }

    #[test]
    fn test_hold_last_keeps_measured_heading_after_turn() {
        let mut config = config();
        config.control.fallback = FallbackPolicy::HoldLast;
        let frames = vec![straight_track(), straight_track(), empty_floor()];
        let mut ctl = control_loop(&config, frames, vec![], MockTransport::echoing());

        let measured = expect_report(ctl.run_cycle().unwrap());
        let turn = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(turn.status, TrackStatus::TurnOverride);

        let lost = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(lost.status, TrackStatus::NoTrack);
        assert_eq!(lost.state, measured.state);
        assert_ne!(lost.state.theta, config.control.turn_theta);
    }

    #[test]
    fn test_bridge_mode_drives_straight() {
        let config = config();
        let frames = vec![straight_track(), straight_track()];
        let mut ctl = control_loop(
            &config,
            frames,
            vec![OperatorInput::ToggleBridge],
            MockTransport::echoing(),
        );

        expect_report(ctl.run_cycle().unwrap());
        assert_eq!(ctl.mode(), DriveMode::Bridge);

        let report = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(report.command, MotorCommand::new(0, 0, config.control.speeds.bridge));
    }

    #[test]
    fn test_side_mode_uses_side_speed_and_toggles_back() {
        let config = config();
        let frames = vec![straight_track(), straight_track(), straight_track()];
        let inputs = vec![OperatorInput::ToggleSide, OperatorInput::ToggleSide];
        let mut ctl = control_loop(&config, frames, inputs, MockTransport::echoing());

        expect_report(ctl.run_cycle().unwrap());
        let side = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(side.mode, DriveMode::Side);
        assert_eq!(side.command.u, config.control.speeds.side);
        assert_eq!(ctl.mode(), DriveMode::Normal);
    }

    #[test]
    fn test_bad_ack_does_not_stop_the_loop() {
        let config = config();
        let transport = MockTransport::with_replies([Reply::Silence, Reply::Echo]);
        let frames = vec![straight_track(), straight_track()];
        let mut ctl = control_loop(&config, frames, vec![], transport);

        let first = expect_report(ctl.run_cycle().unwrap());
        assert!(matches!(first.link, LinkReport::Ack(AckStatus::TimedOut { .. })));
        let second = expect_report(ctl.run_cycle().unwrap());
        assert_eq!(second.link, LinkReport::Ack(AckStatus::Acknowledged));
        assert_eq!(ctl.metrics().summary().ack_warnings, 1);
    }

    #[test]
    fn test_camera_exhaustion_stops_and_sends_neutral() {
        let config = config();
        let mut ctl = control_loop(&config, vec![straight_track()], vec![], MockTransport::echoing());

        let reason = ctl.run().unwrap();
        assert_eq!(reason, StopReason::CameraExhausted);
        assert!(!ctl.motor().is_open());

        let frames = ctl.motor().transport().written_frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], "T+00E+00U+00UniRAIL");
        assert!(ctl.source.released);
        assert!(ctl.display.closed);
    }

    #[test]
    fn test_cancellation_is_polled_before_reading() {
        let config = config();
        let cancel = CancelFlag::new();
        let mut ctl = ControlLoop::new(
            &config,
            ScriptedSource::new(vec![straight_track()]),
            ScriptedDisplay::default(),
            MockTransport::echoing(),
            cancel.clone(),
        )
        .unwrap();

        cancel.cancel();
        assert_eq!(ctl.run().unwrap(), StopReason::Cancelled);
        assert_eq!(ctl.source.frames.len(), 1);
        assert_eq!(ctl.display.presented, 0);
        // Only the neutral stop went out
        assert_eq!(
            ctl.motor().transport().written_frames(),
            vec!["T+00E+00U+00UniRAIL"]
        );
    }

    #[test]
    fn test_operator_quit_stops_next_cycle() {
        let config = config();
        let frames = vec![straight_track(), straight_track()];
        let mut ctl = control_loop(&config, frames, vec![OperatorInput::Quit], MockTransport::echoing());

        assert_eq!(ctl.run().unwrap(), StopReason::OperatorQuit);
        assert_eq!(ctl.display.presented, 1);
    }

    #[test]
    fn test_wrong_frame_size_is_fatal_and_still_stops_motor() {
        let config = config();
        let frames = vec![Frame::filled(W / 2, H, BRIGHT)];
        let mut ctl = control_loop(&config, frames, vec![], MockTransport::echoing());

        assert!(ctl.run().is_err());
        assert!(!ctl.motor().is_open());
        assert_eq!(
            ctl.motor().transport().written_frames(),
            vec!["T+00E+00U+00UniRAIL"]
        );
    }

    #[test]
    fn test_short_frame_buffer_is_fatal_before_rotation() {
        let mut config = config();
        config.camera.rotation_deg = -123.0;
        let frames = vec![Frame {
            data: vec![0; 30],
            width: W,
            height: H,
            timestamp_ms: 0.0,
        }];
        let mut ctl = control_loop(&config, frames, vec![], MockTransport::echoing());

        assert!(matches!(
            ctl.run(),
            Err(FollowerError::FrameDimensions { actual_len: 30, .. })
        ));
        assert_eq!(ctl.display.presented, 0);
        assert!(!ctl.motor().is_open());
        assert_eq!(
            ctl.motor().transport().written_frames(),
            vec!["T+00E+00U+00UniRAIL"]
        );
    }

    #[test]
    fn test_open_failure_is_reported() {
        let config = config();
        let mut transport = MockTransport::echoing();
        transport.fail_open = true;
        let result = ControlLoop::new(
            &config,
            ScriptedSource::new(vec![]),
            ScriptedDisplay::default(),
            transport,
            CancelFlag::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let config = config();
        let mut ctl = control_loop(&config, vec![], vec![], MockTransport::echoing());
        ctl.shutdown();
        ctl.shutdown();
        assert_eq!(ctl.motor().transport().close_count, 1);
    }
}
