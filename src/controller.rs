use anyhow::Result;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::gesture::pinch::tip_distance;
use crate::gesture::{ActiveRegion, ClickEvent, CoordinateMapper, Mode, PinchDetector, ScrollController, Smoother};
use crate::hand::{HandLandmark, LandmarkProvider, LandmarkSet};
use crate::lifecycle::StopSignal;
use crate::pointer::PointerSink;

#[derive(Debug, Error)]
pub enum LoopError {
    /// Nothing was started; no loop state exists.
    #[error("failed to start the gesture loop")]
    Startup(#[source] anyhow::Error),
    #[error("camera capture failed {failures} times in a row")]
    CaptureLost { failures: u32 },
}

/// What the controller did with one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_id: u64,
    pub mode: Mode,
    /// Smoothed cursor position sent this frame (cursor mode only)
    pub cursor: Option<(f32, f32)>,
    pub click: Option<ClickEvent>,
    pub scroll: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub frames_without_hand: u64,
    pub capture_failures: u64,
    pub clicks: u64,
    pub scroll_events: u64,
}

/// Per-frame gesture pipeline and the state it carries between frames.
///
/// Owns the cursor and click state; nothing here is shared with other threads.
pub struct LoopController {
    frame_w: u32,
    frame_h: u32,
    mapper: CoordinateMapper,
    smoother: Smoother,
    pinch: PinchDetector,
    scroll: ScrollController,
    max_capture_failures: u32,
    min_frame_interval: std::time::Duration,
    next_frame_id: u64,
    last_mode: Mode,
    summary: RunSummary,
}

impl LoopController {
    pub fn new(config: &Config, frame_size: (u32, u32), screen_size: (u32, u32)) -> Result<Self> {
        let (frame_w, frame_h) = frame_size;
        let region = ActiveRegion::inset(frame_w, frame_h, config.region.margin)?;
        Ok(Self {
            frame_w,
            frame_h,
            mapper: CoordinateMapper::new(region, screen_size.0, screen_size.1),
            smoother: Smoother::from_config(&config.smooth),
            pinch: PinchDetector::from_config(&config.click),
            scroll: ScrollController::from_config(&config.scroll),
            max_capture_failures: config.app.max_capture_failures.max(1),
            min_frame_interval: config.app.min_frame_interval(),
            next_frame_id: 0,
            last_mode: Mode::Idle,
            summary: RunSummary::default(),
        })
    }

    pub fn region(&self) -> ActiveRegion {
        self.mapper.region()
    }

    pub fn is_button_held(&self) -> bool {
        self.pinch.is_held()
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.smoother.position()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Classify one frame and issue the resulting pointer calls.
    ///
    /// Landmarks with a NaN or infinite coordinate count as no hand.
    pub fn step<S: PointerSink>(&mut self, landmarks: Option<LandmarkSet>, pointer: &mut S) -> FrameReport {
        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;
        self.summary.frames += 1;

        let landmarks = landmarks.filter(|set| {
            let finite = set.is_finite();
            if !finite {
                debug!(frame = frame_id, "dropping landmarks with non-finite coordinates");
            }
            finite
        });

        let mode = Mode::classify(landmarks.as_ref());
        if mode != self.last_mode {
            debug!(frame = frame_id, from = %self.last_mode, to = %mode, "mode change");
            self.last_mode = mode;
        }

        let mut report = FrameReport {
            frame_id,
            mode,
            cursor: None,
            click: None,
            scroll: None,
        };

        let Some(set) = landmarks else {
            self.summary.frames_without_hand += 1;
            report.click = self.release_click(pointer);
            return report;
        };

        let tip = set.get(HandLandmark::IndexTip).to_pixel(self.frame_w, self.frame_h);
        match mode {
            Mode::Idle => {
                report.click = self.release_click(pointer);
            }
            Mode::Cursor => {
                let target = self.mapper.map(tip.0, tip.1);
                let cursor = self.smoother.apply(target);
                inject("move", pointer.move_to(cursor.0.round() as i32, cursor.1.round() as i32));
                report.cursor = Some(cursor);

                let thumb = set.get(HandLandmark::ThumbTip).to_pixel(self.frame_w, self.frame_h);
                let click = self.pinch.update(tip_distance(tip, thumb));
                if let Some(event) = click {
                    self.emit_click(event, pointer);
                }
                report.click = click;
            }
            Mode::Scroll => {
                report.click = self.release_click(pointer);
                let center_y = self.frame_h as f32 / 2.0;
                if let Some(delta) = self.scroll.update(tip.1, center_y) {
                    inject("scroll", pointer.scroll_by(delta));
                    self.summary.scroll_events += 1;
                    report.scroll = Some(delta);
                }
            }
        }
        report
    }

    /// Run frames until `stop` is raised, the provider closes, or capture is
    /// lost. The button is always released before returning.
    pub fn run<P, S>(&mut self, provider: &mut P, pointer: &mut S, stop: &StopSignal) -> Result<RunSummary, LoopError>
    where
        P: LandmarkProvider,
        S: PointerSink,
    {
        info!(
            frame = ?(self.frame_w, self.frame_h),
            region = ?self.region(),
            "gesture loop running"
        );

        let mut consecutive_failures = 0u32;
        let mut fps_timer = Instant::now();
        let mut fps_frames = 0u32;

        while !stop.is_raised() && provider.is_open() {
            let frame_start = Instant::now();

            let landmarks = match provider.next_frame() {
                Ok(landmarks) => {
                    consecutive_failures = 0;
                    landmarks
                }
                Err(e) => {
                    consecutive_failures += 1;
                    self.summary.capture_failures += 1;
                    warn!("capture failed ({consecutive_failures}/{}): {e:#}", self.max_capture_failures);
                    if consecutive_failures >= self.max_capture_failures {
                        error!("camera lost, stopping gesture loop");
                        self.shutdown(pointer);
                        return Err(LoopError::CaptureLost {
                            failures: consecutive_failures,
                        });
                    }
                    None
                }
            };

            self.step(landmarks, pointer);

            fps_frames += 1;
            let elapsed = fps_timer.elapsed().as_secs_f32();
            if elapsed >= 1.0 {
                debug!("FPS: {:.1}", fps_frames as f32 / elapsed);
                fps_frames = 0;
                fps_timer = Instant::now();
            }

            let spent = frame_start.elapsed();
            if spent < self.min_frame_interval {
                std::thread::sleep(self.min_frame_interval - spent);
            }
        }

        Ok(self.shutdown(pointer))
    }

    /// Release a held button and return the run totals.
    pub fn shutdown<S: PointerSink>(&mut self, pointer: &mut S) -> RunSummary {
        self.release_click(pointer);
        let s = &self.summary;
        info!(
            frames = s.frames,
            without_hand = s.frames_without_hand,
            capture_failures = s.capture_failures,
            clicks = s.clicks,
            scrolls = s.scroll_events,
            "gesture loop stopped"
        );
        self.summary.clone()
    }

    fn release_click<S: PointerSink>(&mut self, pointer: &mut S) -> Option<ClickEvent> {
        let event = self.pinch.release();
        if let Some(event) = event {
            self.emit_click(event, pointer);
        }
        event
    }

    fn emit_click<S: PointerSink>(&mut self, event: ClickEvent, pointer: &mut S) {
        debug!(?event, "click");
        match event {
            ClickEvent::Down => {
                self.summary.clicks += 1;
                inject("button down", pointer.button_down());
            }
            ClickEvent::Up => inject("button up", pointer.button_up()),
        }
    }
}

/// Pointer failures never stop the loop.
fn inject(what: &str, result: Result<()>) {
    if let Err(e) = result {
        warn!("pointer {what} failed: {e:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{HandSketch, Landmark, ScriptedFrame, ScriptedProvider};
    use crate::pointer::{PointerEvent, RecordingPointer};

    const FRAME: (u32, u32) = (640, 480);

    fn config() -> Config {
        let mut config = Config::default();
        config.app.min_frame_interval_ms = 0;
        config.app.max_capture_failures = 3;
        config
    }

    fn controller() -> LoopController {
        LoopController::new(&config(), FRAME, (1920, 1080)).unwrap()
    }

    #[test]
    fn test_center_pointing_pinch() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);

        let hand = HandSketch::pointing().index_tip(0.5, 0.5).pinch_px(25.0, FRAME.0).build();
        let report = c.step(Some(hand.clone()), &mut pointer);
        assert_eq!(report.mode, Mode::Cursor);
        assert_eq!(report.cursor, Some((960.0, 540.0)));
        assert_eq!(report.click, Some(ClickEvent::Down));

        let report = c.step(Some(hand), &mut pointer);
        assert_eq!(report.click, None);
        assert_eq!(
            pointer.events(),
            vec![
                PointerEvent::MoveTo(960, 540),
                PointerEvent::ButtonDown,
                PointerEvent::MoveTo(960, 540),
            ]
        );
    }

    #[test]
    fn test_cursor_is_smoothed_toward_target() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        c.step(Some(HandSketch::pointing().index_tip(0.5, 0.5).build()), &mut pointer);
        // right edge of the active region: 540 / 640
        let report = c.step(Some(HandSketch::pointing().index_tip(540.0 / 640.0, 0.5).build()), &mut pointer);
        let (x, y) = report.cursor.unwrap();
        assert!((x - (960.0 + (1919.0 - 960.0) / 5.0)).abs() < 1e-3);
        assert_eq!(y, 540.0);
    }

    #[test]
    fn test_losing_hand_releases_button() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        c.step(Some(HandSketch::pointing().pinch_px(10.0, FRAME.0).build()), &mut pointer);
        assert!(c.is_button_held());

        let report = c.step(None, &mut pointer);
        assert_eq!(report.mode, Mode::Idle);
        assert_eq!(report.click, Some(ClickEvent::Up));
        assert!(!c.is_button_held());
        assert_eq!(pointer.clicks(), vec![PointerEvent::ButtonDown, PointerEvent::ButtonUp]);
    }

    #[test]
    fn test_switching_to_scroll_releases_button() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        c.step(Some(HandSketch::pointing().pinch_px(10.0, FRAME.0).build()), &mut pointer);
        let report = c.step(Some(HandSketch::two_fingers().index_tip(0.5, 0.1).build()), &mut pointer);
        assert_eq!(report.mode, Mode::Scroll);
        assert_eq!(report.click, Some(ClickEvent::Up));
        // 192px above center, past max_reference
        assert_eq!(report.scroll, Some(15));
    }

    #[test]
    fn test_scroll_mode_does_not_move_cursor() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        // 0.9 * 480 = 432: 192px below center
        let report = c.step(Some(HandSketch::two_fingers().index_tip(0.5, 0.9).build()), &mut pointer);
        assert_eq!(report.cursor, None);
        assert_eq!(report.scroll, Some(-15));
        assert_eq!(pointer.events(), vec![PointerEvent::Scroll(-15)]);
    }

    #[test]
    fn test_scroll_starts_one_pixel_past_deadzone() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        // 41px above center
        let report = c.step(Some(HandSketch::two_fingers().index_tip(0.5, 199.0 / 480.0).build()), &mut pointer);
        assert_eq!(report.scroll, Some(1));
        // 41px below center
        let report = c.step(Some(HandSketch::two_fingers().index_tip(0.5, 281.0 / 480.0).build()), &mut pointer);
        assert_eq!(report.scroll, Some(-1));
        assert_eq!(pointer.events(), vec![PointerEvent::Scroll(1), PointerEvent::Scroll(-1)]);
    }

    #[test]
    fn test_non_finite_landmarks_do_not_poison_cursor() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        c.step(Some(HandSketch::pointing().index_tip(0.5, 0.5).build()), &mut pointer);

        let mut bad = HandSketch::pointing().index_tip(0.5, 0.5).build();
        bad.set(HandLandmark::IndexTip, Landmark::new(f32::NAN, 0.5));
        let report = c.step(Some(bad), &mut pointer);
        assert_eq!(report.mode, Mode::Idle);
        assert_eq!(report.cursor, None);
        assert_eq!(c.cursor(), Some((960.0, 540.0)));

        let report = c.step(Some(HandSketch::pointing().index_tip(0.5, 0.5).build()), &mut pointer);
        assert_eq!(report.cursor, Some((960.0, 540.0)));
        assert_eq!(
            pointer.events(),
            vec![PointerEvent::MoveTo(960, 540), PointerEvent::MoveTo(960, 540)]
        );
    }

    #[test]
    fn test_fist_is_idle() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        let report = c.step(Some(HandSketch::fist().build()), &mut pointer);
        assert_eq!(report.mode, Mode::Idle);
        assert!(pointer.events().is_empty());
    }

    #[test]
    fn test_injection_errors_do_not_stop_processing() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080).failing();
        let hand = HandSketch::pointing().pinch_px(10.0, FRAME.0).build();
        c.step(Some(hand.clone()), &mut pointer);
        c.step(Some(hand), &mut pointer);
        c.step(None, &mut pointer);
        assert_eq!(pointer.clicks(), vec![PointerEvent::ButtonDown, PointerEvent::ButtonUp]);
        assert_eq!(c.summary().frames, 3);
    }

    #[test]
    fn test_run_releases_button_when_script_ends() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        let pinch = HandSketch::pointing().pinch_px(5.0, FRAME.0).frame();
        let mut provider = ScriptedProvider::new(FRAME, [pinch.clone(), pinch]);

        let summary = c.run(&mut provider, &mut pointer, &StopSignal::new()).unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.clicks, 1);
        assert_eq!(pointer.events().last(), Some(&PointerEvent::ButtonUp));
    }

    #[test]
    fn test_single_capture_failure_is_transient() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        let mut provider = ScriptedProvider::new(
            FRAME,
            [
                HandSketch::pointing().pinch_px(5.0, FRAME.0).frame(),
                ScriptedFrame::CaptureError,
                HandSketch::pointing().frame(),
            ],
        );

        let summary = c.run(&mut provider, &mut pointer, &StopSignal::new()).unwrap();
        assert_eq!(summary.capture_failures, 1);
        assert_eq!(summary.frames, 3);
        assert_eq!(pointer.clicks(), vec![PointerEvent::ButtonDown, PointerEvent::ButtonUp]);
    }

    #[test]
    fn test_repeated_capture_failure_is_fatal_after_cleanup() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        let mut provider = ScriptedProvider::new(
            FRAME,
            [
                HandSketch::pointing().pinch_px(5.0, FRAME.0).frame(),
                ScriptedFrame::CaptureError,
                ScriptedFrame::CaptureError,
                ScriptedFrame::CaptureError,
                HandSketch::pointing().frame(),
            ],
        );

        let err = c.run(&mut provider, &mut pointer, &StopSignal::new()).unwrap_err();
        assert!(matches!(err, LoopError::CaptureLost { failures: 3 }));
        assert_eq!(pointer.clicks(), vec![PointerEvent::ButtonDown, PointerEvent::ButtonUp]);
        assert_eq!(provider.remaining(), 1);
    }

    #[test]
    fn test_raised_stop_runs_no_frames() {
        let mut c = controller();
        let mut pointer = RecordingPointer::new(1920, 1080);
        let mut provider = ScriptedProvider::new(FRAME, [HandSketch::pointing().frame()]).looping();
        let stop = StopSignal::new();
        stop.raise();

        let summary = c.run(&mut provider, &mut pointer, &stop).unwrap();
        assert_eq!(summary.frames, 0);
        assert!(pointer.events().is_empty());
    }

    #[test]
    fn test_rejects_margin_larger_than_frame() {
        let mut config = config();
        config.region.margin = 300.0;
        assert!(LoopController::new(&config, FRAME, (1920, 1080)).is_err());
    }
}
