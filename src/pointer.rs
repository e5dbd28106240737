use anyhow::{bail, Result};
use std::sync::{Arc, Mutex};

/// Side-effecting access to the system pointer and the display it lives on.
///
/// Scroll deltas are in wheel units; positive scrolls up (content moves down).
pub trait PointerSink {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;
    fn button_down(&mut self) -> Result<()>;
    fn button_up(&mut self) -> Result<()>;
    fn scroll_by(&mut self, delta: i32) -> Result<()>;

    /// Primary display size in pixels.
    fn primary_display_size(&self) -> Result<(u32, u32)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    MoveTo(i32, i32),
    ButtonDown,
    ButtonUp,
    Scroll(i32),
}

/// Records every call instead of touching the OS.
///
/// Clones share one event log, so a copy kept by the caller can inspect what a
/// loop running on another thread emitted.
#[derive(Debug, Clone)]
pub struct RecordingPointer {
    events: Arc<Mutex<Vec<PointerEvent>>>,
    display: (u32, u32),
    fail_injection: bool,
}

impl RecordingPointer {
    pub fn new(display_w: u32, display_h: u32) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            display: (display_w, display_h),
            fail_injection: false,
        }
    }

    /// Every injection call records its event and then fails.
    pub fn failing(mut self) -> Self {
        self.fail_injection = true;
        self
    }

    pub fn events(&self) -> Vec<PointerEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Button transitions only, in order.
    pub fn clicks(&self) -> Vec<PointerEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, PointerEvent::ButtonDown | PointerEvent::ButtonUp))
            .collect()
    }

    fn record(&self, event: PointerEvent) -> Result<()> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
        if self.fail_injection {
            bail!("injection refused: {event:?}");
        }
        Ok(())
    }
}

impl PointerSink for RecordingPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.record(PointerEvent::MoveTo(x, y))
    }

    fn button_down(&mut self) -> Result<()> {
        self.record(PointerEvent::ButtonDown)
    }

    fn button_up(&mut self) -> Result<()> {
        self.record(PointerEvent::ButtonUp)
    }

    fn scroll_by(&mut self, delta: i32) -> Result<()> {
        self.record(PointerEvent::Scroll(delta))
    }

    fn primary_display_size(&self) -> Result<(u32, u32)> {
        Ok(self.display)
    }
}

/// Logs pointer calls at debug level; for running the camera pipeline without
/// taking over the real pointer.
pub struct TracingPointer {
    display: (u32, u32),
}

impl TracingPointer {
    pub fn new(display_w: u32, display_h: u32) -> Self {
        Self {
            display: (display_w, display_h),
        }
    }
}

impl PointerSink for TracingPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        tracing::trace!(x, y, "move");
        Ok(())
    }

    fn button_down(&mut self) -> Result<()> {
        tracing::debug!("button down");
        Ok(())
    }

    fn button_up(&mut self) -> Result<()> {
        tracing::debug!("button up");
        Ok(())
    }

    fn scroll_by(&mut self, delta: i32) -> Result<()> {
        tracing::debug!(delta, "scroll");
        Ok(())
    }

    fn primary_display_size(&self) -> Result<(u32, u32)> {
        Ok(self.display)
    }
}

#[cfg(feature = "desktop")]
pub use desktop::EnigoPointer;

#[cfg(feature = "desktop")]
mod desktop {
    use anyhow::{anyhow, Result};
    use enigo::{Axis, Button, Coordinate, Direction, Enigo, Mouse, Settings};

    use super::PointerSink;

    /// OS pointer via enigo (left button, vertical wheel).
    pub struct EnigoPointer {
        enigo: Enigo,
    }

    impl EnigoPointer {
        pub fn new() -> Result<Self> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| anyhow!("failed to connect to the input backend: {e:?}"))?;
            Ok(Self { enigo })
        }
    }

    impl PointerSink for EnigoPointer {
        fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
            self.enigo
                .move_mouse(x, y, Coordinate::Abs)
                .map_err(|e| anyhow!("move_mouse failed: {e:?}"))
        }

        fn button_down(&mut self) -> Result<()> {
            self.enigo
                .button(Button::Left, Direction::Press)
                .map_err(|e| anyhow!("button press failed: {e:?}"))
        }

        fn button_up(&mut self) -> Result<()> {
            self.enigo
                .button(Button::Left, Direction::Release)
                .map_err(|e| anyhow!("button release failed: {e:?}"))
        }

        fn scroll_by(&mut self, delta: i32) -> Result<()> {
            // enigo: positive length scrolls down
            self.enigo
                .scroll(-delta, Axis::Vertical)
                .map_err(|e| anyhow!("scroll failed: {e:?}"))
        }

        fn primary_display_size(&self) -> Result<(u32, u32)> {
            let (w, h) = self
                .enigo
                .main_display()
                .map_err(|e| anyhow!("display query failed: {e:?}"))?;
            if w <= 0 || h <= 0 {
                return Err(anyhow!("display reported as {w}x{h}"));
            }
            Ok((w as u32, h as u32))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_pointer_shares_log_between_clones() {
        let pointer = RecordingPointer::new(1920, 1080);
        let mut handle = pointer.clone();
        handle.move_to(1, 2).unwrap();
        handle.button_down().unwrap();
        handle.scroll_by(-5).unwrap();
        handle.button_up().unwrap();

        assert_eq!(
            pointer.events(),
            vec![
                PointerEvent::MoveTo(1, 2),
                PointerEvent::ButtonDown,
                PointerEvent::Scroll(-5),
                PointerEvent::ButtonUp,
            ]
        );
        assert_eq!(pointer.clicks(), vec![PointerEvent::ButtonDown, PointerEvent::ButtonUp]);
        assert_eq!(pointer.primary_display_size().unwrap(), (1920, 1080));
    }

    #[test]
    fn test_failing_pointer_still_records() {
        let mut pointer = RecordingPointer::new(800, 600).failing();
        assert!(pointer.button_down().is_err());
        assert_eq!(pointer.events(), vec![PointerEvent::ButtonDown]);
    }
}
