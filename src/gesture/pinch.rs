use crate::config::ClickConfig;

/// Button transition produced by the pinch detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickEvent {
    Down,
    Up,
}

/// Pinch-to-click with held-state memory.
///
/// At most one transition per frame; downs and ups strictly alternate.
#[derive(Debug)]
pub struct PinchDetector {
    threshold: f32,
    held: bool,
}

impl PinchDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            held: false,
        }
    }

    pub fn from_config(config: &ClickConfig) -> Self {
        Self::new(config.threshold)
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Feed the index/thumb tip distance in camera pixels.
    pub fn update(&mut self, distance: f32) -> Option<ClickEvent> {
        if distance < self.threshold && !self.held {
            self.held = true;
            Some(ClickEvent::Down)
        } else if distance >= self.threshold && self.held {
            self.held = false;
            Some(ClickEvent::Up)
        } else {
            None
        }
    }

    /// Force the button up, e.g. when tracking is lost.
    pub fn release(&mut self) -> Option<ClickEvent> {
        if self.held {
            self.held = false;
            Some(ClickEvent::Up)
        } else {
            None
        }
    }
}

pub fn tip_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}
