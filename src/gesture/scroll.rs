use super::mapper::interp;
use crate::config::ScrollConfig;

/// Vertical scroll from the fingertip's offset to the frame's horizontal
/// center line.
///
/// Direction: fingertip above center scrolls up (positive delta), below
/// scrolls down. `invert` flips both.
#[derive(Debug, Clone)]
pub struct ScrollController {
    deadzone: f32,
    max_reference: f32,
    max_speed: f32,
    invert: bool,
}

impl ScrollController {
    pub fn new(deadzone: f32, max_reference: f32, max_speed: f32) -> Self {
        Self {
            deadzone,
            max_reference,
            max_speed,
            invert: false,
        }
    }

    pub fn from_config(config: &ScrollConfig) -> Self {
        Self {
            invert: config.invert,
            ..Self::new(config.deadzone, config.max_reference, config.max_speed)
        }
    }

    /// Speed in [0, max_speed] for an offset; zero inside the deadzone.
    pub fn speed(&self, offset: f32) -> f32 {
        let distance = offset.abs();
        if distance <= self.deadzone {
            return 0.0;
        }
        interp(distance, (self.deadzone, self.max_reference), (0.0, self.max_speed))
    }

    /// Signed wheel delta for this frame, or `None` inside the deadzone.
    ///
    /// The speed is rounded up to whole wheel units, so any offset past the
    /// deadzone scrolls at least 1 and never more than `max_speed`. Repeats
    /// every frame while the hand stays outside the deadzone.
    pub fn update(&self, fingertip_y: f32, center_y: f32) -> Option<i32> {
        let offset = center_y - fingertip_y;
        let speed = self.speed(offset);
        if speed <= 0.0 {
            return None;
        }
        let magnitude = speed.ceil().min(self.max_speed.trunc()) as i32;
        if magnitude == 0 {
            return None;
        }
        let up = (offset > 0.0) != self.invert;
        Some(if up { magnitude } else { -magnitude })
    }
}
